use crate::{
    error::{ViolationKind, Violations},
    model::Model,
    node::{ComponentKind, SourceRef},
};

// A CRUD table over a MySQL query cannot infer its target table from the
// query text, so it must name one.
pub fn validate_crud_tables(model: &Model, errs: &mut Violations) {
    for (_, component) in model.components() {
        let ComponentKind::CrudTable(crud) = &component.kind else {
            continue;
        };
        let Some(entity) = component.entity.map(|id| model.entity(id)) else {
            continue;
        };

        let has_table = crud
            .table
            .as_deref()
            .is_some_and(|table| !table.trim().is_empty());
        if matches!(entity.source, SourceRef::MySqlQuery(_)) && !has_table {
            errs.add(
                ViolationKind::CrudTable,
                format!(
                    "CRUD table '{}' references a MySQL query without a table name",
                    component.name
                ),
                Some(component.location.clone()),
            );
        }
    }
}
