//! Model validation orchestration.
//!
//! Every check records into one shared [`Violations`] list; nothing here is
//! fail-fast, so a single build reports every problem at once.

pub mod crud;
pub mod strict;

use crate::{error::Violations, model::Model};

/// Run every model-wide check in a fixed order.
pub(crate) fn validate_model(model: &Model) -> Result<(), Violations> {
    let mut violations = Violations::new();

    strict::validate_strict_entities(model, &mut violations);
    crud::validate_crud_tables(model, &mut violations);

    violations.result()
}
