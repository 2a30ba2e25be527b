//! Closed-attribute checks for strict entities.
//!
//! A strict entity's attribute list is the full set of roots any bound path
//! may start with. Component bindings are checked against the component's
//! entity; condition and repetition paths against the entity their prefix
//! names.

use crate::{
    error::{ViolationKind, Violations},
    model::Model,
    node::{BindPaths, CompiledPath, Entity, PathToken},
};
use webdsl_syntax::Location;

pub fn validate_strict_entities(model: &Model, errs: &mut Violations) {
    // Phase 1: component bindings.
    for (_, component) in model.components() {
        let Some(entity) = component.entity.map(|id| model.entity(id)) else {
            continue;
        };
        if !entity.strict {
            continue;
        }

        for binding in component.kind.bindings() {
            check_path(
                errs,
                &format!("Component '{}' field '{}'", component.name, binding.field),
                entity,
                binding.path,
                &component.location,
            );
        }
    }

    // Phase 2: entity-prefixed paths of conditions and repetitions.
    for (_, condition) in model.conditions() {
        for path in condition.compiled.paths() {
            check_scoped(model, errs, "Condition", path, &condition.location);
        }
    }
    for (_, repetition) in model.repetitions() {
        for path in repetition.paths() {
            check_scoped(model, errs, "Repetition", path, &repetition.location);
        }
    }
}

fn check_scoped(
    model: &Model,
    errs: &mut Violations,
    owner: &str,
    path: &CompiledPath,
    location: &Location,
) {
    let Some(entity) = path.scope.map(|id| model.entity(id)) else {
        return;
    };
    if entity.strict {
        check_path(errs, owner, entity, path, location);
    }
}

// check_path
// an empty path reads the whole entity and is always allowed
fn check_path(
    errs: &mut Violations,
    owner: &str,
    entity: &Entity,
    path: &CompiledPath,
    location: &Location,
) {
    let used = match path.root() {
        None => return,
        Some(PathToken::Attr(name)) if entity.has_attribute(name) => return,
        Some(PathToken::Attr(name)) => format!("attribute '{name}'"),
        Some(PathToken::Index(index)) => format!("index [{index}]"),
    };

    errs.add(
        ViolationKind::StrictViolation,
        format!(
            "{owner} uses {used} not allowed by strict entity '{}'",
            entity.name
        ),
        Some(location.clone()),
    );
}
