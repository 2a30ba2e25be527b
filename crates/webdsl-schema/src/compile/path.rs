//! Access-path and literal lowering.
//!
//! A path's base names what the path is read from (the bound entity for a
//! component, the owning entity inside a condition or repetition). Only the
//! accessors after it become tokens; scoped paths get the owning entity's
//! name as their first token instead.

use crate::{
    model::EntityId,
    node::{CompiledPath, CompiledValue, PathToken},
};
use webdsl_syntax::ast::{AccessPath, Accessor, Literal, Operand};

/// `.name` becomes an attribute token and `[index]` an index token.
#[must_use]
pub fn compile_accessors(accessors: &[Accessor]) -> Vec<PathToken> {
    accessors
        .iter()
        .map(|accessor| match accessor {
            Accessor::Attribute(name) => PathToken::Attr(name.name.clone()),
            Accessor::Index { index, .. } => PathToken::Index(*index),
        })
        .collect()
}

/// Unscoped path of a component binding: `data[2].value` is `[2, "value"]`.
#[must_use]
pub fn compile_path(path: &AccessPath) -> CompiledPath {
    CompiledPath::unscoped(compile_accessors(&path.accessors))
}

/// Path inside a condition or repetition, prefixed with the owning entity.
#[must_use]
pub fn compile_scoped(entity: EntityId, entity_name: &str, path: &AccessPath) -> CompiledPath {
    let tokens = std::iter::once(PathToken::Attr(entity_name.to_string()))
        .chain(compile_accessors(&path.accessors))
        .collect();

    CompiledPath::scoped(entity, tokens)
}

/// Literals pass through, except booleans which become `"true"` / `"false"`.
#[must_use]
pub fn compile_literal(literal: &Literal) -> CompiledValue {
    match literal {
        Literal::Int(value) => CompiledValue::Int(*value),
        Literal::Float(value) => CompiledValue::Float(*value),
        Literal::Str(value) => CompiledValue::Text(value.clone()),
        Literal::Bool(value) => CompiledValue::Text(value.to_string()),
    }
}

pub(crate) fn compile_operand<P>(
    operand: &Operand<P>,
    compile: &mut impl FnMut(&P) -> CompiledPath,
) -> CompiledValue {
    match operand {
        Operand::Path(path) => CompiledValue::Path(compile(path)),
        Operand::Literal { value, .. } => compile_literal(value),
    }
}
