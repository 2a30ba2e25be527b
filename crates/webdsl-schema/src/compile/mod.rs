//! Path & condition compilation.
//!
//! Runs after overload resolution: scoped paths carry the canonical entity's
//! handle and name, and every component's `source_of_content` is read from
//! its canonical entity.

mod condition;
mod path;

pub use path::{compile_accessors, compile_literal, compile_path, compile_scoped};

use crate::{
    link::{ConditionDraft, RepetitionDraft},
    model::Model,
    node::{Condition, Repetition, SourceOfContent},
};
use condition::ScopedCompiler;
use tracing::debug;

/// Lower every condition and repetition draft into the model.
pub(crate) fn compile(
    model: &mut Model,
    conditions: Vec<ConditionDraft>,
    repetitions: Vec<RepetitionDraft>,
) {
    let entities = &model.entities;
    for component in &mut model.components {
        component.source_of_content = component
            .entity
            .map_or(SourceOfContent::Static, |entity| {
                entities[entity.index()].source_of_content()
            });
    }

    let conditions: Vec<_> = conditions
        .into_iter()
        .map(|draft| compile_condition(model, draft))
        .collect();
    let repetitions: Vec<_> = repetitions
        .into_iter()
        .map(|draft| compile_repetition(model, draft))
        .collect();
    debug!(
        conditions = conditions.len(),
        repetitions = repetitions.len(),
        "compiled conditions and repetitions"
    );

    model.conditions = conditions;
    model.repetitions = repetitions;
}

fn compile_condition(model: &Model, draft: ConditionDraft) -> Condition {
    let mut compiler = ScopedCompiler::new(model);
    let compiled = compiler.or_expr(&draft.expr);

    Condition {
        raw: draft.expr,
        compiled,
        referenced_entities: compiler.referenced,
        then: draft.then,
        otherwise: draft.otherwise,
        location: draft.location,
    }
}

fn compile_repetition(model: &Model, draft: RepetitionDraft) -> Repetition {
    let mut compiler = ScopedCompiler::new(model);
    let item = compiler.path(&draft.item);
    let data = draft.data.as_ref().map(|path| compiler.path(path));
    let data_else = draft.data_else.as_ref().map(|path| compiler.path(path));
    let condition = draft.condition.as_ref().map(|half| compiler.half(half));

    Repetition {
        raw_item: draft.item,
        raw_data: draft.data,
        raw_data_else: draft.data_else,
        raw_condition: draft.condition,
        item,
        data,
        data_else,
        condition,
        component: draft.component,
        otherwise: draft.otherwise,
        orientation: draft.orientation,
        referenced_entities: compiler.referenced,
        location: draft.location,
    }
}
