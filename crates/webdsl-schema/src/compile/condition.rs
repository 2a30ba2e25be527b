//! Boolean-expression lowering.
//!
//! `a.x > 5` becomes `[["a","x"], ">", 5]`; a connective with a right
//! operand becomes `["and" | "or", left, right]` and one without collapses to
//! its left side. Parenthesised groups add no node of their own.

use super::path::{compile_operand, compile_scoped};
use crate::{
    model::{EntityId, Model},
    node::{CompiledCondition, CompiledHalf, CompiledPath, EntityPath},
};
use std::collections::BTreeSet;
use webdsl_syntax::ast::{AndExpr, HalfExpr, OrExpr, PrimaryExpr};

///
/// ScopedCompiler
/// Compiles entity paths and records every entity it scopes a path to.
///

pub(crate) struct ScopedCompiler<'a> {
    model: &'a Model,
    pub referenced: BTreeSet<EntityId>,
}

impl<'a> ScopedCompiler<'a> {
    pub(crate) const fn new(model: &'a Model) -> Self {
        Self {
            model,
            referenced: BTreeSet::new(),
        }
    }

    pub(crate) fn path(&mut self, path: &EntityPath) -> CompiledPath {
        self.referenced.insert(path.entity);
        let name = &self.model.entity(path.entity).name;

        compile_scoped(path.entity, name, &path.path)
    }

    pub(crate) fn or_expr(&mut self, expr: &OrExpr<EntityPath>) -> CompiledCondition {
        let left = self.and_expr(&expr.left);
        match &expr.right {
            Some(right) => CompiledCondition::Or(Box::new(left), Box::new(self.or_expr(right))),
            None => left,
        }
    }

    fn and_expr(&mut self, expr: &AndExpr<EntityPath>) -> CompiledCondition {
        let left = self.primary(&expr.left);
        match &expr.right {
            Some(right) => CompiledCondition::And(Box::new(left), Box::new(self.and_expr(right))),
            None => left,
        }
    }

    fn primary(&mut self, expr: &PrimaryExpr<EntityPath>) -> CompiledCondition {
        match expr {
            PrimaryExpr::Group(inner) => self.or_expr(inner),
            PrimaryExpr::Comparison(cmp) => CompiledCondition::Compare {
                left: compile_operand(&cmp.left, &mut |path| self.path(path)),
                op: cmp.op,
                right: compile_operand(&cmp.right, &mut |path| self.path(path)),
            },
        }
    }

    pub(crate) fn half(&mut self, expr: &HalfExpr<EntityPath>) -> CompiledHalf {
        CompiledHalf {
            op: expr.op,
            right: compile_operand(&expr.right, &mut |path| self.path(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Entity, SourceRef};
    use webdsl_syntax::{FileId, Location, parse_condition};

    fn entity(name: &str) -> Entity {
        Entity {
            name: name.into(),
            description: None,
            attributes: Vec::new(),
            strict: false,
            interval: 0,
            source: SourceRef::Static,
            overloads: None,
            superseded_by: None,
            location: Location {
                path: "root.wdsl".into(),
                line: 1,
                column: 1,
            },
        }
    }

    fn model() -> Model {
        Model {
            entities: vec![entity("a"), entity("b")],
            ..Model::default()
        }
    }

    // every base is looked up by name among the model's entities
    fn compile(model: &Model, text: &str) -> (CompiledCondition, BTreeSet<EntityId>) {
        let expr = parse_condition(text, FileId::new(0))
            .unwrap()
            .try_map_paths(&mut |path| {
                model
                    .entity_by_name(path.base.as_str())
                    .map(|(entity, _)| EntityPath { entity, path })
                    .ok_or(())
            })
            .unwrap();

        let mut compiler = ScopedCompiler::new(model);
        let compiled = compiler.or_expr(&expr);

        (compiled, compiler.referenced)
    }

    fn json(condition: &CompiledCondition) -> String {
        serde_json::to_string(condition).unwrap()
    }

    #[test]
    fn conjunction_over_two_entities() {
        let model = model();
        let (compiled, referenced) = compile(&model, "a.x > 5 and b.y == 2");

        assert_eq!(
            json(&compiled),
            r#"["and",[["a","x"],">",5],[["b","y"],"==",2]]"#
        );
        assert_eq!(
            referenced,
            BTreeSet::from([EntityId::new(0), EntityId::new(1)])
        );
    }

    #[test]
    fn single_comparison_has_no_connective() {
        let model = model();
        let (compiled, referenced) = compile(&model, "a.on == true");

        assert_eq!(json(&compiled), r#"[["a","on"],"==","true"]"#);
        assert_eq!(referenced.len(), 1);
    }

    #[test]
    fn groups_recurse_without_wrapping() {
        let model = model();
        let (grouped, _) = compile(&model, "(a.x > 1 or a.x < 0) and b.y != \"off\"");

        assert_eq!(
            json(&grouped),
            r#"["and",["or",[["a","x"],">",1],[["a","x"],"<",0]],[["b","y"],"!=","off"]]"#
        );
    }

    #[test]
    fn chains_nest_to_the_right() {
        let model = model();
        let (compiled, _) = compile(&model, "a.x == 1 or a.x == 2 or b.y == 3");

        assert_eq!(
            json(&compiled),
            r#"["or",[["a","x"],"==",1],["or",[["a","x"],"==",2],[["b","y"],"==",3]]]"#
        );
    }

    #[test]
    fn compiled_paths_are_listed_left_to_right() {
        let model = model();
        let (compiled, _) = compile(&model, "a.x > b.y and b.z == 1");

        let roots: Vec<_> = compiled
            .paths()
            .into_iter()
            .map(|path| path.root().map(ToString::to_string))
            .collect();
        assert_eq!(
            roots,
            [Some("x".into()), Some("y".into()), Some("z".into())]
        );
    }
}
