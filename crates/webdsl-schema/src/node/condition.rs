use crate::{
    model::{ComponentId, EntityId},
    node::{CompiledPath, CompiledValue, EntityPath},
};
use serde::{Serialize, Serializer, ser::SerializeSeq};
use std::collections::BTreeSet;
use webdsl_syntax::{
    Location,
    ast::{CompareOp, OrExpr},
};

///
/// Condition
/// Screen element that shows one component or another depending on a
/// boolean expression over entity data.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(skip)]
    pub raw: OrExpr<EntityPath>,

    #[serde(rename = "condition")]
    pub compiled: CompiledCondition,

    pub referenced_entities: BTreeSet<EntityId>,
    pub then: ComponentId,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub otherwise: Vec<ComponentId>,

    #[serde(skip)]
    pub location: Location,
}

///
/// CompiledCondition
///
/// Prefix form of a boolean expression. Serialises as nested arrays:
/// `[left, op, right]` for a comparison and `["and" | "or", left, right]`
/// for a connective.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledCondition {
    Compare {
        left: CompiledValue,
        op: CompareOp,
        right: CompiledValue,
    },
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
}

impl CompiledCondition {
    /// Every compiled path operand, left to right.
    #[must_use]
    pub fn paths(&self) -> Vec<&CompiledPath> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);

        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a CompiledPath>) {
        match self {
            Self::Compare { left, right, .. } => {
                out.extend(left.as_path());
                out.extend(right.as_path());
            }
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_paths(out);
                right.collect_paths(out);
            }
        }
    }
}

impl Serialize for CompiledCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        match self {
            Self::Compare { left, op, right } => {
                seq.serialize_element(left)?;
                seq.serialize_element(op.as_str())?;
                seq.serialize_element(right)?;
            }
            Self::And(left, right) => {
                seq.serialize_element("and")?;
                seq.serialize_element(left)?;
                seq.serialize_element(right)?;
            }
            Self::Or(left, right) => {
                seq.serialize_element("or")?;
                seq.serialize_element(left)?;
                seq.serialize_element(right)?;
            }
        }

        seq.end()
    }
}
