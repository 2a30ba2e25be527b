use crate::{
    model::{ComponentId, EntityId},
    node::{CompiledPath, CompiledValue, EntityPath},
};
use serde::{Serialize, Serializer, ser::SerializeSeq};
use std::collections::BTreeSet;
use webdsl_syntax::{
    Location,
    ast::{CompareOp, HalfExpr},
};

///
/// Repetition
/// Renders `component` once per item of an entity-backed collection.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repetition {
    #[serde(skip)]
    pub raw_item: EntityPath,
    #[serde(skip)]
    pub raw_data: Option<EntityPath>,
    #[serde(skip)]
    pub raw_data_else: Option<EntityPath>,
    #[serde(skip)]
    pub raw_condition: Option<HalfExpr<EntityPath>>,

    pub item: CompiledPath,
    pub data: Option<CompiledPath>,
    pub data_else: Option<CompiledPath>,
    pub condition: Option<CompiledHalf>,
    pub component: ComponentId,
    pub otherwise: Option<ComponentId>,
    pub orientation: Orientation,
    pub referenced_entities: BTreeSet<EntityId>,

    #[serde(skip)]
    pub location: Location,
}

impl Repetition {
    /// Every compiled path on the node: item, data, fallback data and the
    /// right operand of the filter.
    #[must_use]
    pub fn paths(&self) -> Vec<&CompiledPath> {
        let mut out = vec![&self.item];
        out.extend(self.data.as_ref());
        out.extend(self.data_else.as_ref());
        if let Some(condition) = &self.condition {
            out.extend(condition.right.as_path());
        }

        out
    }
}

///
/// CompiledHalf
///
/// Item filter with an implicit left operand; serialises as
/// `["", op, right]` so it lines up with a full comparison.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledHalf {
    pub op: CompareOp,
    pub right: CompiledValue,
}

impl Serialize for CompiledHalf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element("")?;
        seq.serialize_element(self.op.as_str())?;
        seq.serialize_element(&self.right)?;

        seq.end()
    }
}

///
/// Orientation
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}
