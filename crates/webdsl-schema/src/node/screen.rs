use crate::model::{ComponentId, ConditionId, RepetitionId, RoleId};
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Screen
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub name: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub allowed_roles: Vec<RoleId>,
    pub elements: Vec<ScreenElement>,

    #[serde(skip)]
    pub location: Location,
}

impl Screen {
    /// Depth-first walk over every element, layout groups included.
    pub fn walk(&self, f: &mut impl FnMut(&ScreenElement)) {
        for element in &self.elements {
            element.walk(f);
        }
    }
}

///
/// ScreenElement
///

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum ScreenElement {
    Component(ComponentId),
    Condition(ConditionId),
    Repetition(RepetitionId),
    Row(Vec<Self>),
    Column(Vec<Self>),
}

impl ScreenElement {
    fn walk(&self, f: &mut impl FnMut(&Self)) {
        f(self);
        if let Self::Row(children) | Self::Column(children) = self {
            for child in children {
                child.walk(f);
            }
        }
    }
}
