use crate::model::{EndpointId, EntityId, QueryId, TopicId};
use derive_more::Display;
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Entity
///
/// A named data shape bound to exactly one source. `overloads` records the
/// entity this one replaced; `superseded_by` is set on the replaced entity.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub attributes: Vec<Attribute>,
    pub strict: bool,

    /// Polling interval in milliseconds, `0` for event-driven sources.
    pub interval: u64,

    pub source: SourceRef,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overloads: Option<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<EntityId>,

    #[serde(skip)]
    pub location: Location,
}

impl Entity {
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attr| attr.name.as_str())
    }

    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        self.superseded_by.is_some()
    }

    #[must_use]
    pub const fn source_of_content(&self) -> SourceOfContent {
        self.source.source_of_content()
    }
}

///
/// Attribute
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,
}

///
/// SourceRef
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id")]
pub enum SourceRef {
    BrokerTopic(TopicId),
    RestEndpoint(EndpointId),
    MySqlQuery(QueryId),
    MongoDbQuery(QueryId),
    #[default]
    Static,
}

impl SourceRef {
    #[must_use]
    pub const fn source_of_content(self) -> SourceOfContent {
        match self {
            Self::BrokerTopic(_) => SourceOfContent::Broker,
            Self::RestEndpoint(_) => SourceOfContent::Rest,
            Self::MySqlQuery(_) | Self::MongoDbQuery(_) => SourceOfContent::Db,
            Self::Static => SourceOfContent::Static,
        }
    }
}

///
/// SourceOfContent
/// Transport tag emitters switch on.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOfContent {
    #[display("broker")]
    Broker,
    #[display("rest")]
    Rest,
    #[display("db")]
    Db,
    #[default]
    #[display("static")]
    Static,
}
