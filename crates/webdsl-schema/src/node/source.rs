//! Source descriptors an entity can be bound to.

use crate::{
    model::{BrokerId, DatabaseId, RestApiId, RoleId},
    node::Scalar,
};
use indexmap::IndexMap;
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Topic
/// A broker topic; `allowed_roles` restricts who may subscribe.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub connection: BrokerId,
    pub topic: String,
    pub allowed_roles: Vec<RoleId>,

    #[serde(skip)]
    pub location: Location,
}

///
/// Endpoint
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    pub connection: RestApiId,
    pub path: String,
    pub method: HttpMethod,
    pub params: IndexMap<String, Scalar>,

    #[serde(skip)]
    pub location: Location,
}

///
/// HttpMethod
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    #[default]
    Get,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_uppercase().as_str() {
            "DELETE" => Some(Self::Delete),
            "GET" => Some(Self::Get),
            "PATCH" => Some(Self::Patch),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            _ => None,
        }
    }
}

///
/// Query
///
/// Database query. The variant follows the connection's database kind, so a
/// MySQL connection always carries SQL text and a MongoDB one a collection.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub name: String,
    pub connection: DatabaseId,

    #[serde(flatten)]
    pub kind: QueryKind,

    #[serde(skip)]
    pub location: Location,
}

///
/// QueryKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum QueryKind {
    #[serde(rename = "MongoDBQuery")]
    MongoDb {
        collection: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
    },
    #[serde(rename = "MySQLQuery")]
    MySql { query: String },
}
