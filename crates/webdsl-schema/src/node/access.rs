use crate::model::RoleId;
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Role
///

#[derive(Clone, Debug, Serialize)]
pub struct Role {
    pub name: String,
    pub description: Option<String>,

    #[serde(skip)]
    pub location: Location,
}

///
/// User
///

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub name: String,
    pub roles: Vec<RoleId>,
    pub description: Option<String>,

    #[serde(skip)]
    pub location: Location,
}
