//! Repository-wide singletons.

use crate::model::ScreenId;
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Webpage
/// Top-level application; declared exactly once, in the root file.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Webpage {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub navbar: bool,
    pub screens: Vec<ScreenId>,

    #[serde(skip)]
    pub location: Location,
}

///
/// Api
///

#[derive(Clone, Debug, Serialize)]
pub struct Api {
    pub name: String,
    pub host: String,
    pub port: Option<u16>,

    #[serde(skip)]
    pub location: Location,
}

///
/// Websocket
///

#[derive(Clone, Debug, Serialize)]
pub struct Websocket {
    pub name: String,
    pub host: String,
    pub port: Option<u16>,

    #[serde(skip)]
    pub location: Location,
}
