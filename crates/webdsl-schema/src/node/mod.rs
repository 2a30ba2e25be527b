mod access;
mod app;
mod component;
mod condition;
mod connection;
mod entity;
mod path;
mod repetition;
mod screen;
mod source;

pub use access::*;
pub use app::*;
pub use component::*;
pub use condition::*;
pub use connection::*;
pub use entity::*;
pub use path::*;
pub use repetition::*;
pub use screen::*;
pub use source::*;

use serde::Serialize;

///
/// Scalar
/// Literal property value kept as written (static gauge values, endpoint params).
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}
