//! Semantic core of the WebDSL language.
//!
//! Turns a root source file and everything it imports into one linked,
//! overload-resolved and validated model that artifact emitters read.

pub mod aggregate;
pub mod build;
pub mod compile;
pub mod error;
pub mod load;
pub mod model;
pub mod node;
pub mod overload;
pub mod validate;

mod link;

pub use build::{Builder, ResolvedModel, TopicConfig, build_model};
pub use error::{Error, ErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        aggregate::Aggregated,
        build::{Builder, ResolvedModel, TopicConfig, build_model},
        error::{
            Error, ErrorKind, LoadError, OverloadTargetError, ReferenceError, StructuralError,
            Violation, ViolationKind, Violations,
        },
        load::{FsLoader, MemoryLoader, SourceLoader},
        model::*,
        node::*,
        overload::Redirects,
    };
    pub use webdsl_config::BuildConfig;
    pub use webdsl_syntax::Location;
}
