//! ## Crate layout
//! - `config`: build configuration read from `webdsl.toml`.
//! - `schema`: node model, linker, overload resolver, compiler and validator.
//! - `syntax`: lexer, parser and source positions.
//!
//! [`build_model`] is the one-call entry point: it picks up `webdsl.toml`
//! next to the root file and builds the repository from the filesystem.

pub use webdsl_config as config;
pub use webdsl_schema as schema;
pub use webdsl_syntax as syntax;

mod error;

pub use error::Error;
pub use webdsl_schema::{Builder, ResolvedModel, TopicConfig};

use std::path::Path;
use tracing::debug;
use webdsl_config::BuildConfig;
use webdsl_schema::load::FsLoader;

/// Workspace version re-export for downstream tooling.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the repository rooted at `root`, reading configuration from the
/// root file's directory when it has a `webdsl.toml`.
pub fn build_model(root: impl AsRef<Path>) -> Result<ResolvedModel, Error> {
    let root = root.as_ref();
    let dir = root.parent().unwrap_or_else(|| Path::new(""));

    let config = BuildConfig::discover(dir)?;
    debug!(
        dir = %dir.display(),
        max_depth = config.imports.max_depth,
        retain_superseded = config.overload.retain_superseded,
        "resolved build config"
    );

    let model = Builder::new(&FsLoader).with_config(config).build(root)?;

    Ok(model)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, build_model};
    pub use webdsl_config::{BuildConfig, ImportConfig, OverloadConfig};
    pub use webdsl_schema::{
        Builder, ErrorKind, ResolvedModel, TopicConfig,
        aggregate::Aggregated,
        error::{Violation, ViolationKind, Violations},
        load::{FsLoader, MemoryLoader, SourceLoader},
        model::*,
        node::*,
    };
    pub use webdsl_syntax::Location;
}
