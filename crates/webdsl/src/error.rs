use thiserror::Error as ThisError;
use webdsl_config::ConfigError;
use webdsl_schema::ErrorKind;

///
/// Error
/// Anything [`build_model`](crate::build_model) can fail with.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] webdsl_schema::Error),
}

impl Error {
    /// Kind of the build failure; `None` for configuration problems.
    #[must_use]
    pub const fn build_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Config(_) => None,
            Self::Build(err) => Some(err.kind()),
        }
    }
}
