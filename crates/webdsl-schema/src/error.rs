//! Error taxonomy of a model build.
//!
//! Everything except validation is fail-fast: the first load, parse,
//! reference, structural or overload problem aborts the build. Validation
//! collects every violation into one [`Violations`] aggregate.

use derive_more::{Deref, IntoIterator};
use serde::Serialize;
use std::{fmt, io, path::PathBuf};
use thiserror::Error as ThisError;
use webdsl_syntax::{Location, ParseError};

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{location}: syntax error: {error}")]
    Parse {
        error: ParseError,
        location: Location,
    },

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    OverloadTarget(#[from] OverloadTargetError),

    #[error(transparent)]
    Validation(#[from] Violations),
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(_) => ErrorKind::Load,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Reference(_) => ErrorKind::Reference,
            Self::Structural(_) => ErrorKind::Structural,
            Self::OverloadTarget(_) => ErrorKind::OverloadTarget,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Source position of the error; aggregate validation errors report
    /// their first violation's position.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Load(err) => err.location(),
            Self::Parse { location, .. } => Some(location),
            Self::Reference(err) => Some(&err.location),
            Self::Structural(err) => err.location.as_ref(),
            Self::OverloadTarget(err) => Some(err.location()),
            Self::Validation(violations) => violations.first().and_then(|v| v.location.as_ref()),
        }
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum ErrorKind {
    Load,
    OverloadTarget,
    Parse,
    Reference,
    Structural,
    Validation,
}

///
/// LoadError
///

#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("{location}: cannot resolve import \"{import}\"")]
    ImportNotFound { import: String, location: Location },

    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

impl LoadError {
    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        match self {
            Self::ImportNotFound { location, .. } => Some(location),
            Self::Read { .. } => None,
        }
    }
}

///
/// ReferenceError
/// A name that does not resolve, or resolves to the wrong kind of node.
///

#[derive(Debug, ThisError)]
pub struct ReferenceError {
    pub name: String,
    pub expected: &'static str,
    pub found: Option<&'static str>,
    pub location: Location,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "{}: reference '{}' resolves to {found}, expected {}",
                self.location, self.name, self.expected
            ),
            None => write!(
                f,
                "{}: unresolved {} reference '{}'",
                self.location, self.expected, self.name
            ),
        }
    }
}

///
/// StructuralError
///

#[derive(Debug, ThisError)]
pub struct StructuralError {
    pub message: String,
    pub location: Option<Location>,
}

impl StructuralError {
    pub fn new(message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    pub fn at(message: impl Into<String>, location: Location) -> Self {
        Self::new(message, Some(location))
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

///
/// OverloadTargetError
///

#[derive(Debug, ThisError)]
pub enum OverloadTargetError {
    #[error("{location}: entity '{entity}' overloads '{target}', which is not declared")]
    NotFound {
        entity: String,
        target: String,
        location: Location,
    },

    #[error("{location}: entity '{entity}' overloads '{target}', which is a {found}, not an entity")]
    NotEntity {
        entity: String,
        target: String,
        found: &'static str,
        location: Location,
    },

    #[error("{location}: entity '{target}' is overloaded by both '{first}' and '{second}'")]
    Conflict {
        target: String,
        first: String,
        second: String,
        location: Location,
    },

    #[error("{location}: overload cycle: {}", .entities.join(" -> "))]
    Cycle {
        entities: Vec<String>,
        location: Location,
    },
}

impl OverloadTargetError {
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::NotFound { location, .. }
            | Self::NotEntity { location, .. }
            | Self::Conflict { location, .. }
            | Self::Cycle { location, .. } => location,
        }
    }
}

///
/// ViolationKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ViolationKind {
    StrictViolation,
    CrudTable,
}

///
/// Violation
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub location: Option<Location>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

///
/// Violations
/// Every validation problem found in one pass over the model.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq, Serialize, ThisError)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(
        &mut self,
        kind: ViolationKind,
        message: impl Into<String>,
        location: Option<Location>,
    ) {
        self.0.push(Violation {
            kind,
            message: message.into(),
            location,
        });
    }

    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// `Ok` when nothing was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model validation failed with {} errors:", self.0.len())?;
        for violation in &self.0 {
            write!(f, "\n - {violation}")?;
        }

        Ok(())
    }
}
