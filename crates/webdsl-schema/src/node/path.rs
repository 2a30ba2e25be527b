use crate::model::EntityId;
use serde::{Serialize, Serializer, ser::SerializeSeq};
use std::fmt;
use webdsl_syntax::ast::AccessPath;

///
/// PathToken
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum PathToken {
    Attr(String),
    Index(i64),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attr(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

///
/// CompiledPath
///
/// Positional form of an access path. Paths compiled inside a condition or
/// repetition are scoped: their first token is the owning entity's name.
/// Serialises as a bare token array (`["Sensor", "temp"]`, `[2, "value"]`).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompiledPath {
    pub scope: Option<EntityId>,
    pub tokens: Vec<PathToken>,
}

impl CompiledPath {
    #[must_use]
    pub const fn unscoped(tokens: Vec<PathToken>) -> Self {
        Self {
            scope: None,
            tokens,
        }
    }

    #[must_use]
    pub const fn scoped(entity: EntityId, tokens: Vec<PathToken>) -> Self {
        Self {
            scope: Some(entity),
            tokens,
        }
    }

    /// First token below the entity prefix, if any.
    #[must_use]
    pub fn root(&self) -> Option<&PathToken> {
        let skip = usize::from(self.scope.is_some());

        self.tokens.get(skip)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Serialize for CompiledPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.tokens.len()))?;
        for token in &self.tokens {
            seq.serialize_element(token)?;
        }

        seq.end()
    }
}

///
/// CompiledValue
/// Operand of a compiled comparison.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompiledValue {
    Path(CompiledPath),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CompiledValue {
    #[must_use]
    pub const fn as_path(&self) -> Option<&CompiledPath> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }
}

///
/// EntityPath
///
/// Linked access path inside a condition or repetition: the base name has been
/// resolved to an entity, the accessors are still raw syntax.
///

#[derive(Clone, Debug, PartialEq)]
pub struct EntityPath {
    pub entity: EntityId,
    pub path: AccessPath,
}
