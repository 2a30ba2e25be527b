//! Typed access to a declaration's `key: value` properties.

use crate::{error::StructuralError, node::Scalar};
use webdsl_syntax::{
    SourceMap,
    ast::{AccessPath, Ident, Property, Value},
};

///
/// Props
///
/// Each property may be read once; `finish` rejects whatever was not read,
/// so misspelled or misplaced keys surface as structural errors.
///

pub(crate) struct Props<'a> {
    owner: String,
    entries: Vec<Entry<'a>>,
    sources: &'a SourceMap,
}

struct Entry<'a> {
    key: &'a Ident,
    value: &'a Value,
    used: bool,
}

#[derive(Clone, Copy)]
struct Pair<'a> {
    key: &'a Ident,
    value: &'a Value,
}

type PropResult<T> = Result<Option<T>, StructuralError>;

impl<'a> Props<'a> {
    pub(crate) fn new(
        owner: String,
        properties: &'a [Property],
        sources: &'a SourceMap,
    ) -> Result<Self, StructuralError> {
        Self::from_pairs(
            owner,
            properties.iter().map(|p| (&p.key, &p.value)),
            sources,
        )
    }

    /// Read the entries of a `{ key: value }` map the same way.
    pub(crate) fn from_map(
        owner: String,
        entries: &'a [(Ident, Value)],
        sources: &'a SourceMap,
    ) -> Result<Self, StructuralError> {
        Self::from_pairs(owner, entries.iter().map(|(k, v)| (k, v)), sources)
    }

    fn from_pairs(
        owner: String,
        pairs: impl Iterator<Item = (&'a Ident, &'a Value)>,
        sources: &'a SourceMap,
    ) -> Result<Self, StructuralError> {
        let mut entries: Vec<Entry<'a>> = Vec::new();
        for (key, value) in pairs {
            if entries.iter().any(|entry| entry.key.name == key.name) {
                return Err(StructuralError::at(
                    format!("duplicate property '{key}' on {owner}"),
                    sources.location(key.span),
                ));
            }
            entries.push(Entry {
                key,
                value,
                used: false,
            });
        }

        Ok(Self {
            owner,
            entries,
            sources,
        })
    }

    fn take(&mut self, key: &str) -> Option<Pair<'a>> {
        let entry = self.entries.iter_mut().find(|entry| entry.key.name == key)?;
        entry.used = true;

        Some(Pair {
            key: entry.key,
            value: entry.value,
        })
    }

    fn mismatch(&self, property: Pair<'_>, expected: &str) -> StructuralError {
        StructuralError::at(
            format!(
                "property '{}' of {} expects {expected}, found {}",
                property.key,
                self.owner,
                property.value.describe()
            ),
            self.sources.location(property.value.span()),
        )
    }

    /// Error for a property that is present but not acceptable.
    pub(crate) fn invalid(&self, key: &Ident, message: &str) -> StructuralError {
        StructuralError::at(
            format!("property '{key}' of {}: {message}", self.owner),
            self.sources.location(key.span),
        )
    }

    pub(crate) fn missing(&self, key: &str, span: webdsl_syntax::Span) -> StructuralError {
        StructuralError::at(
            format!("{} is missing required property '{key}'", self.owner),
            self.sources.location(span),
        )
    }

    pub(crate) fn string(&mut self, key: &str) -> PropResult<String> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Str { value, .. } => Ok(Some(value.clone())),
            _ => Err(self.mismatch(property, "a string")),
        }
    }

    /// String or bare name (`method: GET`, `orientation: vertical`).
    pub(crate) fn word(&mut self, key: &str) -> Result<Option<(String, &'a Ident)>, StructuralError> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Str { value, .. } => Ok(Some((value.clone(), property.key))),
            Value::Path(path) => match path.as_name() {
                Some(name) => Ok(Some((name.name.clone(), property.key))),
                None => Err(self.mismatch(property, "a name or string")),
            },
            _ => Err(self.mismatch(property, "a name or string")),
        }
    }

    pub(crate) fn bool(&mut self, key: &str) -> PropResult<bool> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Bool { value, .. } => Ok(Some(*value)),
            _ => Err(self.mismatch(property, "a boolean")),
        }
    }

    pub(crate) fn uint<T: TryFrom<i64>>(&mut self, key: &str) -> PropResult<T> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Int { value, .. } => T::try_from(*value).map(Some).map_err(|_| {
                self.invalid(property.key, &format!("value {value} is out of range"))
            }),
            _ => Err(self.mismatch(property, "a non-negative integer")),
        }
    }

    pub(crate) fn scalar(&mut self, key: &str) -> PropResult<Scalar> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        scalar(property.value)
            .map(Some)
            .ok_or_else(|| self.mismatch(property, "a literal value"))
    }

    /// Bare declaration name (`entity: Temperature`).
    pub(crate) fn name(&mut self, key: &str) -> PropResult<&'a Ident> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Path(path) => match path.as_name() {
                Some(name) => Ok(Some(name)),
                None => Err(self.mismatch(property, "a name")),
            },
            _ => Err(self.mismatch(property, "a name")),
        }
    }

    /// List of bare names; a single name is accepted as a one-element list.
    pub(crate) fn names(&mut self, key: &str) -> PropResult<Vec<&'a Ident>> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        let items = match property.value {
            Value::List { items, .. } => items.as_slice(),
            value @ Value::Path(_) => std::slice::from_ref(value),
            _ => return Err(self.mismatch(property, "a list of names")),
        };

        items
            .iter()
            .map(|item| match item {
                Value::Path(path) => path.as_name().ok_or(()),
                _ => Err(()),
            })
            .collect::<Result<Vec<_>, ()>>()
            .map(Some)
            .map_err(|()| self.mismatch(property, "a list of names"))
    }

    pub(crate) fn path(&mut self, key: &str) -> PropResult<&'a AccessPath> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Path(path) => Ok(Some(path)),
            _ => Err(self.mismatch(property, "an access path")),
        }
    }

    pub(crate) fn paths(&mut self, key: &str) -> PropResult<Vec<&'a AccessPath>> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        let Value::List { items, .. } = property.value else {
            return Err(self.mismatch(property, "a list of access paths"));
        };

        items
            .iter()
            .map(|item| match item {
                Value::Path(path) => Some(path),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or_else(|| self.mismatch(property, "a list of access paths"))
    }

    pub(crate) fn map(&mut self, key: &str) -> PropResult<&'a [(Ident, Value)]> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::Map { entries, .. } => Ok(Some(entries.as_slice())),
            _ => Err(self.mismatch(property, "a map")),
        }
    }

    pub(crate) fn list(&mut self, key: &str) -> PropResult<&'a [Value]> {
        let Some(property) = self.take(key) else {
            return Ok(None);
        };
        match property.value {
            Value::List { items, .. } => Ok(Some(items.as_slice())),
            _ => Err(self.mismatch(property, "a list")),
        }
    }

    /// Reject every property that was never read.
    pub(crate) fn finish(self) -> Result<(), StructuralError> {
        match self.entries.iter().find(|entry| !entry.used) {
            Some(entry) => Err(StructuralError::at(
                format!("unknown property '{}' on {}", entry.key, self.owner),
                self.sources.location(entry.key.span),
            )),
            None => Ok(()),
        }
    }
}

pub(crate) fn scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Str { value, .. } => Some(Scalar::Text(value.clone())),
        Value::Int { value, .. } => Some(Scalar::Int(*value)),
        Value::Float { value, .. } => Some(Scalar::Float(*value)),
        Value::Bool { value, .. } => Some(Scalar::Bool(*value)),
        Value::Path(_) | Value::List { .. } | Value::Map { .. } => None,
    }
}
