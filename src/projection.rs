//! Output field projection.

use ahash::AHashSet;

use crate::Record;

/// Projection reduces records to a requested set of fields.
///
/// An empty field list keeps every field.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    fields: AHashSet<String>,
}

impl Projection {
    /// Keep every field.
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep only the named fields.
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this projection keeps every field.
    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check whether a field is retained.
    pub fn retains(&self, field: &str) -> bool {
        self.is_all() || self.fields.contains(field)
    }

    /// Drop the fields of `record` this projection does not retain.
    pub fn apply(&self, record: &mut Record) {
        if self.is_all() {
            return;
        }
        record.retain(|name| self.fields.contains(name));
    }
}
