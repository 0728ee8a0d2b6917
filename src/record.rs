//! Parsed audit records.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Synthetic field holding the processed-record counter.
pub const LINE_FIELD: &str = "line";

/// Synthetic field holding the event timestamp.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Record is one parsed audit log line: field name to field value.
///
/// Fields keep the order of their first occurrence on the line. Inserting a
/// name that already exists replaces the value in place.
///
/// # Examples
/// ```
/// use auditq::Record;
///
/// let mut record = Record::new();
/// record.insert("type", "PATH");
/// record.insert("name", "/etc/passwd");
/// record.insert("type", "CWD");
///
/// let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
/// assert_eq!(names, ["type", "name"]);
/// assert_eq!(record.get("type"), Some("CWD"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Check whether the record carries a field.
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Insert a field, overwriting an earlier value of the same name.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Keep only the fields for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.fields.retain(|name, _| keep(name));
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The processed-record counter, if the field survived projection.
    pub fn line(&self) -> Option<u64> {
        self.get(LINE_FIELD)?.parse().ok()
    }

    /// The event timestamp in seconds, if the field survived projection.
    pub fn timestamp(&self) -> Option<f64> {
        self.get(TIMESTAMP_FIELD)?.parse().ok()
    }

    /// Consume the record and return the underlying map.
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
