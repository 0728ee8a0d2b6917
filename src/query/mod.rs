//! Queries: field constraints, rule key and time window.

mod config;

pub use config::QueryConfig;

use indexmap::IndexMap;
use regex::Regex;

use crate::timestamp::TimeWindow;
use crate::{Error, Record, Result};

/// Query field that names the audit rule and drives block filtering.
pub const KEY_FIELD: &str = "key";

/// Query field bounding event time from above.
pub const OLDER_FIELD: &str = "older";

/// Query field bounding event time from below.
pub const NEWER_FIELD: &str = "newer";

/// A set of ANDed field constraints.
///
/// Every field maps to a compiled pattern. A record is rejected only when it
/// carries a constrained field whose value does not match; constraints on
/// fields a record lacks pass vacuously. Patterns search anywhere in the
/// value, anchor them with `^...$` for exact matches.
///
/// `older` and `newer` are decimal timestamps and additionally bound the
/// event time. `key` additionally selects whole blocks by audit rule.
///
/// # Examples
/// ```
/// use auditq::Query;
///
/// let query = Query::from_pairs([("type", "PATH"), ("key", "backup_watch"), ("newer", "1000")]).unwrap();
/// assert!(query.key().is_some());
/// assert_eq!(query.window().newer, Some(1000.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    constraints: IndexMap<String, Regex>,
    window: TimeWindow,
}

impl Query {
    /// Create a query without constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from `(field, pattern)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (field, pattern) in pairs {
            query.insert(field, pattern.as_ref())?;
        }
        Ok(query)
    }

    /// Compile `pattern` and constrain `field` with it.
    pub fn insert(&mut self, field: impl Into<String>, pattern: &str) -> Result<()> {
        let field = field.into();
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            field: field.clone(),
            source,
        })?;
        self.insert_regex(field, regex)
    }

    /// Constrain `field` with an already compiled pattern.
    ///
    /// For `older` / `newer` the pattern text must be a decimal timestamp.
    pub fn insert_regex(&mut self, field: impl Into<String>, pattern: Regex) -> Result<()> {
        let field = field.into();
        if !is_field_name(&field) {
            return Err(Error::InvalidField(field));
        }

        match field.as_str() {
            OLDER_FIELD => self.window.older = Some(parse_bound(&field, pattern.as_str())?),
            NEWER_FIELD => self.window.newer = Some(parse_bound(&field, pattern.as_str())?),
            _ => {}
        }

        self.constraints.insert(field, pattern);
        Ok(())
    }

    /// The rule key pattern, if any.
    pub fn key(&self) -> Option<&Regex> {
        self.constraints.get(KEY_FIELD)
    }

    /// Time bounds from `older` / `newer`.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// All constraints in insertion order, reserved fields included.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Check if the query has no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Check a record against every constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.constraints
            .iter()
            .all(|(field, pattern)| match record.get(field) {
                Some(value) => pattern.is_match(value),
                None => true,
            })
    }
}

/// A name the tokenizer can produce: non-empty, no separators, quotes or `=`.
fn is_field_name(field: &str) -> bool {
    !field.is_empty() && !field.contains([' ', '=', '"', crate::tokenizer::GROUP_SEPARATOR])
}

/// Parse an `older` / `newer` value as seconds since the epoch.
fn parse_bound(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidBound {
            field: field.to_string(),
            value: value.to_string(),
        })
}
