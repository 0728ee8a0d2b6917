//! YAML query files.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::Query;
use crate::{Error, Result};

/// A query as written in a YAML file.
///
/// ```yaml
/// file: /var/log/audit/audit.log
/// returning: [timestamp, name]
/// where:
///   type: PATH
///   key: backup_watch
///   newer: 1364481363
/// ```
///
/// Scalar values (strings, numbers, booleans) are used as pattern text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Log file to search
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Fields to keep in output; empty keeps all
    #[serde(default)]
    pub returning: Vec<String>,
    /// Field constraints
    #[serde(default, rename = "where")]
    pub constraints: IndexMap<String, Value>,
}

impl QueryConfig {
    /// Parse a query file from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a query file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Constraints as `(field, pattern text)` pairs.
    pub fn pairs(&self) -> Result<Vec<(String, String)>> {
        self.constraints
            .iter()
            .map(|(field, value)| Ok((field.clone(), scalar_text(field, value)?)))
            .collect()
    }

    /// Compile the constraints into a [`Query`].
    pub fn to_query(&self) -> Result<Query> {
        Query::from_pairs(self.pairs()?)
    }
}

fn scalar_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::Config(format!(
            "constraint `{}` must be a string or number",
            field
        ))),
    }
}
