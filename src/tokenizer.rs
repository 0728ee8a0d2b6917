//! Audit line tokenizer.
//!
//! Audit lines are space-separated `key=value` tokens with optionally
//! double-quoted values. Multi-value fields are packed with the ASCII group
//! separator; those are flattened to spaces so each sub-value becomes a token
//! of its own.

use crate::Record;

/// ASCII group separator used by auditd to pack enriched fields.
pub const GROUP_SEPARATOR: char = '\u{1d}';

/// Tokenize a raw audit line into a record.
///
/// Each token is split on its first `=`; the remainder (including further
/// `=` characters) is the value. Tokens without `=` get an empty value.
/// Double quotes are removed everywhere in a token.
///
/// Returns `None` when no token survives.
///
/// # Examples
/// ```
/// use auditq::tokenizer::tokenize;
///
/// let record = tokenize("type=EXECVE argc=1 a0=\"a=b\"").unwrap();
/// assert_eq!(record.get("type"), Some("EXECVE"));
/// assert_eq!(record.get("a0"), Some("a=b"));
/// ```
pub fn tokenize(line: &str) -> Option<Record> {
    let mut record = Record::new();
    let flattened = line.replace(GROUP_SEPARATOR, " ");

    for token in flattened.split(' ') {
        if token.is_empty() {
            continue;
        }

        let token = token.replace('"', "");
        let token = token.trim_end_matches(['\n', '\r']);
        if token.is_empty() {
            continue;
        }

        match token.split_once('=') {
            Some((key, value)) => record.insert(key, value),
            None => record.insert(token, ""),
        }
    }

    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}
