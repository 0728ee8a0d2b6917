//! auditq - A streaming query engine for Linux audit logs.
//!
//! This crate answers "give me every record where field K matches pattern P"
//! over raw `audit.log` text, in one forward pass and without loading the
//! file into memory.
//!
//! # Features
//!
//! - **Field constraints**: any number of `field => regex` pairs, ANDed
//! - **Rule selection**: a `key` constraint keeps or drops whole event blocks
//! - **Time windows**: `older` / `newer` bounds checked before tokenization
//! - **Projection**: return only the fields you ask for
//! - **Streaming**: iterate records as they are read, or collect them
//!
//! # Quick Start
//!
//! ```no_run
//! use auditq::{AuditLog, Query};
//!
//! let log = AuditLog::open("/var/log/audit/audit.log", ["timestamp", "name"])?;
//! let query = Query::from_pairs([
//!     ("type", "PATH"),
//!     ("key", "backup_watch"),
//!     ("newer", "1364481363"),
//! ])?;
//!
//! for record in log.search(&query)? {
//!     println!("{} {}", record.get("timestamp").unwrap_or("-"), record.get("name").unwrap_or("-"));
//! }
//! # Ok::<(), auditq::Error>(())
//! ```
//!
//! # Matching Semantics
//!
//! Lines are processed in this order:
//! 1. Non-SYSCALL lines of a rejected block are skipped without parsing
//! 2. Lines outside the time window are skipped without tokenizing
//! 3. The line is tokenized; `line` and `timestamp` are added
//! 4. A SYSCALL record with a `key` constraint opens or closes a block
//! 5. Constraints on fields the record lacks pass; others must match
//! 6. The record is projected to the requested fields

mod audit_log;
mod error;
mod projection;
mod record;

pub mod query;
pub mod scan;
pub mod timestamp;
pub mod tokenizer;

// Re-export core types
pub use audit_log::{AuditLog, DEFAULT_LOG_PATH};
pub use error::{Error, Result};
pub use projection::Projection;
pub use query::{Query, QueryConfig};
pub use record::{Record, LINE_FIELD, TIMESTAMP_FIELD};
pub use scan::{search_reader, Scan, ScanStats};
