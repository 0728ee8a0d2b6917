//! Single-pass scanning of audit log streams.
//!
//! Each line runs through the same stages in order:
//!
//! 1. Pre-filter: skip non-SYSCALL lines of an unwanted block
//! 2. Timestamp: extract the event time and apply `older` / `newer`
//! 3. Tokenize: build the record and bump the line counter
//! 4. Block tracking: a SYSCALL record re-evaluates the rule key
//! 5. Constraints and projection
//!
//! The only carry-over between lines is [`ScanState`], passed explicitly to
//! [`process_line`].

mod state;

pub use state::{prefilter, ScanState, ScanStats, Skip, SYSCALL};

use std::io::BufRead;

use crate::record::{LINE_FIELD, TIMESTAMP_FIELD};
use crate::timestamp::Timestamp;
use crate::tokenizer::tokenize;
use crate::{Projection, Query, Record, Result};

/// Outcome of processing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The record passed every stage
    Accepted(Record),
    /// The line produced no record
    Skipped(Skip),
}

/// Run one line through the pipeline, updating `state`.
///
/// `line` should not carry its trailing newline.
///
/// # Examples
/// ```
/// use auditq::scan::{process_line, LineOutcome, ScanState};
/// use auditq::{Projection, Query};
///
/// let query = Query::from_pairs([("type", "CWD")]).unwrap();
/// let mut state = ScanState::default();
///
/// let outcome = process_line(&mut state, "type=CWD msg=audit(10.5:3): cwd=\"/root\"", &query, &Projection::all());
/// match outcome {
///     LineOutcome::Accepted(record) => assert_eq!(record.get("cwd"), Some("/root")),
///     LineOutcome::Skipped(skip) => panic!("skipped: {:?}", skip),
/// }
/// assert_eq!(state.line, 1);
/// ```
pub fn process_line(
    state: &mut ScanState,
    line: &str,
    query: &Query,
    projection: &Projection,
) -> LineOutcome {
    if prefilter(line, state) {
        return LineOutcome::Skipped(Skip::Prefiltered);
    }

    let timestamp = match Timestamp::parse(line) {
        Some(ts) => ts,
        None => return LineOutcome::Skipped(Skip::Malformed),
    };
    if !query.window().contains(timestamp.seconds) {
        return LineOutcome::Skipped(Skip::OutOfWindow);
    }

    let tokens = match tokenize(line) {
        Some(tokens) => tokens,
        None => return LineOutcome::Skipped(Skip::Malformed),
    };
    state.line += 1;
    let mut record = with_synthetic_fields(tokens, state.line, timestamp.raw);

    if !state.enter_block(&record, query.key()) {
        return LineOutcome::Skipped(Skip::BlockSuppressed);
    }

    if !query.matches(&record) {
        return LineOutcome::Skipped(Skip::Rejected);
    }

    projection.apply(&mut record);
    LineOutcome::Accepted(record)
}

/// Put `line` and `timestamp` first; they win over same-named tokens.
fn with_synthetic_fields(tokens: Record, line: u64, timestamp: &str) -> Record {
    let line = line.to_string();
    let mut record = Record::new();
    record.insert(LINE_FIELD, line.as_str());
    record.insert(TIMESTAMP_FIELD, timestamp);
    for (name, value) in tokens.into_inner() {
        record.insert(name, value);
    }
    record.insert(LINE_FIELD, line);
    record.insert(TIMESTAMP_FIELD, timestamp);
    record
}

/// Streaming iterator over the records of an audit log that match a query.
///
/// Reads the underlying stream once, line by line. A read error is yielded
/// once and ends the scan. Invalid UTF-8 is decoded lossily.
pub struct Scan<'a, R> {
    reader: R,
    query: &'a Query,
    projection: &'a Projection,
    state: ScanState,
    stats: ScanStats,
    buf: Vec<u8>,
    done: bool,
}

impl<'a, R: BufRead> Scan<'a, R> {
    /// Start a scan over `reader`.
    pub fn new(reader: R, query: &'a Query, projection: &'a Projection) -> Self {
        Self {
            reader,
            query,
            projection,
            state: ScanState::default(),
            stats: ScanStats::default(),
            buf: Vec::new(),
            done: false,
        }
    }

    /// Counters for the lines read so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Current carry-over state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    fn finish(&mut self) {
        self.done = true;
        log::debug!("Scan finished: {}", self.stats);
    }
}

impl<R: BufRead> Iterator for Scan<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.finish();
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finish();
                    return Some(Err(e.into()));
                }
            }

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end_matches(['\n', '\r']);

            match process_line(&mut self.state, line, self.query, self.projection) {
                LineOutcome::Accepted(record) => {
                    self.stats.record_accept();
                    return Some(Ok(record));
                }
                LineOutcome::Skipped(skip) => self.stats.record_skip(skip),
            }
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for Scan<'_, R> {}

/// Scan `reader` to the end and collect the matching records.
///
/// Stops at the first read error.
pub fn search_reader<R: BufRead>(
    reader: R,
    query: &Query,
    projection: &Projection,
) -> Result<Vec<Record>> {
    Scan::new(reader, query, projection).collect()
}
