//! Per-scan state and counters.

use regex::Regex;
use std::fmt;

use crate::Record;

/// Line tag that opens a new block.
pub const SYSCALL: &str = "SYSCALL";

/// State threaded from one line to the next during a scan.
///
/// Each scan owns its own state; nothing is shared between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    /// Whether the current block belongs to the requested rule
    pub in_block: bool,
    /// Records that reached tokenization so far
    pub line: u64,
}

impl Default for ScanState {
    fn default() -> Self {
        // Lines before the first SYSCALL are not dropped.
        Self {
            in_block: true,
            line: 0,
        }
    }
}

impl ScanState {
    /// Update block membership from a tokenized record.
    ///
    /// Only SYSCALL records open a block, and only a query with a rule key
    /// can reject one. A SYSCALL record without `key` is matched as empty.
    /// Returns the new membership.
    pub fn enter_block(&mut self, record: &Record, key: Option<&Regex>) -> bool {
        if let Some(key) = key {
            if record.get("type") == Some(SYSCALL) {
                self.in_block = key.is_match(record.get("key").unwrap_or(""));
            }
        }
        self.in_block
    }
}

/// Cheap pre-parse test: can this line be skipped outright?
///
/// Lines outside a wanted block are skipped unless they might open a new one.
pub fn prefilter(line: &str, state: &ScanState) -> bool {
    !state.in_block && !line.contains(SYSCALL)
}

/// Why a line produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Outside a wanted block
    Prefiltered,
    /// No timestamp or no tokens
    Malformed,
    /// Outside the `older` / `newer` window
    OutOfWindow,
    /// SYSCALL line of an unwanted rule
    BlockSuppressed,
    /// Failed a field constraint
    Rejected,
}

/// Line counts per outcome for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: u64,
    pub prefiltered: u64,
    pub malformed: u64,
    pub out_of_window: u64,
    pub block_suppressed: u64,
    pub rejected: u64,
    pub accepted: u64,
}

impl ScanStats {
    /// Count one skipped line.
    pub fn record_skip(&mut self, skip: Skip) {
        self.lines += 1;
        match skip {
            Skip::Prefiltered => self.prefiltered += 1,
            Skip::Malformed => self.malformed += 1,
            Skip::OutOfWindow => self.out_of_window += 1,
            Skip::BlockSuppressed => self.block_suppressed += 1,
            Skip::Rejected => self.rejected += 1,
        }
    }

    /// Count one returned record.
    pub fn record_accept(&mut self) {
        self.lines += 1;
        self.accepted += 1;
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines: {} accepted, {} prefiltered, {} malformed, {} out of window, {} block-suppressed, {} rejected",
            self.lines,
            self.accepted,
            self.prefiltered,
            self.malformed,
            self.out_of_window,
            self.block_suppressed,
            self.rejected
        )
    }
}
