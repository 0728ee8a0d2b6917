//! Event timestamp extraction and time windows.
//!
//! Every kernel audit line carries its event time as
//! `msg=audit(<seconds>.<fraction>:<serial>):`. The extractor pulls the
//! `<seconds>.<fraction>` part out with two substring searches so lines
//! outside the requested window can be dropped before tokenization.

/// Marker preceding the event timestamp.
pub const MARKER: &str = "msg=audit(";

/// Locate the raw timestamp text of a line.
///
/// Returns the text between the first [`MARKER`] and the next `:`, i.e. the
/// serial suffix is discarded. `None` when the marker or the colon is missing.
///
/// # Examples
/// ```
/// use auditq::timestamp::extract;
///
/// assert_eq!(extract("type=CWD msg=audit(1364481363.243:24287): cwd=\"/\""), Some("1364481363.243"));
/// assert_eq!(extract("no marker here"), None);
/// ```
pub fn extract(line: &str) -> Option<&str> {
    let start = line.find(MARKER)? + MARKER.len();
    let rest = &line[start..];
    let end = rest.find(':')?;
    Some(&rest[..end])
}

/// A parsed event timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp<'a> {
    /// Text as it appeared on the line
    pub raw: &'a str,
    /// Seconds since the epoch
    pub seconds: f64,
}

impl<'a> Timestamp<'a> {
    /// Extract and parse the timestamp of a line.
    ///
    /// `None` for lines without a marker or with non-numeric timestamp text.
    pub fn parse(line: &'a str) -> Option<Self> {
        let raw = extract(line)?;
        let seconds = raw.parse::<f64>().ok().filter(|s| s.is_finite())?;
        Some(Self { raw, seconds })
    }
}

/// Inclusive time bounds from the `older` / `newer` query fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    /// Drop events strictly later than this
    pub older: Option<f64>,
    /// Drop events strictly earlier than this
    pub newer: Option<f64>,
}

impl TimeWindow {
    /// Check whether a timestamp falls inside the window.
    pub fn contains(&self, seconds: f64) -> bool {
        if let Some(older) = self.older {
            if seconds > older {
                return false;
            }
        }
        if let Some(newer) = self.newer {
            if seconds < newer {
                return false;
            }
        }
        true
    }

    /// Check if no bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.older.is_none() && self.newer.is_none()
    }
}
