//! Audit log files.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::scan::Scan;
use crate::{Error, Projection, Query, Record, Result};

/// Default location of the kernel audit log.
pub const DEFAULT_LOG_PATH: &str = "/var/log/audit/audit.log";

/// AuditLog queries one audit log file.
///
/// The file is checked once at construction and opened afresh by every
/// search, so independent searches never share state. The handle is closed
/// when the search ends, on every exit path.
///
/// # Examples
/// ```no_run
/// use auditq::{AuditLog, Query};
///
/// let log = AuditLog::open("/var/log/audit/audit.log", ["timestamp", "name"])?;
/// let query = Query::from_pairs([("type", "PATH"), ("key", "backup_watch")])?;
///
/// for record in log.search(&query)? {
///     println!("{}", record);
/// }
/// # Ok::<(), auditq::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
    projection: Projection,
}

impl AuditLog {
    /// Bind to the log at `path`, keeping only the `returning` fields in
    /// results (all fields when empty).
    ///
    /// Fails when `path` is not a readable regular file.
    pub fn open<P, I, S>(path: P, returning: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref();
        // Must be readable, not just present.
        let metadata = File::open(path)?.metadata()?;
        if !metadata.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        log::debug!("Using audit log {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            projection: Projection::only(returning),
        })
    }

    /// Bind to [`DEFAULT_LOG_PATH`], keeping all fields.
    pub fn default_log() -> Result<Self> {
        Self::open(DEFAULT_LOG_PATH, Vec::<String>::new())
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The output projection.
    pub fn returning(&self) -> &Projection {
        &self.projection
    }

    /// Stream the records matching `query`.
    pub fn scan<'a>(&'a self, query: &'a Query) -> Result<Scan<'a, BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(Scan::new(BufReader::new(file), query, &self.projection))
    }

    /// Collect the records matching `query`, in file order.
    pub fn search(&self, query: &Query) -> Result<Vec<Record>> {
        self.scan(query)?.collect()
    }
}
