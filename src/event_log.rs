//! The append-only audit log.
//!
//! Every check session is written here as timestamped, leveled records
//! bracketed by reserved session markers. The log is the sole persistent
//! record of scan outcomes: reporting reconstructs state by replaying it
//! (see the session module). This module only ever appends; nothing here
//! truncates or rewrites the file.
//!
//! Records are dispatched to an explicit list of sinks, each with its own
//! minimum severity. The default configuration writes everything to the log
//! file and echoes warnings and alerts to the console.

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Reserved sentinel messages delimiting one check session in the log.
/// Nothing else ever logs these exact messages.
pub const SESSION_START: &str = "--- integrity check started ---";
pub const SESSION_END: &str = "--- integrity check completed ---";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

/// Record severity, ordered from least to most severe.
///
/// `Alert` outranks ordinary warnings and is reserved for two conditions:
/// hash-mismatch-confirmed tampering and previously-unseen files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Alert => "ALERT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized severity: {0}")]
pub struct ParseSeverityError(String);

impl std::str::FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ALERT" => Ok(Severity::Alert),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

/// One parsed log record: `[<timestamp>] <LEVEL>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: String,
}

impl EventRecord {
    pub fn format_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity,
            self.message
        )
    }

    /// Parses one log line. Returns `None` for anything that does not match
    /// the record format; malformed lines are the caller's problem to skip,
    /// never a hard error.
    pub fn parse_line(line: &str) -> Option<EventRecord> {
        let rest = line.strip_prefix('[')?;
        let (timestamp_str, rest) = rest.split_once("] ")?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT).ok()?;
        let (level_str, message) = rest.split_once(": ")?;
        let severity = level_str.parse().ok()?;

        Some(EventRecord {
            timestamp,
            severity,
            message: message.to_string(),
        })
    }
}

/// A destination for event records with its own minimum severity filter.
pub trait LogSink {
    fn min_severity(&self) -> Severity;
    fn write_record(&mut self, record: &EventRecord) -> std::io::Result<()>;
}

/// Durable sink: appends records to the log file.
pub struct FileSink {
    file: File,
    min_severity: Severity,
}

impl FileSink {
    pub fn append(path: &Path, min_severity: Severity) -> Result<Self, EventLogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    EventLogError::PermissionDenied(path.to_path_buf())
                } else {
                    EventLogError::Io(e)
                }
            })?;

        Ok(FileSink { file, min_severity })
    }
}

impl LogSink for FileSink {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn write_record(&mut self, record: &EventRecord) -> std::io::Result<()> {
        writeln!(self.file, "{}", record.format_line())
    }
}

/// Console sink: mirrors records to stderr so anomalies are visible even
/// when nobody is watching the log file.
pub struct ConsoleSink {
    min_severity: Severity,
}

impl ConsoleSink {
    pub fn new(min_severity: Severity) -> Self {
        ConsoleSink { min_severity }
    }
}

impl LogSink for ConsoleSink {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn write_record(&mut self, record: &EventRecord) -> std::io::Result<()> {
        writeln!(std::io::stderr().lock(), "{}", record.format_line())
    }
}

/// An explicitly constructed logging context. Owned by the command that
/// runs a scan; there is no process-global logger.
pub struct EventLog {
    sinks: Vec<Box<dyn LogSink>>,
}

impl EventLog {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        EventLog { sinks }
    }

    /// Standard monitoring configuration: every record to the log file,
    /// warnings and above echoed to the console.
    pub fn open(path: &Path) -> Result<Self, EventLogError> {
        Ok(EventLog::new(vec![
            Box::new(FileSink::append(path, Severity::Info)?),
            Box::new(ConsoleSink::new(Severity::Warning)),
        ]))
    }

    pub fn emit(&mut self, severity: Severity, message: &str) -> Result<(), EventLogError> {
        let record = EventRecord {
            timestamp: Local::now().naive_local(),
            severity,
            message: message.to_string(),
        };

        for sink in &mut self.sinks {
            if record.severity >= sink.min_severity() {
                sink.write_record(&record)?;
            }
        }

        Ok(())
    }

    pub fn info(&mut self, message: &str) -> Result<(), EventLogError> {
        self.emit(Severity::Info, message)
    }

    pub fn warn(&mut self, message: &str) -> Result<(), EventLogError> {
        self.emit(Severity::Warning, message)
    }

    pub fn alert(&mut self, message: &str) -> Result<(), EventLogError> {
        self.emit(Severity::Alert, message)
    }

    pub fn session_start(&mut self) -> Result<(), EventLogError> {
        self.info(SESSION_START)
    }

    pub fn session_end(&mut self) -> Result<(), EventLogError> {
        self.info(SESSION_END)
    }
}
