//! Reconstruction of the most recent check session by replaying the event
//! log.
//!
//! The log is the only persisted record of scan outcomes, so the summary a
//! human sees is derived entirely from one pass over the last session's
//! records. The replay must find the last session by scanning backward,
//! stop at the session's end marker (or tolerate its absence when a check
//! was interrupted), skip malformed lines, and take the chronological
//! maximum of anomaly timestamps. Both the CLI report and the dashboard
//! consume this one implementation.

use crate::event_log::{EventLogError, EventRecord, SESSION_END, SESSION_START, Severity};
use chrono::NaiveDateTime;
use std::io::ErrorKind;
use std::path::Path;

/// Aggregate outcome of one check session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub verified: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unknown: usize,
    /// Timestamp of the session-start marker.
    pub started_at: Option<NaiveDateTime>,
    /// Chronologically latest warning-or-alert timestamp in the session.
    pub last_anomaly: Option<NaiveDateTime>,
}

impl SessionSummary {
    pub fn anomaly_count(&self) -> usize {
        self.modified + self.deleted + self.unknown
    }
}

/// Reads and parses every record in the log file.
///
/// Lines that don't parse as records are skipped. A missing log file yields
/// an empty record list, which downstream reports as "no session yet".
pub fn read_records(path: &Path) -> Result<Vec<EventRecord>, EventLogError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(EventLogError::Io(e)),
    };

    Ok(content.lines().filter_map(EventRecord::parse_line).collect())
}

/// Reconstructs the last session from a parsed record sequence.
///
/// Scans backward for the most recent session-start marker; returns `None`
/// if no session was ever logged. From the marker, walks forward until the
/// end marker or end of input. A log truncated mid-session (process killed
/// during a check) is a valid, if incomplete, session.
pub fn last_session(records: &[EventRecord]) -> Option<SessionSummary> {
    let start = records.iter().rposition(|r| r.message == SESSION_START)?;

    let mut summary = SessionSummary {
        started_at: Some(records[start].timestamp),
        ..SessionSummary::default()
    };

    for record in &records[start + 1..] {
        if record.message == SESSION_END {
            break;
        }

        match (record.severity, record.message.as_str()) {
            (Severity::Info, m) if m.contains("verified OK") => summary.verified += 1,
            (Severity::Warning, m) if m.contains("integrity failed") => summary.modified += 1,
            (Severity::Warning, m) if m.contains("DELETED") => summary.deleted += 1,
            (Severity::Alert, m) if m.contains("Unknown file") => summary.unknown += 1,
            _ => {}
        }

        if record.severity >= Severity::Warning {
            summary.last_anomaly = summary.last_anomaly.max(Some(record.timestamp));
        }
    }

    Some(summary)
}
