//! Report facade over the session reconstructor.
//!
//! Both the CLI `report` command and the web dashboard consume the same
//! `Report` view-model built here, so the replay logic exists exactly once.

use crate::event_log::{EventLogError, TIMESTAMP_FORMAT};
use crate::session::{self, SessionSummary};
use chrono::NaiveDateTime;
use std::path::Path;

/// Overall health derived from the last session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// No log, or no check session has ever been recorded.
    NoSession,
    /// The last session found this many anomalies.
    Anomalies(usize),
    AllClear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub session: Option<SessionSummary>,
    pub status: HealthStatus,
}

impl Report {
    pub fn from_summary(session: Option<SessionSummary>) -> Self {
        let status = match &session {
            None => HealthStatus::NoSession,
            Some(summary) if summary.anomaly_count() > 0 => {
                HealthStatus::Anomalies(summary.anomaly_count())
            }
            Some(_) => HealthStatus::AllClear,
        };

        Report { session, status }
    }

    pub fn status_line(&self) -> String {
        match self.status {
            HealthStatus::NoSession => "No integrity check has been run yet.".to_string(),
            HealthStatus::Anomalies(count) => {
                format!("WARNING: {} anomalies detected!", count)
            }
            HealthStatus::AllClear => "All files verified and intact.".to_string(),
        }
    }
}

/// Builds a report by replaying the last session of the event log.
/// Recomputed from scratch on every call; nothing is cached.
pub fn build_report(log_path: &Path) -> Result<Report, EventLogError> {
    let records = session::read_records(log_path)?;
    Ok(Report::from_summary(session::last_session(&records)))
}

pub fn format_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(t) => t.format(TIMESTAMP_FORMAT).to_string(),
        None => "N/A".to_string(),
    }
}

/// Plain-text rendering for the CLI `report` command.
pub fn render_text(report: &Report) -> String {
    let Some(summary) = &report.session else {
        return format!("{}\n", report.status_line());
    };

    let mut out = String::new();
    out.push_str("--- Security log report (last check) ---\n");
    out.push_str(&format!("Verified files:  {}\n", summary.verified));
    out.push_str(&format!("Modified files:  {}\n", summary.modified));
    out.push_str(&format!("Deleted files:   {}\n", summary.deleted));
    out.push_str(&format!("Unknown files:   {}\n", summary.unknown));
    out.push_str("----------------------------------------\n");
    out.push_str(&format!(
        "Last check at:   {}\n",
        format_timestamp(summary.started_at)
    ));
    out.push_str(&format!(
        "Last anomaly at: {}\n",
        format_timestamp(summary.last_anomaly)
    ));
    out.push_str(&format!("{}\n", report.status_line()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::fs;
    use tempfile::TempDir;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn summary_with(verified: usize, modified: usize, deleted: usize, unknown: usize) -> SessionSummary {
        SessionSummary {
            verified,
            modified,
            deleted,
            unknown,
            started_at: Some(naive("2024-03-01 10:00:00")),
            last_anomaly: None,
        }
    }

    #[test]
    fn test_status_no_session() {
        let report = Report::from_summary(None);

        assert_eq!(report.status, HealthStatus::NoSession);
        assert_eq!(report.status_line(), "No integrity check has been run yet.");
    }

    #[test]
    fn test_status_all_clear() {
        let report = Report::from_summary(Some(summary_with(3, 0, 0, 0)));

        assert_eq!(report.status, HealthStatus::AllClear);
        assert_eq!(report.status_line(), "All files verified and intact.");
    }

    #[test]
    fn test_status_anomalies_sums_three_buckets() {
        let report = Report::from_summary(Some(summary_with(1, 2, 3, 4)));

        assert_eq!(report.status, HealthStatus::Anomalies(9));
        assert_eq!(report.status_line(), "WARNING: 9 anomalies detected!");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(None), "N/A");
        assert_eq!(
            format_timestamp(Some(naive("2024-03-01 10:00:00"))),
            "2024-03-01 10:00:00"
        );
    }

    #[test]
    fn test_render_text_with_session() {
        let mut summary = summary_with(2, 1, 0, 1);
        summary.last_anomaly = Some(naive("2024-03-01 10:00:04"));
        let report = Report::from_summary(Some(summary));

        let text = render_text(&report);

        assert!(text.contains("Verified files:  2"));
        assert!(text.contains("Modified files:  1"));
        assert!(text.contains("Deleted files:   0"));
        assert!(text.contains("Unknown files:   1"));
        assert!(text.contains("Last anomaly at: 2024-03-01 10:00:04"));
        assert!(text.contains("WARNING: 2 anomalies detected!"));
    }

    #[test]
    fn test_render_text_no_session() {
        let report = Report::from_summary(None);

        assert_eq!(render_text(&report), "No integrity check has been run yet.\n");
    }

    #[test]
    fn test_render_text_no_anomaly_shows_na() {
        let report = Report::from_summary(Some(summary_with(5, 0, 0, 0)));

        let text = render_text(&report);

        assert!(text.contains("Last anomaly at: N/A"));
        assert!(text.contains("All files verified and intact."));
    }

    #[test]
    fn test_build_report_missing_log() {
        let report = build_report(Path::new("/nonexistent/security.log")).unwrap();

        assert_eq!(report.status, HealthStatus::NoSession);
        assert!(report.session.is_none());
    }

    #[test]
    fn test_build_report_from_log_file() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("security.log");

        fs::write(
            &log_path,
            "[2024-03-01 10:00:00] INFO: --- integrity check started ---\n\
             [2024-03-01 10:00:01] INFO: File \"a.txt\" verified OK.\n\
             [2024-03-01 10:00:02] ALERT: Unknown file \"d.txt\" detected.\n\
             [2024-03-01 10:00:03] INFO: --- integrity check completed ---\n",
        )
        .unwrap();

        let report = build_report(&log_path).unwrap();

        assert_eq!(report.status, HealthStatus::Anomalies(1));
        let summary = report.session.unwrap();
        assert_eq!(summary.verified, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.last_anomaly, Some(naive("2024-03-01 10:00:02")));
    }
}
