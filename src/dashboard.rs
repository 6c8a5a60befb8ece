//! Read-only web dashboard.
//!
//! Each incoming request replays the event log from scratch and renders the
//! resulting report; nothing is cached between requests, and there are no
//! mutation routes. HTML rendering is a pure function over the report
//! view-model so the presentation logic is testable without a server.

use crate::report::{self, HealthStatus, Report};
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("failed to start dashboard on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

/// Serves the dashboard until the process is terminated.
///
/// Only `GET /` is routed; everything else is a 404. A report that cannot
/// be built (log unreadable) yields a 500 for that request and the server
/// keeps running.
pub fn serve(addr: &str, log_path: &Path) -> Result<(), DashboardError> {
    let server = tiny_http::Server::http(addr).map_err(|e| DashboardError::Bind {
        addr: addr.to_string(),
        reason: e.to_string(),
    })?;

    info!("Dashboard listening on http://{}", addr);

    for request in server.incoming_requests() {
        let response = match request.url() {
            "/" => match report::build_report(log_path) {
                Ok(report) => html_response(render_html(&report)),
                Err(e) => {
                    warn!("Failed to build report: {}", e);
                    tiny_http::Response::from_string("report unavailable").with_status_code(500)
                }
            },
            _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
        };

        if let Err(e) = request.respond(response) {
            warn!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

fn html_response(body: String) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let mut response = tiny_http::Response::from_string(body);
    if let Ok(header) =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
    {
        response.add_header(header);
    }
    response
}

/// CSS class of the status bar for the given health state.
fn status_class(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::NoSession => "status-error",
        HealthStatus::Anomalies(_) => "status-warn",
        HealthStatus::AllClear => "status-ok",
    }
}

/// Metric cards turn loud only when their count is nonzero.
fn card_class(count: usize, loud: &'static str) -> &'static str {
    if count > 0 { loud } else { "info" }
}

pub fn render_html(report: &Report) -> String {
    let summary = report.session.clone().unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="30">
<title>File Integrity Dashboard</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; background-color: #f4f7f6; color: #333; margin: 0; padding: 20px; }}
.container {{ max-width: 800px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 4px 12px rgba(0,0,0,0.05); overflow: hidden; }}
header {{ background-color: #2c3e50; color: white; padding: 20px 30px; border-bottom: 4px solid #3498db; }}
header h1 {{ margin: 0; font-size: 1.8em; }}
header p {{ margin: 5px 0 0; color: #ecf0f1; }}
.status-bar {{ padding: 15px 30px; font-weight: 600; font-size: 1.1em; }}
.status-ok {{ background-color: #e8f5e9; color: #2e7d32; }}
.status-warn {{ background-color: #fff3e0; color: #e65100; }}
.status-error {{ background-color: #ffebee; color: #c62828; }}
.summary {{ padding: 30px; border-bottom: 1px solid #eee; }}
.metrics {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 20px; }}
.metric-card {{ background-color: #f9f9f9; border: 1px solid #eee; border-radius: 8px; padding: 20px; text-align: center; }}
.metric-card .number {{ font-size: 2.2em; font-weight: 600; margin: 10px 0; color: #2c3e50; }}
.metric-card .label {{ font-size: 0.9em; color: #7f8c8d; }}
.metric-card.safe .number {{ color: #27ae60; }}
.metric-card.danger .number {{ color: #c0392b; }}
.metric-card.warning .number {{ color: #d35400; }}
.metric-card.info .number {{ color: #2980b9; }}
footer {{ padding: 20px 30px; background-color: #fdfdfd; border-top: 1px solid #eee; color: #95a5a6; font-size: 0.9em; }}
</style>
</head>
<body>
<div class="container">
<header>
<h1>File Integrity Dashboard</h1>
<p>Last check: {last_check}</p>
</header>
<div class="status-bar {status_class}">{status_line}</div>
<div class="summary">
<div class="metrics">
<div class="metric-card safe">
<div class="number">{verified}</div>
<div class="label">Verified files</div>
</div>
<div class="metric-card {modified_class}">
<div class="number">{modified}</div>
<div class="label">Modified files</div>
</div>
<div class="metric-card {deleted_class}">
<div class="number">{deleted}</div>
<div class="label">Deleted files</div>
</div>
<div class="metric-card {unknown_class}">
<div class="number">{unknown}</div>
<div class="label">Unknown files</div>
</div>
</div>
</div>
<footer><strong>Last anomaly at:</strong> {last_anomaly}</footer>
</div>
</body>
</html>
"#,
        last_check = report::format_timestamp(summary.started_at),
        status_class = status_class(report.status),
        status_line = report.status_line(),
        verified = summary.verified,
        modified = summary.modified,
        modified_class = card_class(summary.modified, "danger"),
        deleted = summary.deleted,
        deleted_class = card_class(summary.deleted, "warning"),
        unknown = summary.unknown,
        unknown_class = card_class(summary.unknown, "danger"),
        last_anomaly = report::format_timestamp(summary.last_anomaly),
    )
}
