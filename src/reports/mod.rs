use chrono::{DateTime, Utc};
use tracing::info;

use crate::datetime::file_stamp;
use crate::error::TransportError;
use crate::request::Transport;
use crate::types::ReportScope;

pub mod components;

pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn report_filename(scope: ReportScope, now: DateTime<Utc>) -> String {
    let target = match scope {
        ReportScope::Unit(id) => id.to_string(),
        ReportScope::All => "all".to_string(),
    };
    format!("fleet_report_{target}_{}.xlsx", file_stamp(now))
}

/// The spreadsheet is generated remotely, the bytes are passed through untouched.
pub async fn fetch_report<T: Transport>(
    transport: &T,
    scope: ReportScope,
    now: DateTime<Utc>,
) -> Result<ReportFile, TransportError> {
    let bytes = transport.export_report(scope).await?;
    let filename = report_filename(scope, now);
    info!(filename = %filename, size = bytes.len(), "report downloaded");

    Ok(ReportFile { filename, bytes })
}
