//! Attendance view: latest status per registered user

use std::sync::Arc;

use chrono::SecondsFormat;

use crate::{
    error::AttendanceResult,
    models::{AttendanceRecord, StatusRow},
    store::AttendanceStore,
};

/// Header row of the CSV report
pub const CSV_HEADER: &str = "RFID,Name,Department,Status,Last Scan";

/// Read side over the user directory joined with the attendance log
#[derive(Clone)]
pub struct AttendanceView {
    store: Arc<dyn AttendanceStore>,
}

impl AttendanceView {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    /// One row per registered user, sorted by name. Users who never
    /// scanned carry no status and no time.
    pub async fn list_current_status(&self) -> AttendanceResult<Vec<StatusRow>> {
        self.store.current_status().await
    }

    /// Rows in the shape served to the dashboard
    pub async fn list_records(&self) -> AttendanceResult<Vec<AttendanceRecord>> {
        let rows = self.list_current_status().await?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }
}

/// Render records as the dashboard's CSV report.
///
/// Fields are joined with commas verbatim: values containing commas are not
/// quoted, and missing values become empty fields.
pub fn render_csv(records: &[AttendanceRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        let status = record.status.map(|s| s.as_str()).unwrap_or_default();
        let last_scan = record
            .last_scan
            .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .unwrap_or_default();

        lines.push(
            [
                record.rfid.as_str(),
                record.name.as_str(),
                record.department,
                status,
                last_scan.as_str(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}
