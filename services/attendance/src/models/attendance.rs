//! Attendance log models and the scan/view payloads built from them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder department reported for every row; the column is not stored
pub const UNKNOWN_DEPARTMENT: &str = "N/A";

/// Direction of a recorded tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanType {
    In,
    Out,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::In => "IN",
            ScanType::Out => "OUT",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored scan type that is neither `IN` nor `OUT`
#[derive(Error, Debug)]
#[error("Unknown scan type: {0}")]
pub struct UnknownScanType(pub String);

impl FromStr for ScanType {
    type Err = UnknownScanType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(ScanType::In),
            "OUT" => Ok(ScanType::Out),
            other => Err(UnknownScanType(other.to_string())),
        }
    }
}

/// One row of the append-only attendance log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEvent {
    pub log_id: i64,
    pub user_id: i64,
    pub scan_type: ScanType,
    pub scan_time: DateTime<Utc>,
    pub device_id: Option<String>,
}

/// A registered user joined with their most recent attendance event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub user_id: i64,
    pub rfid_uid: String,
    pub name: String,
    pub status: Option<ScanType>,
    pub last_scan: Option<DateTime<Utc>>,
}

/// Row returned by `GET /api/attendance`
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub user_id: i64,
    pub rfid: String,
    pub name: String,
    pub department: &'static str,
    pub status: Option<ScanType>,
    #[serde(rename = "lastScan")]
    pub last_scan: Option<DateTime<Utc>>,
}

impl From<StatusRow> for AttendanceRecord {
    fn from(row: StatusRow) -> Self {
        Self {
            user_id: row.user_id,
            rfid: row.rfid_uid,
            name: row.name,
            department: UNKNOWN_DEPARTMENT,
            status: row.status,
            last_scan: row.last_scan,
        }
    }
}

/// Request body for `POST /api/scan`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    pub rfid_uid: Option<String>,
    pub device_id: Option<String>,
}

/// Response body for `POST /api/scan`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Enroll {
        enroll: bool,
        rfid_uid: String,
        message: &'static str,
    },
    Attendance {
        success: bool,
        rfid_uid: String,
        status: ScanType,
        name: String,
    },
}

/// Generic `{ "success": true }` acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response body for `GET /api/enroll/latest`
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentLatestResponse {
    pub rfid_uid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scan_type_parses_stored_values() {
        assert_eq!("IN".parse::<ScanType>().unwrap(), ScanType::In);
        assert_eq!("OUT".parse::<ScanType>().unwrap(), ScanType::Out);
        assert!("in".parse::<ScanType>().is_err());
    }

    #[test]
    fn attendance_record_uses_dashboard_field_names() {
        let record = AttendanceRecord::from(StatusRow {
            user_id: 7,
            rfid_uid: "RFID007".to_string(),
            name: "Zed".to_string(),
            status: None,
            last_scan: None,
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "user_id": 7,
                "rfid": "RFID007",
                "name": "Zed",
                "department": "N/A",
                "status": null,
                "lastScan": null,
            })
        );
    }

    #[test]
    fn scan_response_shapes() {
        let enroll = ScanResponse::Enroll {
            enroll: true,
            rfid_uid: "RFID099".to_string(),
            message: "RFID captured for enrollment",
        };
        assert_eq!(
            serde_json::to_value(&enroll).unwrap(),
            json!({"enroll": true, "rfid_uid": "RFID099", "message": "RFID captured for enrollment"})
        );

        let attendance = ScanResponse::Attendance {
            success: true,
            rfid_uid: "RFID010".to_string(),
            status: ScanType::Out,
            name: "Ann".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&attendance).unwrap(),
            json!({"success": true, "rfid_uid": "RFID010", "status": "OUT", "name": "Ann"})
        );
    }
}
