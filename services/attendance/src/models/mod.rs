//! Attendance service models

pub mod attendance;
pub mod user;

// Re-export for convenience
pub use attendance::{
    AttendanceEvent, AttendanceRecord, EnrollmentLatestResponse, ScanRequest, ScanResponse,
    ScanType, StatusRow, SuccessResponse,
};
pub use user::{RegisterRfidRequest, User};
