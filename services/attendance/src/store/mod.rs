//! Storage for the user directory and the attendance log
//!
//! Both leaf stores sit behind one trait so the toggle engine and the
//! attendance view can run against PostgreSQL in production and against
//! memory in tests.

use async_trait::async_trait;

use crate::{
    error::AttendanceResult,
    models::{AttendanceEvent, ScanType, StatusRow, User},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgAttendanceStore;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert a new user. Fails with `DuplicateBadge` when the UID exists.
    async fn insert_user(&self, rfid_uid: &str, name: &str) -> AttendanceResult<User>;

    async fn find_user_by_rfid(&self, rfid_uid: &str) -> AttendanceResult<Option<User>>;

    /// Most recent event for the user: greatest `scan_time`, then greatest `log_id`.
    async fn latest_event(&self, user_id: i64) -> AttendanceResult<Option<AttendanceEvent>>;

    /// Append an event stamped with the current time.
    async fn append_event(
        &self,
        user_id: i64,
        scan_type: ScanType,
        device_id: Option<&str>,
    ) -> AttendanceResult<AttendanceEvent>;

    /// Every user with their latest event, ordered by name then `user_id`.
    async fn current_status(&self) -> AttendanceResult<Vec<StatusRow>>;

    async fn health_check(&self) -> AttendanceResult<bool>;
}
