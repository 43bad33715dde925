//! In-memory attendance store
//!
//! Used by the test suite and by `ATTENDANCE_STORAGE=memory` for running the
//! service without a database. Nothing survives a restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::AttendanceStore;
use crate::{
    error::{AttendanceError, AttendanceResult},
    models::{AttendanceEvent, ScanType, StatusRow, User},
};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    events: Vec<AttendanceEvent>,
}

impl MemoryState {
    fn latest_for(&self, user_id: i64) -> Option<&AttendanceEvent> {
        self.events
            .iter()
            .filter(|e| e.user_id == user_id)
            .max_by_key(|e| (e.scan_time, e.log_id))
    }

    fn push_event(
        &mut self,
        user_id: i64,
        scan_type: ScanType,
        scan_time: DateTime<Utc>,
        device_id: Option<&str>,
    ) -> AttendanceEvent {
        let event = AttendanceEvent {
            log_id: self.events.len() as i64 + 1,
            user_id,
            scan_type,
            scan_time,
            device_id: device_id.map(str::to_string),
        };
        self.events.push(event.clone());
        event
    }
}

/// Attendance store kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl InMemoryStore {
    /// Total number of attendance events recorded
    pub async fn event_count(&self) -> usize {
        self.state.lock().await.events.len()
    }

    /// Append an event with an explicit timestamp
    pub async fn append_event_at(
        &self,
        user_id: i64,
        scan_type: ScanType,
        scan_time: DateTime<Utc>,
    ) -> AttendanceEvent {
        self.state
            .lock()
            .await
            .push_event(user_id, scan_type, scan_time, None)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn insert_user(&self, rfid_uid: &str, name: &str) -> AttendanceResult<User> {
        let mut state = self.state.lock().await;

        if state.users.iter().any(|u| u.rfid_uid == rfid_uid) {
            return Err(AttendanceError::DuplicateBadge(rfid_uid.to_string()));
        }

        let user = User {
            user_id: state.users.len() as i64 + 1,
            rfid_uid: rfid_uid.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_rfid(&self, rfid_uid: &str) -> AttendanceResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.rfid_uid == rfid_uid).cloned())
    }

    async fn latest_event(&self, user_id: i64) -> AttendanceResult<Option<AttendanceEvent>> {
        let state = self.state.lock().await;
        Ok(state.latest_for(user_id).cloned())
    }

    async fn append_event(
        &self,
        user_id: i64,
        scan_type: ScanType,
        device_id: Option<&str>,
    ) -> AttendanceResult<AttendanceEvent> {
        let mut state = self.state.lock().await;
        Ok(state.push_event(user_id, scan_type, Utc::now(), device_id))
    }

    async fn current_status(&self) -> AttendanceResult<Vec<StatusRow>> {
        let state = self.state.lock().await;

        let mut rows: Vec<StatusRow> = state
            .users
            .iter()
            .map(|user| {
                let latest = state.latest_for(user.user_id);
                StatusRow {
                    user_id: user.user_id,
                    rfid_uid: user.rfid_uid.clone(),
                    name: user.name.clone(),
                    status: latest.map(|e| e.scan_type),
                    last_scan: latest.map(|e| e.scan_time),
                }
            })
            .collect();

        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.user_id.cmp(&b.user_id)));
        Ok(rows)
    }

    async fn health_check(&self) -> AttendanceResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_duplicate_rfid_is_rejected() {
        let store = InMemoryStore::new();
        store.insert_user("RFID001", "John Doe").await.unwrap();

        let result = store.insert_user("RFID001", "Someone Else").await;
        assert!(matches!(result, Err(AttendanceError::DuplicateBadge(uid)) if uid == "RFID001"));
    }

    #[tokio::test]
    async fn test_latest_event_orders_by_scan_time_then_log_id() {
        let store = InMemoryStore::new();
        let user = store.insert_user("RFID002", "Jane Smith").await.unwrap();
        let now = Utc::now();

        store
            .append_event_at(user.user_id, ScanType::In, now)
            .await;
        store
            .append_event_at(user.user_id, ScanType::Out, now - Duration::minutes(5))
            .await;
        let latest = store.latest_event(user.user_id).await.unwrap().unwrap();
        assert_eq!(latest.scan_type, ScanType::In);

        // Same timestamp: the later insert wins
        let tie = store
            .append_event_at(user.user_id, ScanType::Out, now)
            .await;
        let latest = store.latest_event(user.user_id).await.unwrap().unwrap();
        assert_eq!(latest.log_id, tie.log_id);
        assert_eq!(latest.scan_type, ScanType::Out);
    }

    #[tokio::test]
    async fn test_current_status_sorted_by_name_with_empty_rows() {
        let store = InMemoryStore::new();
        let tom = store.insert_user("RFID005", "Tom Brown").await.unwrap();
        store.insert_user("RFID004", "Sarah Williams").await.unwrap();
        store
            .append_event(tom.user_id, ScanType::In, Some("gate-1"))
            .await
            .unwrap();

        let rows = store.current_status().await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Williams", "Tom Brown"]);
        assert_eq!(rows[0].status, None);
        assert_eq!(rows[0].last_scan, None);
        assert_eq!(rows[1].status, Some(ScanType::In));
        assert!(rows[1].last_scan.is_some());
    }
}
