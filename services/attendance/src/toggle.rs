//! Toggle engine
//!
//! Decides what a single RFID tap means: an enrollment capture while the
//! enrollment session is armed, otherwise an IN/OUT attendance event that
//! flips the badge holder's most recent status.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    enrollment::EnrollmentSession,
    error::{AttendanceError, AttendanceResult},
    models::{ScanResponse, ScanType},
    store::AttendanceStore,
};

/// Outcome of a recorded scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// Diverted into the enrollment slot; nothing was logged
    Enroll { rfid_uid: String },
    /// A new attendance event was appended
    Attendance {
        rfid_uid: String,
        name: String,
        status: ScanType,
    },
}

impl From<ScanResult> for ScanResponse {
    fn from(result: ScanResult) -> Self {
        match result {
            ScanResult::Enroll { rfid_uid } => ScanResponse::Enroll {
                enroll: true,
                rfid_uid,
                message: "RFID captured for enrollment",
            },
            ScanResult::Attendance {
                rfid_uid,
                name,
                status,
            } => ScanResponse::Attendance {
                success: true,
                rfid_uid,
                status,
                name,
            },
        }
    }
}

/// Status to record after `last`. No previous event counts as OUT, and
/// there is no time-based expiry.
pub fn next_status(last: Option<ScanType>) -> ScanType {
    match last {
        Some(ScanType::In) => ScanType::Out,
        Some(ScanType::Out) | None => ScanType::In,
    }
}

/// Applies scans to the attendance log
#[derive(Clone)]
pub struct ToggleEngine {
    store: Arc<dyn AttendanceStore>,
    session: EnrollmentSession,
    /// One lock per registered user so concurrent taps of the same badge
    /// cannot read the same previous status. Entries live only while a scan
    /// holds or waits on them.
    user_locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl ToggleEngine {
    pub fn new(store: Arc<dyn AttendanceStore>, session: EnrollmentSession) -> Self {
        Self {
            store,
            session,
            user_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn acquire_user_lock(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop our handle and forget the entry once no other scan shares it
    async fn release_user_lock(&self, user_id: i64, lock: Arc<Mutex<()>>) {
        let mut locks = self.user_locks.lock().await;
        drop(lock);

        let unused = locks
            .get(&user_id)
            .map(|entry| Arc::strong_count(entry) == 1)
            .unwrap_or(false);
        if unused {
            locks.remove(&user_id);
        }
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.user_locks.lock().await.len()
    }

    /// Record one tap of `rfid_uid`, optionally from `device_id`
    pub async fn record_scan(
        &self,
        rfid_uid: &str,
        device_id: Option<&str>,
    ) -> AttendanceResult<ScanResult> {
        let rfid_uid = rfid_uid.trim();
        if rfid_uid.is_empty() {
            return Err(AttendanceError::InvalidInput(
                "RFID UID required".to_string(),
            ));
        }

        // Enrollment takes precedence over attendance
        if self.session.try_capture(rfid_uid).await {
            return Ok(ScanResult::Enroll {
                rfid_uid: rfid_uid.to_string(),
            });
        }

        let user = match self.store.find_user_by_rfid(rfid_uid).await? {
            Some(user) => user,
            None => {
                warn!("Rejected scan from unregistered RFID {}", rfid_uid);
                return Err(AttendanceError::UnregisteredBadge(rfid_uid.to_string()));
            }
        };

        let user_lock = self.acquire_user_lock(user.user_id).await;
        let status = {
            let _guard = user_lock.lock().await;
            self.toggle(user.user_id, device_id).await
        };
        self.release_user_lock(user.user_id, user_lock).await;
        let status = status?;

        info!("RFID {} ({}) scanned {}", rfid_uid, user.name, status);

        Ok(ScanResult::Attendance {
            rfid_uid: rfid_uid.to_string(),
            name: user.name,
            status,
        })
    }

    /// Read the latest status and append its successor. Callers hold the
    /// user's lock.
    async fn toggle(&self, user_id: i64, device_id: Option<&str>) -> AttendanceResult<ScanType> {
        let last = self.store.latest_event(user_id).await?;
        let status = next_status(last.map(|e| e.scan_type));

        let device_id = device_id.map(str::trim).filter(|d| !d.is_empty());
        let event = self.store.append_event(user_id, status, device_id).await?;

        info!(
            "Logged {} for user {} as log {} from device {:?}",
            event.scan_type, event.user_id, event.log_id, event.device_id
        );
        Ok(status)
    }
}
