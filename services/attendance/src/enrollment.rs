//! Enrollment session
//!
//! A single process-wide capture slot. While armed, every scan is diverted
//! into the slot instead of the attendance log so the operator can discover
//! a new badge's UID before registering it. There is one slot for the whole
//! service: two operators arming it at once overwrite each other's capture.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
struct EnrollmentState {
    active: bool,
    last_captured_uid: Option<String>,
}

/// Shared handle to the enrollment slot
#[derive(Debug, Clone, Default)]
pub struct EnrollmentSession {
    state: Arc<Mutex<EnrollmentState>>,
}

impl EnrollmentSession {
    /// Create an inactive session
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm enrollment and clear any previous capture
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        state.active = true;
        state.last_captured_uid = None;
        info!("Enrollment mode started");
    }

    /// Disarm enrollment and clear the capture
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        state.active = false;
        state.last_captured_uid = None;
        info!("Enrollment mode stopped");
    }

    /// Last UID captured while armed, if any
    pub async fn poll_latest(&self) -> Option<String> {
        self.state.lock().await.last_captured_uid.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    /// Record `rfid_uid` as the latest capture if the session is armed.
    ///
    /// Returns `false` and leaves the slot untouched when inactive.
    pub async fn try_capture(&self, rfid_uid: &str) -> bool {
        let mut state = self.state.lock().await;
        if !state.active {
            return false;
        }

        state.last_captured_uid = Some(rfid_uid.to_string());
        info!("Captured RFID {} for enrollment", rfid_uid);
        true
    }
}
