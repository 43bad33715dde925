//! User directory: badge registration

use std::sync::Arc;

use tracing::info;

use crate::{
    enrollment::EnrollmentSession,
    error::{AttendanceError, AttendanceResult},
    models::User,
    store::AttendanceStore,
};

/// Registers badges and closes the enrollment flow that discovered them
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn AttendanceStore>,
    session: EnrollmentSession,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn AttendanceStore>, session: EnrollmentSession) -> Self {
        Self { store, session }
    }

    /// Register `rfid_uid` for `name`.
    ///
    /// On success enrollment mode is stopped, after the user row is written.
    /// On failure the session is left as it was.
    pub async fn register_user(&self, rfid_uid: &str, name: &str) -> AttendanceResult<User> {
        let rfid_uid = rfid_uid.trim();
        let name = name.trim();
        if rfid_uid.is_empty() || name.is_empty() {
            return Err(AttendanceError::InvalidInput(
                "RFID and name are required".to_string(),
            ));
        }

        let user = self.store.insert_user(rfid_uid, name).await?;
        self.session.stop().await;

        info!(
            "User {} registered with RFID {} at {}",
            user.name, user.rfid_uid, user.created_at
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::toggle::{ScanResult, ToggleEngine};

    fn directory_with(store: &InMemoryStore, session: &EnrollmentSession) -> UserDirectory {
        UserDirectory::new(Arc::new(store.clone()), session.clone())
    }

    #[tokio::test]
    async fn test_register_user_trims_input() {
        let store = InMemoryStore::new();
        let session = EnrollmentSession::new();
        let directory = directory_with(&store, &session);

        let user = directory.register_user(" RFID020 ", " Fay ").await.unwrap();
        assert_eq!(user.rfid_uid, "RFID020");
        assert_eq!(user.name, "Fay");
        assert!(store.find_user_by_rfid("RFID020").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_user_requires_both_fields() {
        let store = InMemoryStore::new();
        let session = EnrollmentSession::new();
        let directory = directory_with(&store, &session);

        for (rfid, name) in [("", "Fay"), ("RFID020", ""), (" ", " ")] {
            let result = directory.register_user(rfid, name).await;
            assert!(matches!(result, Err(AttendanceError::InvalidInput(_))));
        }
        assert!(store.current_status().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_enrollment_armed() {
        let store = InMemoryStore::new();
        let session = EnrollmentSession::new();
        let directory = directory_with(&store, &session);
        directory.register_user("RFID021", "Gus").await.unwrap();

        session.start().await;
        session.try_capture("RFID021").await;

        let result = directory.register_user("RFID021", "Gus Again").await;
        assert!(matches!(result, Err(AttendanceError::DuplicateBadge(_))));
        assert!(session.is_active().await);
        assert_eq!(session.poll_latest().await.as_deref(), Some("RFID021"));
    }

    #[tokio::test]
    async fn test_register_stops_enrollment_without_explicit_stop() {
        let store = InMemoryStore::new();
        let session = EnrollmentSession::new();
        let directory = directory_with(&store, &session);
        let engine = ToggleEngine::new(Arc::new(store.clone()), session.clone());

        session.start().await;
        let captured = engine.record_scan("RFID099", None).await.unwrap();
        assert_eq!(
            captured,
            ScanResult::Enroll {
                rfid_uid: "RFID099".to_string()
            }
        );
        assert_eq!(session.poll_latest().await.as_deref(), Some("RFID099"));

        directory.register_user("RFID099", "Bob").await.unwrap();
        assert_eq!(session.poll_latest().await, None);
        assert!(!session.is_active().await);

        // The freshly registered badge now records attendance
        let result = engine.record_scan("RFID099", None).await.unwrap();
        assert!(matches!(result, ScanResult::Attendance { ref name, .. } if name == "Bob"));
        assert_eq!(store.event_count().await, 1);
    }
}
