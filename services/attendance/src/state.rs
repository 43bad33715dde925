//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    directory::UserDirectory, enrollment::EnrollmentSession, store::AttendanceStore,
    toggle::ToggleEngine, view::AttendanceView,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub enrollment: EnrollmentSession,
    pub toggle_engine: ToggleEngine,
    pub user_directory: UserDirectory,
    pub attendance_view: AttendanceView,
}

impl AppState {
    /// Wire every component to one store and one enrollment session
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        let enrollment = EnrollmentSession::new();

        Self {
            toggle_engine: ToggleEngine::new(store.clone(), enrollment.clone()),
            user_directory: UserDirectory::new(store.clone(), enrollment.clone()),
            attendance_view: AttendanceView::new(store.clone()),
            enrollment,
            store,
        }
    }
}
