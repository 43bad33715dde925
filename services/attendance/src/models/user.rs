//! User model and registration payload

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

/// Registered badge holder
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub rfid_uid: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request for badge registration
///
/// `department` is accepted for dashboard compatibility but never stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRfidRequest {
    pub rfid: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
}
