//! PostgreSQL implementation of the attendance store

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::AttendanceStore;
use crate::{
    error::{AttendanceError, AttendanceResult},
    models::{AttendanceEvent, ScanType, StatusRow, User},
};

/// Attendance store backed by the `users` and `attendance_logs` tables
#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_scan_type(value: String) -> Result<ScanType, sqlx::Error> {
    value
        .parse()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn event_from_row(row: &PgRow) -> Result<AttendanceEvent, sqlx::Error> {
    Ok(AttendanceEvent {
        log_id: row.try_get("log_id")?,
        user_id: row.try_get("user_id")?,
        scan_type: decode_scan_type(row.try_get("scan_type")?)?,
        scan_time: row.try_get("scan_time")?,
        device_id: row.try_get("device_id")?,
    })
}

fn status_from_row(row: &PgRow) -> Result<StatusRow, sqlx::Error> {
    let status: Option<String> = row.try_get("status")?;

    Ok(StatusRow {
        user_id: row.try_get("user_id")?,
        rfid_uid: row.try_get("rfid_uid")?,
        name: row.try_get("name")?,
        status: status.map(decode_scan_type).transpose()?,
        last_scan: row.try_get("last_scan")?,
    })
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn insert_user(&self, rfid_uid: &str, name: &str) -> AttendanceResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (rfid_uid, name)
            VALUES ($1, $2)
            RETURNING user_id, rfid_uid, name, created_at
            "#,
        )
        .bind(rfid_uid)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = DatabaseError::Query(e);
            if err.is_unique_violation() {
                AttendanceError::DuplicateBadge(rfid_uid.to_string())
            } else {
                AttendanceError::StoreUnavailable(err)
            }
        })?;

        info!("Registered RFID {} as user {}", user.rfid_uid, user.user_id);
        Ok(user)
    }

    async fn find_user_by_rfid(&self, rfid_uid: &str) -> AttendanceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, rfid_uid, name, created_at
            FROM users
            WHERE rfid_uid = $1
            "#,
        )
        .bind(rfid_uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(user)
    }

    async fn latest_event(&self, user_id: i64) -> AttendanceResult<Option<AttendanceEvent>> {
        let row = sqlx::query(
            r#"
            SELECT log_id, user_id, scan_type, scan_time, device_id
            FROM attendance_logs
            WHERE user_id = $1
            ORDER BY scan_time DESC, log_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        match row {
            Some(row) => Ok(Some(event_from_row(&row).map_err(DatabaseError::Query)?)),
            None => Ok(None),
        }
    }

    async fn append_event(
        &self,
        user_id: i64,
        scan_type: ScanType,
        device_id: Option<&str>,
    ) -> AttendanceResult<AttendanceEvent> {
        let row = sqlx::query(
            r#"
            INSERT INTO attendance_logs (user_id, scan_type, device_id)
            VALUES ($1, $2, $3)
            RETURNING log_id, user_id, scan_type, scan_time, device_id
            "#,
        )
        .bind(user_id)
        .bind(scan_type.as_str())
        .bind(device_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(event_from_row(&row).map_err(DatabaseError::Query)?)
    }

    async fn current_status(&self) -> AttendanceResult<Vec<StatusRow>> {
        let rows = sqlx::query(
            r#"
            WITH latest AS (
                SELECT DISTINCT ON (user_id) user_id, scan_type, scan_time
                FROM attendance_logs
                ORDER BY user_id, scan_time DESC, log_id DESC
            )
            SELECT u.user_id, u.rfid_uid, u.name,
                   l.scan_type AS status, l.scan_time AS last_scan
            FROM users u
            LEFT JOIN latest l ON l.user_id = u.user_id
            ORDER BY u.name ASC, u.user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let status = rows
            .iter()
            .map(status_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::Query)?;

        Ok(status)
    }

    async fn health_check(&self) -> AttendanceResult<bool> {
        Ok(common::database::health_check(&self.pool).await?)
    }
}
