//! Service settings loaded from `ATTENDANCE_*` environment variables

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Where users and attendance events are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Service configuration
///
/// # Environment Variables
/// - `ATTENDANCE_HOST`: bind host (default: "0.0.0.0")
/// - `ATTENDANCE_PORT`: bind port (default: 5000)
/// - `ATTENDANCE_STORAGE`: "postgres" or "memory" (default: "postgres")
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("storage", "postgres")?
            .add_source(Environment::with_prefix("ATTENDANCE"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("ATTENDANCE_HOST");
            std::env::remove_var("ATTENDANCE_PORT");
            std::env::remove_var("ATTENDANCE_STORAGE");
        }
    }

    #[test]
    #[serial]
    fn test_service_config_defaults() {
        clear_env();

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    #[serial]
    fn test_service_config_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("ATTENDANCE_HOST", "127.0.0.1");
            std::env::set_var("ATTENDANCE_PORT", "8080");
            std::env::set_var("ATTENDANCE_STORAGE", "memory");
        }

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageBackend::Memory);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_service_config_rejects_unknown_storage() {
        clear_env();
        unsafe {
            std::env::set_var("ATTENDANCE_STORAGE", "redis");
        }

        assert!(ServiceConfig::from_env().is_err());

        clear_env();
    }
}
