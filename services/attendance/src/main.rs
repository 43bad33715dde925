use std::sync::Arc;

use anyhow::Result;
use sqlx::migrate::Migrator;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod directory;
mod enrollment;
mod error;
mod models;
mod routes;
mod settings;
mod state;
mod store;
mod toggle;
mod view;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use crate::{
    settings::{ServiceConfig, StorageBackend},
    state::AppState,
    store::{AttendanceStore, InMemoryStore, PgAttendanceStore},
};

/// Schema migrations embedded at compile time
pub(crate) static MIGRATOR: Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting attendance service");

    let service_config = ServiceConfig::from_env()?;

    let store: Arc<dyn AttendanceStore> = match service_config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool, &MIGRATOR).await?;
            Arc::new(PgAttendanceStore::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let app_state = AppState::new(store);

    // Start the web server
    let app = routes::create_router(app_state);

    let address = service_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Attendance service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
