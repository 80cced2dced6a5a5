use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect without running migrations.
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    if *profile == DbProfile::InMemory {
        // Every SQLite :memory: connection is its own database: pin the pool
        // to one long-lived connection.
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(24 * 60 * 60))
            .max_lifetime(Duration::from_secs(24 * 60 * 60));
    } else {
        opts.max_connections(10)
            .connect_timeout(Duration::from_secs(10));
    }

    Database::connect(opts)
        .await
        .map_err(|e| AppError::db_unavailable(format!("Failed to connect to database: {e}")))
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    migration::migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("Migration failed: {e}")))?;
    info!(profile = ?profile, "database ready");
    Ok(conn)
}
