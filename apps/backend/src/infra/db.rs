use std::str::FromStr;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, trace};

use crate::config::db::{db_url, is_memory_url, DbProfile};
use crate::error::AppError;

/// Build the app DB pool *and* guarantee schema is current.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;

    info!("bootstrap=start profile={profile:?} engine=sqlite path={url}");

    let db = build_pool(&url).await?;

    migrate(&db, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;

    info!("bootstrap=ready");
    Ok(db)
}

/// Build an SQLx SQLite pool with per-connection PRAGMAs and hand it to SeaORM.
pub async fn build_pool(url: &str) -> Result<DatabaseConnection, AppError> {
    let connect_opts = SqliteConnectOptions::from_str(url)
        .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
        .create_if_missing(true);

    // An in-memory database exists per connection; cap the pool at one so
    // every query sees the same database instance.
    let pool_max = if is_memory_url(url) { 1 } else { 5 };

    let pool: SqlitePool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(pool_max)
        .acquire_timeout(Duration::from_secs(2))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                // Cascading deletes depend on this pragma.
                sqlx::query("PRAGMA foreign_keys = ON;")
                    .execute(&mut *conn)
                    .await?;
                trace!("db=sqlite hook=after_connect ok");
                Ok::<_, sqlx::Error>(())
            })
        })
        .connect_with(connect_opts)
        .await
        .map_err(|e| AppError::config(format!("failed to create SQLite connection pool: {e}")))?;

    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

    info!("pool=create engine=sqlite path={url} min=1 max={pool_max}");
    Ok(db)
}
