//! Shared helpers for integration tests.

use backend::config::db::MEMORY_DB_URL;
use backend::infra::db::build_pool;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use migration::{migrate, MigrationCommand};

/// Build an AppState over a fresh in-memory database with the schema
/// applied. Every call returns an isolated database, so tests can commit
/// freely without seeing each other's rows.
pub async fn build_test_state() -> AppState {
    let db = build_pool(MEMORY_DB_URL)
        .await
        .expect("create in-memory pool");
    migrate(&db, MigrationCommand::Up)
        .await
        .expect("run migrations");

    AppState::new(
        db,
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes()),
    )
}

#[ctor::ctor]
fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
