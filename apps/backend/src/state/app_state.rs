use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::oauth::GoogleAuth;
use crate::config::auth::AuthMode;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Whether the identity variant is active
    pub auth_mode: AuthMode,
    /// Google OAuth client, present iff configured at startup
    pub google: Option<Arc<GoogleAuth>>,
}

impl AppState {
    /// Create a new AppState with the given database connection and security
    /// config. Identity starts disabled; see [`AppState::with_google`].
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            auth_mode: AuthMode::Disabled,
            google: None,
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            auth_mode: AuthMode::Disabled,
            google: None,
        }
    }

    /// Enable the identity variant with a discovered Google client.
    pub fn with_google(mut self, google: Arc<GoogleAuth>) -> Self {
        self.auth_mode = AuthMode::Google;
        self.google = Some(google);
        self
    }

    /// Force the auth mode without a configured client. Route tests use this
    /// to exercise 401 paths without talking to the provider.
    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
