use std::env;

use crate::error::AppError;

/// Whether the identity variant is active for this process.
///
/// With `Google`, every `/api` route requires a bearer token and results are
/// scoped to the session's user. With `Disabled`, the same routes are open
/// and unscoped, and the per-player history route is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Google,
    Disabled,
}

/// Google OAuth client settings, read from the environment.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Absolute URL of `GET /auth/google/callback` as registered with Google.
    pub redirect_url: String,
    /// Where the callback redirects the browser after a successful login.
    pub frontend_url: String,
}

impl GoogleConfig {
    /// Load Google settings from the environment. Returns `Ok(None)` when
    /// `GOOGLE_CLIENT_ID` is absent (identity variant disabled); errors when
    /// the variant is half-configured.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        let client_id = match env::var("GOOGLE_CLIENT_ID") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => return Ok(None),
        };

        let client_secret = must_var("GOOGLE_CLIENT_SECRET")?;
        let redirect_url = must_var("OAUTH_REDIRECT_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Some(Self {
            client_id,
            client_secret,
            redirect_url,
            frontend_url,
        }))
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
