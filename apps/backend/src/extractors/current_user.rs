use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Serialize;

use crate::auth::jwt::verify_access_token;
use crate::config::auth::AuthMode;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::services::users;
use crate::state::app_state::AppState;

/// The session's user, resolved from the bearer token to its database row.
/// Extraction fails with Unauthorized when the token is missing, invalid,
/// expired, or no longer maps to a user.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub google_sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(AppError::unauthorized)
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available".to_string()))
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = app_state(&req)?;
            let token = bearer_token(&req)?.to_string();
            let claims = verify_access_token(&token, &state.security)?;

            // Look up the user by external id, through the shared test
            // transaction when one is injected.
            let user = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                users::find_by_google_sub(shared_txn.transaction(), &claims.sub).await?
            } else {
                let db = require_db(state)?;
                users::find_by_google_sub(db, &claims.sub).await?
            };

            let user = user.ok_or_else(AppError::unauthorized)?;

            Ok(CurrentUser {
                id: user.id,
                google_sub: user.google_sub,
                email: claims.email,
                name: user.name,
                picture: user.picture,
            })
        })
    }
}

/// Session user when the identity variant is active, `None` otherwise.
///
/// With `AuthMode::Google` this behaves exactly like [`CurrentUser`]
/// (missing/invalid sessions are Unauthorized); with `AuthMode::Disabled`
/// the same routes run unscoped.
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = app_state(&req)?;
            match state.auth_mode {
                AuthMode::Disabled => Ok(OptionalUser(None)),
                AuthMode::Google => {
                    let user = CurrentUser::from_request(&req, &mut Payload::None).await?;
                    Ok(OptionalUser(Some(user)))
                }
            }
        })
    }
}
