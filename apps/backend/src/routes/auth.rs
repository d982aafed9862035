//! Identity flow routes (identity variant only).

use std::time::SystemTime;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::mint_access_token;
use crate::auth::oauth::GoogleAuth;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::services::users::ensure_user;
use crate::state::app_state::AppState;

fn require_google(app_state: &AppState) -> Result<&GoogleAuth, AppError> {
    app_state
        .google
        .as_deref()
        .ok_or_else(|| AppError::config("Google OAuth is not configured".to_string()))
}

#[derive(Debug, Serialize)]
struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    auth_url: String,
}

/// POST /auth/google - start the provider login flow.
async fn google_begin(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let google = require_google(&app_state)?;
    let auth_url = google.begin_login();
    Ok(HttpResponse::Ok().json(AuthUrlResponse { auth_url }))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: String,
    state: String,
}

/// GET /auth/google/callback - provider redirect target.
///
/// Verifies the callback, upserts the user inside one transaction, mints a
/// session token and sends the browser back to the frontend with the token
/// in the URL fragment.
async fn google_callback(
    http_req: HttpRequest,
    query: web::Query<CallbackQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let google = require_google(&app_state)?;
    let profile = google.complete_login(&query.code, &query.state).await?;

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        let profile = profile.clone();
        Box::pin(async move { ensure_user(txn, &profile).await })
    })
    .await?;

    let token = mint_access_token(
        &user.google_sub,
        &user.email,
        SystemTime::now(),
        &app_state.security,
    )?;

    let location = format!("{}#token={}", google.frontend_url, token);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    success: bool,
}

/// POST /auth/logout - tokens are stateless, so this is an acknowledgement;
/// the client discards its copy.
async fn logout() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(LogoutResponse { success: true }))
}

#[derive(Debug, Serialize)]
struct UserResponse {
    user: CurrentUser,
}

/// GET /auth/user - the session's user, 401 without a valid session.
async fn current_user(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse { user }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/google").route(web::post().to(google_begin)));
    cfg.service(web::resource("/google/callback").route(web::get().to(google_callback)));
    cfg.service(web::resource("/logout").route(web::post().to(logout)));
    cfg.service(web::resource("/user").route(web::get().to(current_user)));
}
