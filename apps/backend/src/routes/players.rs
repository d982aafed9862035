//! Player aggregate HTTP routes.

use actix_web::{web, Result};

use crate::config::auth::AuthMode;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::current_user::OptionalUser;
use crate::services::players;
use crate::state::app_state::AppState;

/// GET /api/players/stats - aggregates for every player with a recorded game.
async fn player_stats(
    user: OptionalUser,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<players::PlayerStats>>, AppError> {
    let db = require_db(&app_state)?;
    let stats = players::player_stats(db, user.user_id()).await?;
    Ok(web::Json(stats))
}

/// GET /api/players/{id}/history - one player's past games, newest first.
/// Only wired up in the unauthenticated variant.
async fn player_history(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<players::PlayerHistoryEntry>>, AppError> {
    let db = require_db(&app_state)?;
    let history = players::player_history(db, path.into_inner()).await?;
    Ok(web::Json(history))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, auth_mode: AuthMode) {
    cfg.service(web::resource("/stats").route(web::get().to(player_stats)));
    if auth_mode == AuthMode::Disabled {
        cfg.service(web::resource("/{player_id}/history").route(web::get().to(player_history)));
    }
}
