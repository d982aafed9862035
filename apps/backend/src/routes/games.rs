//! Game-record HTTP routes.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Serialize;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::OptionalUser;
use crate::services::games;
use crate::services::games::SaveGameRequest;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct SaveGameResponse {
    success: bool,
    #[serde(rename = "gameId")]
    game_id: i64,
}

/// POST /api/games
///
/// Saves a completed game. The whole write (game row, roster upserts,
/// participant rows) is one transaction; a failure partway leaves nothing
/// committed.
async fn save_game(
    http_req: HttpRequest,
    user: OptionalUser,
    body: web::Json<SaveGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.user_id();
    let req = body.into_inner();

    let game_id = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { games::save_game(txn, user_id, &req).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(SaveGameResponse {
        success: true,
        game_id,
    }))
}

/// GET /api/games - newest-first summaries, at most 50.
async fn list_games(
    user: OptionalUser,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<games::GameSummary>>, AppError> {
    let db = require_db(&app_state)?;
    let summaries = games::list_games(db, user.user_id()).await?;
    Ok(web::Json(summaries))
}

/// GET /api/games/{id} - game row plus participants, best score first.
async fn game_detail(
    user: OptionalUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<games::GameDetail>, AppError> {
    let db = require_db(&app_state)?;
    let detail = games::game_detail(db, user.user_id(), path.into_inner()).await?;
    Ok(web::Json(detail))
}

#[derive(Debug, Serialize)]
struct DeleteGameResponse {
    success: bool,
}

/// DELETE /api/games/{id}
async fn delete_game(
    user: OptionalUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    games::delete_game(db, user.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteGameResponse { success: true }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(save_game))
            .route(web::get().to(list_games)),
    );
    cfg.service(
        web::resource("/{game_id}")
            .route(web::get().to(game_detail))
            .route(web::delete().to(delete_game)),
    );
}
