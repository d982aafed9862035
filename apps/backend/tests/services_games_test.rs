mod support;

use backend::auth::oauth::GoogleProfile;
use backend::db::require_db;
use backend::db::txn::with_txn;
use backend::entities::games as games_entity;
use backend::entities::game_participants;
use backend::error::AppError;
use backend::services::games::{self, SaveGamePlayer, SaveGameRequest};
use backend::services::users::ensure_user;
use backend_test_support::unique_helpers::unique_str;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::support::build_test_state;

fn entry(name: &str, scores: [i32; 9]) -> SaveGamePlayer {
    SaveGamePlayer {
        name: name.to_string(),
        scores: scores.to_vec(),
        total_score: scores.iter().sum(),
    }
}

fn request(players: Vec<SaveGamePlayer>) -> SaveGameRequest {
    SaveGameRequest {
        players,
        date: None,
    }
}

#[tokio::test]
async fn test_save_then_fetch_roundtrip() -> Result<(), AppError> {
    let state = build_test_state().await;

    // The Ann/Bo example from the scoring rules: Bo's zero round wins.
    let req = request(vec![
        entry("Ann", [1, 2, 3, 4, 5, 6, 7, 8, 9]),
        entry("Bo", [0; 9]),
    ]);

    let game_id = with_txn(None, &state, |txn| {
        let req = req.clone();
        Box::pin(async move { games::save_game(txn, None, &req).await })
    })
    .await?;

    let db = require_db(&state)?;
    let detail = games::game_detail(db, None, game_id).await?;

    assert_eq!(detail.id, game_id);
    assert!(detail.completed);
    assert_eq!(detail.participants.len(), 2);

    // Ordered by ascending total: Bo (0) before Ann (45).
    let bo = &detail.participants[0];
    let ann = &detail.participants[1];
    assert_eq!(bo.player_name, "Bo");
    assert_eq!(ann.player_name, "Ann");

    // Totals equal the sum of the submitted round scores.
    assert_eq!(bo.total_score, 0);
    assert_eq!(ann.total_score, 45);
    assert_eq!(ann.scores, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(bo.scores, [0; 9]);

    // Exactly the minimum-total participant wins.
    assert!(bo.won);
    assert!(!ann.won);

    Ok(())
}

#[tokio::test]
async fn test_tie_marks_all_minimum_totals_as_winners() -> Result<(), AppError> {
    let state = build_test_state().await;

    let req = request(vec![
        entry("Ann", [2, 0, 0, 0, 0, 0, 0, 0, 0]),
        entry("Bo", [1, 1, 0, 0, 0, 0, 0, 0, 0]),
        entry("Cay", [5, 0, 0, 0, 0, 0, 0, 0, 0]),
    ]);

    let game_id = with_txn(None, &state, |txn| {
        let req = req.clone();
        Box::pin(async move { games::save_game(txn, None, &req).await })
    })
    .await?;

    let db = require_db(&state)?;
    let detail = games::game_detail(db, None, game_id).await?;

    let winners: Vec<&str> = detail
        .participants
        .iter()
        .filter(|p| p.won)
        .map(|p| p.player_name.as_str())
        .collect();

    assert_eq!(winners.len(), 2);
    assert!(winners.contains(&"Ann"));
    assert!(winners.contains(&"Bo"));

    Ok(())
}

#[tokio::test]
async fn test_missing_rounds_pad_with_zero() -> Result<(), AppError> {
    let state = build_test_state().await;

    let short = SaveGamePlayer {
        name: "Ann".to_string(),
        scores: vec![3, 4],
        total_score: 7,
    };

    let game_id = with_txn(None, &state, |txn| {
        Box::pin(async move { games::save_game(txn, None, &request(vec![short])).await })
    })
    .await?;

    let db = require_db(&state)?;
    let detail = games::game_detail(db, None, game_id).await?;
    assert_eq!(detail.participants[0].scores, [3, 4, 0, 0, 0, 0, 0, 0, 0]);

    Ok(())
}

#[tokio::test]
async fn test_empty_player_list_rejected_and_nothing_committed() -> Result<(), AppError> {
    let state = build_test_state().await;

    let result = with_txn(None, &state, |txn| {
        Box::pin(async move { games::save_game(txn, None, &request(vec![])).await })
    })
    .await;

    assert!(matches!(result, Err(AppError::Validation { .. })));

    // The transaction rolled back: no game row exists.
    let db = require_db(&state)?;
    let count = games_entity::Entity::find()
        .count(db)
        .await
        .map_err(|e| AppError::db(e.to_string()))?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_cascades_participants() -> Result<(), AppError> {
    let state = build_test_state().await;

    let req = request(vec![
        entry("Ann", [1, 0, 0, 0, 0, 0, 0, 0, 0]),
        entry("Bo", [2, 0, 0, 0, 0, 0, 0, 0, 0]),
    ]);
    let game_id = with_txn(None, &state, |txn| {
        let req = req.clone();
        Box::pin(async move { games::save_game(txn, None, &req).await })
    })
    .await?;

    let db = require_db(&state)?;
    games::delete_game(db, None, game_id).await?;

    // Detail fetch now misses...
    let result = games::game_detail(db, None, game_id).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    // ...and the cascade removed every participant row.
    let orphans = game_participants::Entity::find()
        .filter(game_participants::Column::GameId.eq(game_id))
        .count(db)
        .await
        .map_err(|e| AppError::db(e.to_string()))?;
    assert_eq!(orphans, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_game_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await;
    let db = require_db(&state)?;

    let result = games::delete_game(db, None, 12345).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_list_games_summarizes_newest_first() -> Result<(), AppError> {
    let state = build_test_state().await;

    let first = with_txn(None, &state, |txn| {
        Box::pin(async move {
            games::save_game(
                txn,
                None,
                &request(vec![
                    entry("Ann", [9, 0, 0, 0, 0, 0, 0, 0, 0]),
                    entry("Bo", [4, 0, 0, 0, 0, 0, 0, 0, 0]),
                ]),
            )
            .await
        })
    })
    .await?;

    let second = with_txn(None, &state, |txn| {
        Box::pin(async move {
            games::save_game(
                txn,
                None,
                &request(vec![
                    entry("Ann", [1, 0, 0, 0, 0, 0, 0, 0, 0]),
                    entry("Bo", [2, 0, 0, 0, 0, 0, 0, 0, 0]),
                    entry("Cay", [3, 0, 0, 0, 0, 0, 0, 0, 0]),
                ]),
            )
            .await
        })
    })
    .await?;

    let db = require_db(&state)?;
    let summaries = games::list_games(db, None).await?;

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second);
    assert_eq!(summaries[1].id, first);

    assert_eq!(summaries[0].player_count, 3);
    assert_eq!(summaries[0].winning_score, Some(1));
    assert_eq!(summaries[0].winner_name.as_deref(), Some("Ann"));

    assert_eq!(summaries[1].player_count, 2);
    assert_eq!(summaries[1].winning_score, Some(4));
    assert_eq!(summaries[1].winner_name.as_deref(), Some("Bo"));

    Ok(())
}

async fn make_user(state: &backend::AppState, prefix: &str) -> Result<i64, AppError> {
    let profile = GoogleProfile {
        sub: unique_str(prefix),
        email: format!("{}@example.test", unique_str(prefix)),
        name: None,
        picture: None,
    };
    let user = with_txn(None, state, |txn| {
        let profile = profile.clone();
        Box::pin(async move { ensure_user(txn, &profile).await })
    })
    .await?;
    Ok(user.id)
}

#[tokio::test]
async fn test_games_are_scoped_to_their_owner() -> Result<(), AppError> {
    let state = build_test_state().await;

    let owner = make_user(&state, "owner").await?;
    let other = make_user(&state, "other").await?;

    let req = request(vec![entry("Ann", [1, 0, 0, 0, 0, 0, 0, 0, 0])]);
    let game_id = with_txn(None, &state, |txn| {
        let req = req.clone();
        Box::pin(async move { games::save_game(txn, Some(owner), &req).await })
    })
    .await?;

    let db = require_db(&state)?;

    // The owner sees the game.
    assert_eq!(games::list_games(db, Some(owner)).await?.len(), 1);
    assert!(games::game_detail(db, Some(owner), game_id).await.is_ok());

    // Another user sees nothing, and cross-user detail/delete read as missing.
    assert!(games::list_games(db, Some(other)).await?.is_empty());
    assert!(matches!(
        games::game_detail(db, Some(other), game_id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        games::delete_game(db, Some(other), game_id).await,
        Err(AppError::NotFound { .. })
    ));

    // The failed delete left the row in place for its owner.
    assert!(games::game_detail(db, Some(owner), game_id).await.is_ok());

    Ok(())
}
