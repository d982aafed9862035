mod support;

use backend::db::require_db;
use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::services::games::{self, SaveGamePlayer, SaveGameRequest};
use backend::services::players::{self, find_or_create_player};

use crate::support::build_test_state;

fn entry(name: &str, first_round: i32) -> SaveGamePlayer {
    let mut scores = vec![0; 9];
    scores[0] = first_round;
    SaveGamePlayer {
        name: name.to_string(),
        scores,
        total_score: first_round,
    }
}

async fn save(
    state: &backend::AppState,
    players: Vec<SaveGamePlayer>,
) -> Result<i64, AppError> {
    with_txn(None, state, |txn| {
        Box::pin(async move {
            games::save_game(txn, None, &SaveGameRequest { players, date: None }).await
        })
    })
    .await
}

#[tokio::test]
async fn test_find_or_create_player_is_idempotent() -> Result<(), AppError> {
    let state = build_test_state().await;

    let (first, second, trimmed) = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let first = find_or_create_player(txn, "Ann").await?;
            let second = find_or_create_player(txn, "Ann").await?;
            let trimmed = find_or_create_player(txn, "  Ann  ").await?;
            Ok::<_, AppError>((first, second, trimmed))
        })
    })
    .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(first.id, trimmed.id);
    assert_eq!(first.name, "Ann");

    Ok(())
}

#[tokio::test]
async fn test_find_or_create_player_rejects_blank_name() -> Result<(), AppError> {
    let state = build_test_state().await;

    let result = with_txn(None, &state, |txn| {
        Box::pin(async move { find_or_create_player(txn, "   ").await })
    })
    .await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
    Ok(())
}

#[tokio::test]
async fn test_player_stats_aggregates_and_ordering() -> Result<(), AppError> {
    let state = build_test_state().await;

    // Three games: Bo wins twice, Ann once.
    save(&state, vec![entry("Ann", 10), entry("Bo", 5)]).await?;
    save(&state, vec![entry("Ann", 20), entry("Bo", 8)]).await?;
    save(&state, vec![entry("Ann", 3), entry("Bo", 30)]).await?;

    let db = require_db(&state)?;
    let stats = players::player_stats(db, None).await?;

    assert_eq!(stats.len(), 2);

    // Most wins first.
    let bo = &stats[0];
    let ann = &stats[1];
    assert_eq!(bo.name, "Bo");
    assert_eq!(ann.name, "Ann");

    assert_eq!(bo.games_played, 3);
    assert_eq!(bo.games_won, 2);
    assert_eq!(bo.best_score, 5);
    assert_eq!(bo.worst_score, 30);
    assert!((bo.avg_score - 14.33).abs() < 1e-6);

    assert_eq!(ann.games_played, 3);
    assert_eq!(ann.games_won, 1);
    assert_eq!(ann.best_score, 3);
    assert_eq!(ann.worst_score, 20);
    assert!((ann.avg_score - 11.0).abs() < 1e-6);

    // win_rate = games_won / games_played * 100, one decimal.
    assert!((bo.win_rate - 66.7).abs() < 1e-6);
    assert!((ann.win_rate - 33.3).abs() < 1e-6);

    Ok(())
}

#[tokio::test]
async fn test_player_stats_tie_broken_by_best_average() -> Result<(), AppError> {
    let state = build_test_state().await;

    // One win each; Cay's average is lower, so Cay sorts first.
    save(&state, vec![entry("Dee", 2), entry("Cay", 9)]).await?;
    save(&state, vec![entry("Dee", 50), entry("Cay", 1)]).await?;

    let db = require_db(&state)?;
    let stats = players::player_stats(db, None).await?;

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].name, "Cay");
    assert_eq!(stats[1].name, "Dee");
    assert_eq!(stats[0].games_won, 1);
    assert_eq!(stats[1].games_won, 1);

    Ok(())
}

#[tokio::test]
async fn test_player_stats_empty_roster() -> Result<(), AppError> {
    let state = build_test_state().await;
    let db = require_db(&state)?;

    let stats = players::player_stats(db, None).await?;
    assert!(stats.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_player_history_newest_first_with_full_rounds() -> Result<(), AppError> {
    let state = build_test_state().await;

    let lost = SaveGamePlayer {
        name: "Ann".to_string(),
        scores: vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
        total_score: 45,
    };
    let first_game = save(&state, vec![lost, entry("Bo", 2)]).await?;
    let second_game = save(&state, vec![entry("Ann", 1), entry("Bo", 7)]).await?;

    let db = require_db(&state)?;
    let ann = players::find_by_name(db, "Ann").await?.expect("Ann exists");
    let history = players::player_history(db, ann.id).await?;

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].game_id, second_game);
    assert_eq!(history[1].game_id, first_game);

    assert!(history[0].won);
    assert_eq!(history[0].total_score, 1);

    assert!(!history[1].won);
    assert_eq!(history[1].total_score, 45);
    assert_eq!(history[1].scores, [1, 2, 3, 4, 5, 6, 7, 8, 9]);

    Ok(())
}

#[tokio::test]
async fn test_player_history_unknown_player_is_empty() -> Result<(), AppError> {
    let state = build_test_state().await;
    let db = require_db(&state)?;

    let history = players::player_history(db, 4242).await?;
    assert!(history.is_empty());

    Ok(())
}
