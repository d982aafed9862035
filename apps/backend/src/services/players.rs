use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, NotSet,
    QueryFilter, Set, Statement,
};
use serde::Serialize;

use crate::entities::game_participants::ROUNDS_PER_GAME;
use crate::entities::players;
use crate::error::AppError;
use crate::infra::db_errors::{is_unique_violation, map_db_err};

pub async fn find_by_name(
    conn: &impl ConnectionTrait,
    name: &str,
) -> Result<Option<players::Model>, AppError> {
    players::Entity::find()
        .filter(players::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// Resolve a player name to its roster row, creating it on first sight.
///
/// Runs inside the caller's save transaction. The upsert is race-safe: if a
/// concurrent save inserts the same new name first, the unique constraint
/// fires and we re-fetch instead of failing the whole game.
pub async fn find_or_create_player(
    conn: &impl ConnectionTrait,
    name: &str,
) -> Result<players::Model, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Player name cannot be empty"));
    }

    if let Some(player) = find_by_name(conn, name).await? {
        return Ok(player);
    }

    let insert = players::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await;

    match insert {
        Ok(player) => Ok(player),
        Err(e) if is_unique_violation(&e) => find_by_name(conn, name)
            .await?
            .ok_or_else(|| AppError::db(format!("player '{name}' vanished after insert race"))),
        Err(e) => Err(map_db_err(e)),
    }
}

/// Per-player aggregates across every recorded game.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct PlayerStats {
    pub id: i64,
    pub name: String,
    pub games_played: i64,
    pub games_won: i64,
    pub avg_score: f64,
    pub best_score: i32,
    pub worst_score: i32,
    /// games_won / games_played * 100, one decimal place.
    pub win_rate: f64,
}

/// Statistics for every player with at least one recorded game, most wins
/// first and best (lowest) average breaking ties. Scoped to the owning user
/// when the identity variant is active.
pub async fn player_stats(
    conn: &impl ConnectionTrait,
    user_id: Option<i64>,
) -> Result<Vec<PlayerStats>, AppError> {
    const SELECT: &str = r#"
        SELECT
            p.id,
            p.name,
            COUNT(gp.id) AS games_played,
            SUM(gp.won) AS games_won,
            ROUND(AVG(gp.total_score), 2) AS avg_score,
            MIN(gp.total_score) AS best_score,
            MAX(gp.total_score) AS worst_score,
            ROUND(CAST(SUM(gp.won) AS FLOAT) / COUNT(gp.id) * 100, 1) AS win_rate
        FROM players p
        JOIN game_participants gp ON p.id = gp.player_id
        JOIN games g ON gp.game_id = g.id
    "#;
    const TAIL: &str = r#"
        GROUP BY p.id
        HAVING games_played > 0
        ORDER BY games_won DESC, avg_score ASC
    "#;

    let backend = conn.get_database_backend();
    let stmt = match user_id {
        Some(uid) => Statement::from_sql_and_values(
            backend,
            format!("{SELECT} WHERE g.user_id = ? {TAIL}"),
            [uid.into()],
        ),
        None => Statement::from_string(backend, format!("{SELECT} {TAIL}")),
    };

    PlayerStats::find_by_statement(stmt)
        .all(conn)
        .await
        .map_err(map_db_err)
}

#[derive(Debug, FromQueryResult)]
struct HistoryRow {
    game_id: i64,
    date: String,
    created_at: String,
    total_score: i32,
    round_1: i32,
    round_2: i32,
    round_3: i32,
    round_4: i32,
    round_5: i32,
    round_6: i32,
    round_7: i32,
    round_8: i32,
    round_9: i32,
    won: bool,
}

/// One past game of a player, full round detail included.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerHistoryEntry {
    pub game_id: i64,
    pub date: String,
    pub created_at: String,
    pub total_score: i32,
    pub scores: [i32; ROUNDS_PER_GAME],
    pub won: bool,
}

/// All of one player's past games, newest first. Unauthenticated variant
/// only; there is no per-user scoping to apply here.
pub async fn player_history(
    conn: &impl ConnectionTrait,
    player_id: i64,
) -> Result<Vec<PlayerHistoryEntry>, AppError> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT
            g.id AS game_id,
            g.date,
            g.created_at,
            gp.total_score,
            gp.round_1, gp.round_2, gp.round_3, gp.round_4, gp.round_5,
            gp.round_6, gp.round_7, gp.round_8, gp.round_9,
            gp.won
        FROM game_participants gp
        JOIN games g ON gp.game_id = g.id
        WHERE gp.player_id = ?
        ORDER BY g.created_at DESC, g.id DESC
        "#,
        [player_id.into()],
    );

    let rows = HistoryRow::find_by_statement(stmt)
        .all(conn)
        .await
        .map_err(map_db_err)?;

    Ok(rows
        .into_iter()
        .map(|row| PlayerHistoryEntry {
            game_id: row.game_id,
            date: row.date,
            created_at: row.created_at,
            total_score: row.total_score,
            scores: [
                row.round_1,
                row.round_2,
                row.round_3,
                row.round_4,
                row.round_5,
                row.round_6,
                row.round_7,
                row.round_8,
                row.round_9,
            ],
            won: row.won,
        })
        .collect())
}
