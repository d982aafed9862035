use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, NotSet,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::scoreboard::Scoreboard;
use crate::domain::scoring;
use crate::entities::game_participants::{self, ROUNDS_PER_GAME};
use crate::entities::{games, players};
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::services::players::find_or_create_player;

/// One player's line in a save payload: name, the nine round scores, and
/// the client-computed total (trusted, never recomputed here).
#[derive(Debug, Clone, Deserialize)]
pub struct SaveGamePlayer {
    pub name: String,
    #[serde(default)]
    pub scores: Vec<i32>,
    #[serde(rename = "totalScore")]
    pub total_score: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveGameRequest {
    pub players: Vec<SaveGamePlayer>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SaveGameRequest {
    /// Package the transient scoreboard into a save payload.
    pub fn from_scoreboard(board: &Scoreboard, date: Option<String>) -> Self {
        Self {
            players: board
                .players
                .iter()
                .map(|p| SaveGamePlayer {
                    name: p.name.clone(),
                    scores: p.scores.to_vec(),
                    total_score: p.total(),
                })
                .collect(),
            date,
        }
    }
}

/// Fixed nine-slot round array from whatever the client sent: missing
/// entries read as 0, entries past round nine are dropped.
fn round_scores(submitted: &[i32]) -> [i32; ROUNDS_PER_GAME] {
    let mut rounds = [0; ROUNDS_PER_GAME];
    for (slot, value) in rounds.iter_mut().zip(submitted) {
        *slot = *value;
    }
    rounds
}

/// Persist a completed game: one row in `games`, one participant per
/// player, `won` set for every total at the minimum.
///
/// Must run on a transaction; a failure on any row leaves nothing
/// committed. Player names resolve through the race-safe roster upsert.
pub async fn save_game(
    conn: &impl ConnectionTrait,
    user_id: Option<i64>,
    req: &SaveGameRequest,
) -> Result<i64, AppError> {
    if req.players.is_empty() {
        return Err(AppError::validation("No players provided"));
    }

    let now = OffsetDateTime::now_utc();
    let date = match &req.date {
        Some(date) => date.clone(),
        None => now
            .format(&Rfc3339)
            .map_err(|e| AppError::internal(format!("failed to format date: {e}")))?,
    };

    let game = games::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        date: Set(date),
        completed: Set(true),
        created_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;

    let totals: Vec<i32> = req.players.iter().map(|p| p.total_score).collect();
    let winners = scoring::winner_flags(&totals);

    for (entry, won) in req.players.iter().zip(winners) {
        let player = find_or_create_player(conn, &entry.name).await?;
        let rounds = round_scores(&entry.scores);

        game_participants::ActiveModel {
            id: NotSet,
            game_id: Set(game.id),
            player_id: Set(player.id),
            total_score: Set(entry.total_score),
            round_1: Set(rounds[0]),
            round_2: Set(rounds[1]),
            round_3: Set(rounds[2]),
            round_4: Set(rounds[3]),
            round_5: Set(rounds[4]),
            round_6: Set(rounds[5]),
            round_7: Set(rounds[6]),
            round_8: Set(rounds[7]),
            round_9: Set(rounds[8]),
            won: Set(won),
        }
        .insert(conn)
        .await
        .map_err(map_db_err)?;
    }

    Ok(game.id)
}

/// One row of the games listing.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct GameSummary {
    pub id: i64,
    pub date: String,
    pub created_at: String,
    pub player_count: i64,
    pub winning_score: Option<i32>,
    pub winner_name: Option<String>,
}

/// Up to the 50 most recent games, newest first (id breaks creation-time
/// ties). Scoped to the owning user when the identity variant is active.
pub async fn list_games(
    conn: &impl ConnectionTrait,
    user_id: Option<i64>,
) -> Result<Vec<GameSummary>, AppError> {
    const SELECT: &str = r#"
        SELECT
            g.id,
            g.date,
            g.created_at,
            COUNT(gp.id) AS player_count,
            MIN(gp.total_score) AS winning_score,
            (SELECT p.name FROM players p
             JOIN game_participants gp2 ON p.id = gp2.player_id
             WHERE gp2.game_id = g.id AND gp2.won = 1
             ORDER BY gp2.id LIMIT 1) AS winner_name
        FROM games g
        LEFT JOIN game_participants gp ON g.id = gp.game_id
    "#;
    const TAIL: &str = r#"
        GROUP BY g.id
        ORDER BY g.created_at DESC, g.id DESC
        LIMIT 50
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

    GameSummary::find_by_statement(stmt)
        .all(conn)
        .await
        .map_err(map_db_err)
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDetail {
    pub id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub total_score: i32,
    pub scores: [i32; ROUNDS_PER_GAME],
    pub won: bool,
}

/// The game row plus its participants, best score first.
#[derive(Debug, Clone, Serialize)]
pub struct GameDetail {
    pub id: i64,
    pub user_id: Option<i64>,
    pub date: String,
    pub completed: bool,
    pub created_at: String,
    pub participants: Vec<ParticipantDetail>,
}

pub async fn game_detail(
    conn: &impl ConnectionTrait,
    user_id: Option<i64>,
    game_id: i64,
) -> Result<GameDetail, AppError> {
    let mut query = games::Entity::find_by_id(game_id);
    if let Some(uid) = user_id {
        query = query.filter(games::Column::UserId.eq(uid));
    }
    let game = query
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::not_found("Game not found"))?;

    let rows = game_participants::Entity::find()
        .filter(game_participants::Column::GameId.eq(game_id))
        .find_also_related(players::Entity)
        .order_by_asc(game_participants::Column::TotalScore)
        .all(conn)
        .await
        .map_err(map_db_err)?;

    let participants = rows
        .into_iter()
        .map(|(gp, player)| ParticipantDetail {
            id: gp.id,
            player_id: gp.player_id,
            player_name: player.map(|p| p.name).unwrap_or_default(),
            total_score: gp.total_score,
            scores: gp.rounds(),
            won: gp.won,
        })
        .collect();

    let created_at = game
        .created_at
        .format(&Rfc3339)
        .map_err(|e| AppError::internal(format!("failed to format created_at: {e}")))?;

    Ok(GameDetail {
        id: game.id,
        user_id: game.user_id,
        date: game.date,
        completed: game.completed,
        created_at,
        participants,
    })
}

/// Delete a game by id; participants go with it via the cascade. NotFound
/// when no row matched, including an ownership mismatch.
pub async fn delete_game(
    conn: &impl ConnectionTrait,
    user_id: Option<i64>,
    game_id: i64,
) -> Result<(), AppError> {
    let mut query = games::Entity::delete_many().filter(games::Column::Id.eq(game_id));
    if let Some(uid) = user_id {
        query = query.filter(games::Column::UserId.eq(uid));
    }

    let result = query.exec(conn).await.map_err(map_db_err)?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Game not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{round_scores, SaveGameRequest};
    use crate::domain::scoreboard::Scoreboard;
    use crate::domain::transitions::{apply, ScoreboardAction};

    #[test]
    fn test_round_scores_pads_and_truncates() {
        assert_eq!(round_scores(&[1, 2, 3]), [1, 2, 3, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            round_scores(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
            [1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(round_scores(&[]), [0; 9]);
    }

    #[test]
    fn test_save_request_from_scoreboard() {
        let board = apply(
            &Scoreboard::new(),
            ScoreboardAction::AddPlayer {
                name: "Ann".to_string(),
            },
        );
        let ann = board.players[0].id;
        let board = apply(
            &board,
            ScoreboardAction::UpdateScore {
                player: ann,
                round: 0,
                value: 4,
            },
        );

        let req = SaveGameRequest::from_scoreboard(&board, Some("2026-08-05".to_string()));

        assert_eq!(req.players.len(), 1);
        assert_eq!(req.players[0].name, "Ann");
        assert_eq!(req.players[0].scores, vec![4, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(req.players[0].total_score, 4);
        assert_eq!(req.date.as_deref(), Some("2026-08-05"));
    }
}
