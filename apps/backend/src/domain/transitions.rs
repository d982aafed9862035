use crate::domain::scoreboard::{LocalPlayerId, PlayerEntry, Scoreboard};
use crate::entities::game_participants::ROUNDS_PER_GAME;

/// One view-layer action against the unsaved scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardAction {
    /// Append a player with a fresh local id and nine zeroed scores.
    /// A blank name is a no-op.
    AddPlayer { name: String },
    /// Set one round score. Values clamp to non-negative; an unknown player
    /// or out-of-range round leaves the board unchanged.
    UpdateScore {
        player: LocalPlayerId,
        round: usize,
        value: i32,
    },
    /// Discard a player's local state.
    RemovePlayer { player: LocalPlayerId },
    /// Start over with an empty board.
    Reset,
}

/// Apply one transition, returning the next scoreboard value. Total: every
/// action on every board produces a board, never an error.
pub fn apply(board: &Scoreboard, action: ScoreboardAction) -> Scoreboard {
    match action {
        ScoreboardAction::AddPlayer { name } => {
            let name = name.trim();
            if name.is_empty() {
                return board.clone();
            }
            let mut next = board.clone();
            next.players.push(PlayerEntry {
                id: LocalPlayerId(next.next_id),
                name: name.to_string(),
                scores: [0; ROUNDS_PER_GAME],
            });
            next.next_id += 1;
            next
        }
        ScoreboardAction::UpdateScore {
            player,
            round,
            value,
        } => {
            if round >= ROUNDS_PER_GAME {
                return board.clone();
            }
            let mut next = board.clone();
            if let Some(entry) = next.players.iter_mut().find(|p| p.id == player) {
                entry.scores[round] = value.max(0);
            }
            next
        }
        ScoreboardAction::RemovePlayer { player } => {
            let mut next = board.clone();
            next.players.retain(|p| p.id != player);
            next
        }
        ScoreboardAction::Reset => Scoreboard::new(),
    }
}
