use serde::Serialize;

use crate::domain::scoring;
use crate::entities::game_participants::ROUNDS_PER_GAME;

/// Fixed-length per-round scores for one player, round 1 first.
pub type RoundScores = [i32; ROUNDS_PER_GAME];

/// Identifier local to one unsaved scoreboard. Never persisted; the store
/// assigns real player ids at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalPlayerId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEntry {
    pub id: LocalPlayerId,
    pub name: String,
    pub scores: RoundScores,
}

impl PlayerEntry {
    pub fn total(&self) -> i32 {
        self.scores.iter().sum()
    }
}

/// The transient, unsaved game state held by the view layer.
///
/// An immutable value: every change goes through
/// [`transitions::apply`](crate::domain::transitions::apply), which returns
/// a new scoreboard. Derived values (totals, leader) are recomputed on
/// demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub players: Vec<PlayerEntry>,
    pub(super) next_id: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current leader: the player with the minimum total. Ties go to the
    /// first-seen player, matching the view's display order.
    pub fn leader(&self) -> Option<&PlayerEntry> {
        let totals: Vec<i32> = self.players.iter().map(PlayerEntry::total).collect();
        let min = scoring::winning_total(&totals)?;
        self.players.iter().find(|p| p.total() == min)
    }

    /// Whether any non-zero score has been entered. The view warns before a
    /// reset that would discard these.
    pub fn has_recorded_scores(&self) -> bool {
        self.players
            .iter()
            .any(|p| p.scores.iter().any(|s| *s != 0))
    }
}
