//! Scoreboard Persistence Seam
//!
//! Interface to the high-score collaborator. Entirely decoupled from
//! in-session state: a failing backend can never stall round
//! progression, it just reports an error upward. Identified players
//! keep a single best entry; anonymous submissions always insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A persisted high score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Entry identifier.
    pub id: Uuid,
    /// Player identity, if signed in.
    pub player: Option<Uuid>,
    /// Name to show on the leaderboard.
    pub display_name: String,
    /// Final session total.
    pub score: u32,
    /// When the score was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of a save attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    /// The score was recorded.
    Saved(ScoreEntry),
    /// The player's previous best is higher; nothing was recorded.
    NotImproved {
        /// The standing best score for this player.
        previous_best: u32,
    },
}

/// Scoreboard backend failure.
///
/// Recoverable from the game's point of view: the session keeps its
/// state and the caller surfaces a message to the player.
#[derive(Debug, Error)]
pub enum ScoreboardError {
    /// The backing store rejected or lost the request.
    #[error("scoreboard backend unavailable: {0}")]
    Backend(String),
}

/// High-score persistence collaborator.
pub trait Scoreboard {
    /// Record a finished session's total for a player.
    ///
    /// For an identified player, only a strictly higher score replaces
    /// the previous best. Anonymous scores are always recorded.
    fn save_score(
        &mut self,
        score: u32,
        display_name: &str,
        player: Option<Uuid>,
    ) -> Result<SaveOutcome, ScoreboardError>;

    /// Top scores, highest first.
    fn high_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ScoreboardError>;

    /// An identified player's best entry, if any.
    fn best_for(&self, player: Uuid) -> Result<Option<ScoreEntry>, ScoreboardError>;
}

/// In-memory scoreboard for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryScoreboard {
    entries: Vec<ScoreEntry>,
}

impl InMemoryScoreboard {
    /// Create an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scoreboard for InMemoryScoreboard {
    fn save_score(
        &mut self,
        score: u32,
        display_name: &str,
        player: Option<Uuid>,
    ) -> Result<SaveOutcome, ScoreboardError> {
        if let Some(player_id) = player {
            if let Some(best) = self
                .entries
                .iter()
                .filter(|e| e.player == Some(player_id))
                .map(|e| e.score)
                .max()
            {
                if best >= score {
                    return Ok(SaveOutcome::NotImproved {
                        previous_best: best,
                    });
                }
                // New personal best replaces the old entry
                self.entries.retain(|e| e.player != Some(player_id));
            }
        }

        let entry = ScoreEntry {
            id: Uuid::new_v4(),
            player,
            display_name: display_name.to_owned(),
            score,
            recorded_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        Ok(SaveOutcome::Saved(entry))
    }

    fn high_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        let mut scores = self.entries.clone();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(limit);
        Ok(scores)
    }

    fn best_for(&self, player: Uuid) -> Result<Option<ScoreEntry>, ScoreboardError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.player == Some(player))
            .max_by_key(|e| e.score)
            .cloned())
    }
}
