//! Game Events
//!
//! Events generated by the engine's operations, drained by the host and
//! fanned out to display collaborators (scoreboard, timer display,
//! results map). Serialized with a `type` tag so UI layers can match on
//! the variant name.

use serde::{Deserialize, Serialize};

use crate::game::settings::GameSettings;

/// An event produced by a state transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new session started.
    GameStarted {
        /// Number of rounds generated.
        rounds: usize,
        /// Round time in effect, seconds.
        round_time: u32,
    },

    /// A guess was scored against the current round.
    GuessScored {
        /// Round index (0-based).
        round: usize,
        /// Distance from the actual location, whole km.
        distance_km: u32,
        /// Time bonus portion of the score.
        time_bonus: u32,
        /// Total score for the round (base + bonus).
        score: u32,
        /// Session total after this round.
        total_score: u32,
    },

    /// The round clock ran out before a guess was placed.
    RoundTimedOut {
        /// Round index (0-based).
        round: usize,
        /// Session total after this round (unchanged: the round
        /// scored zero).
        total_score: u32,
    },

    /// Play moved on to the next round.
    RoundAdvanced {
        /// New round index (0-based).
        round: usize,
    },

    /// The last round was settled and the session is over.
    GameFinished {
        /// Final session total.
        total_score: u32,
    },

    /// The session was reset to its pre-start state.
    GameReset,

    /// Settings were updated.
    SettingsUpdated {
        /// The merged settings now in effect.
        settings: GameSettings,
    },

    /// The round clock was paused.
    TimerPaused {
        /// Round index (0-based).
        round: usize,
    },

    /// The round clock was resumed.
    TimerResumed {
        /// Round index (0-based).
        round: usize,
    },
}
