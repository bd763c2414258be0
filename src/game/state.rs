//! Game State Definitions
//!
//! Session and round state for one game. The state is only mutated
//! through the engine's guarded operations; collaborators read it as a
//! snapshot.

use serde::{Deserialize, Serialize};

use crate::core::geo::Location;
use crate::game::events::GameEvent;
use crate::game::settings::GameSettings;
use crate::ROUNDS_PER_GAME;

// =============================================================================
// ROUND
// =============================================================================

/// One guess-the-location challenge within a session.
///
/// Created with only the actual location set; finalized exactly once,
/// either by a submitted guess or by the round timer expiring. A round
/// with a `score` is finalized and never mutated again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// The location shown in the panorama.
    pub actual: Location,

    /// The player's guess. `None` means no guess was submitted
    /// (the round timed out).
    pub guess: Option<Location>,

    /// Great-circle distance between actual and guess, whole km.
    /// Unset until a guess is recorded; stays unset on timeout.
    pub distance_km: Option<u32>,

    /// Score awarded for this round. Set exactly once, at finalization.
    pub score: Option<u32>,
}

impl Round {
    /// Create a fresh round for an actual location.
    pub fn new(actual: Location) -> Self {
        Self {
            actual,
            guess: None,
            distance_km: None,
            score: None,
        }
    }

    /// Whether this round has been settled (by guess or timeout).
    #[inline]
    pub fn finalized(&self) -> bool {
        self.score.is_some()
    }
}

// =============================================================================
// GAME PHASE
// =============================================================================

/// Current phase of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game in progress.
    #[default]
    NotStarted,
    /// Current round is live, waiting for a pin drop.
    AwaitingGuess,
    /// Current round settled, result screen showing.
    ShowingResult,
    /// All rounds played.
    Finished,
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Complete state of one game session.
///
/// Owned by a [`GameEngine`](crate::game::engine::GameEngine); display
/// collaborators get it as a read-only snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// All rounds of the session, in play order. Empty before start.
    pub rounds: Vec<Round>,

    /// Index of the current round (0-based). Equals `rounds.len()`
    /// once the game is finished.
    pub current_round: usize,

    /// Current phase; the started/finished/showing-result flags are
    /// derived from it.
    pub phase: GamePhase,

    /// Sum of all finalized round scores.
    pub total_score: u32,

    /// Seconds left on the current round's clock.
    pub time_remaining: u32,

    /// Whether the round clock is running. True only while awaiting a
    /// guess and not paused.
    pub timer_active: bool,

    /// Settings in effect for this session.
    pub settings: GameSettings,

    /// Events generated since the last drain (cleared by `take_events`).
    #[serde(skip)]
    pub(crate) pending_events: Vec<GameEvent>,
}

impl SessionState {
    /// Create a pristine, not-started session with the given settings.
    pub fn new(settings: GameSettings) -> Self {
        Self {
            rounds: Vec::new(),
            current_round: 0,
            phase: GamePhase::NotStarted,
            total_score: 0,
            time_remaining: settings.round_time,
            timer_active: false,
            settings,
            pending_events: Vec::new(),
        }
    }

    /// Whether a game has been started (and not reset since).
    #[inline]
    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    /// Whether all rounds have been played.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Whether the result screen for the current round is showing.
    #[inline]
    pub fn showing_result(&self) -> bool {
        self.phase == GamePhase::ShowingResult
    }

    /// 1-based round number for display, clamped to the round count.
    ///
    /// Stays at N on the finished screen even though `current_round`
    /// has advanced past the last index.
    pub fn display_round(&self) -> usize {
        (self.current_round + 1).min(ROUNDS_PER_GAME)
    }

    /// The round currently in play (or being shown), if any.
    ///
    /// `None` before start and after the last round is left behind.
    pub fn active_round(&self) -> Option<&Round> {
        self.rounds.get(self.current_round)
    }

    pub(crate) fn active_round_mut(&mut self) -> Option<&mut Round> {
        self.rounds.get_mut(self.current_round)
    }

    /// Recompute `total_score` from the authoritative round list.
    ///
    /// Always called from the finalize primitive, never skipped, so no
    /// separate accumulator can drift.
    pub(crate) fn recompute_total(&mut self) {
        self.total_score = self.rounds.iter().filter_map(|r| r.score).sum();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
