//! Guarded Engine Operations
//!
//! The session controller: a synchronous state machine driven by five
//! external triggers (start, guess, advance, settings, timer tick) plus
//! pause/resume. Every operation runs to completion before the next is
//! admitted; invalid calls are rejected with an [`EngineError`] instead
//! of corrupting state.
//!
//! Both settlement paths - a submitted guess and a timer expiry - route
//! through one finalize primitive, so `total_score` is always recomputed
//! from the authoritative round list and a round can never be settled
//! twice.

use thiserror::Error;
use tracing::debug;

use crate::core::geo::{distance_km, Location};
use crate::core::score::{round_score, time_bonus};
use crate::game::events::GameEvent;
use crate::game::locations::LocationProvider;
use crate::game::settings::{is_allowed_round_time, GameSettings, SettingsUpdate};
use crate::game::state::{GamePhase, Round, SessionState};
use crate::ROUNDS_PER_GAME;

/// Rejected-operation signal for invalid engine calls.
///
/// These mark caller mistakes (calling an operation in the wrong phase),
/// not engine failures; state is untouched when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A guess arrived while no round was awaiting one.
    #[error("no round is awaiting a guess")]
    NotAwaitingGuess,

    /// A second guess arrived for an already-settled round.
    #[error("round {round} already has a recorded guess")]
    GuessAlreadyRecorded {
        /// Index of the settled round.
        round: usize,
    },

    /// `next_round` called while no result screen is showing.
    #[error("no round result is being shown")]
    NotShowingResult,

    /// A settings update carried a round time outside the allowed set.
    #[error("round time of {seconds}s is not an allowed option")]
    InvalidRoundTime {
        /// The rejected value, in seconds.
        seconds: u32,
    },

    /// Pause requested while the round clock is not running.
    #[error("no running round clock to pause")]
    TimerNotRunning,

    /// Resume requested while the round clock is not paused.
    #[error("round clock is not paused")]
    TimerNotPaused,
}

/// Result of a timer tick.
///
/// Ticks are deliberately infallible: a tick that lands after the round
/// was settled (a cancelled timer task racing its last tick) is a
/// guarded no-op, reported as [`TickOutcome::Idle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No round clock is running; nothing changed.
    Idle,
    /// The clock counted down one second.
    Counting {
        /// Seconds now left on the clock.
        time_remaining: u32,
    },
    /// The clock hit zero and the round was settled with no guess.
    Expired,
}

/// The game engine: session state plus a location provider.
///
/// Owned by the host application and passed by handle to UI
/// collaborators; nothing here is a global. All mutation goes through
/// the guarded operations below, and all reads go through
/// [`session`](Self::session).
#[derive(Debug)]
pub struct GameEngine<P> {
    provider: P,
    session: SessionState,
}

impl<P: LocationProvider> GameEngine<P> {
    /// Create an engine with default settings.
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, GameSettings::default())
    }

    /// Create an engine with explicit settings.
    pub fn with_settings(provider: P, settings: GameSettings) -> Self {
        Self {
            provider,
            session: SessionState::new(settings),
        }
    }

    /// Read-only snapshot of the session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Drain events generated since the last drain.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.session.take_events()
    }

    /// Start a new game, generating [`ROUNDS_PER_GAME`] rounds.
    ///
    /// Valid from any phase: starting over mid-game or from the
    /// finished screen discards the old rounds entirely. The provider
    /// is called once per round, independently; repeats are acceptable.
    pub fn start(&mut self) {
        let rounds: Vec<Round> = (0..ROUNDS_PER_GAME)
            .map(|_| Round::new(self.provider.next_location()))
            .collect();

        self.session.rounds = rounds;
        self.session.current_round = 0;
        self.session.phase = GamePhase::AwaitingGuess;
        self.session.total_score = 0;
        self.session.time_remaining = self.session.settings.round_time;
        self.session.timer_active = true;

        debug!(
            rounds = ROUNDS_PER_GAME,
            round_time = self.session.settings.round_time,
            "game started"
        );
        self.session.push_event(GameEvent::GameStarted {
            rounds: ROUNDS_PER_GAME,
            round_time: self.session.settings.round_time,
        });
    }

    /// Reset to the pre-start state. Valid from any phase; idempotent.
    pub fn reset(&mut self) {
        self.session.rounds.clear();
        self.session.current_round = 0;
        self.session.phase = GamePhase::NotStarted;
        self.session.total_score = 0;
        self.session.time_remaining = self.session.settings.round_time;
        self.session.timer_active = false;

        debug!("game reset");
        self.session.push_event(GameEvent::GameReset);
    }

    /// Score a guess against the current round and settle it.
    ///
    /// Only valid while awaiting a guess; the round's guess, distance
    /// and score are set exactly once and never overwritten.
    pub fn submit_guess(&mut self, guess: Location) -> Result<(), EngineError> {
        if self.session.phase != GamePhase::AwaitingGuess {
            return Err(EngineError::NotAwaitingGuess);
        }
        let round_idx = self.session.current_round;
        let round = self
            .session
            .active_round()
            .ok_or(EngineError::NotAwaitingGuess)?;
        if round.finalized() {
            // Unreachable while the phase guard holds, but the
            // once-set-never-overwritten invariant gets its own check.
            return Err(EngineError::GuessAlreadyRecorded { round: round_idx });
        }

        let distance = distance_km(round.actual, guess);
        let bonus = time_bonus(
            self.session.time_remaining,
            self.session.settings.round_time,
        );
        let score = round_score(distance, bonus);

        self.finalize_current(Some(guess), Some(distance), score);

        debug!(round = round_idx, distance, score, "guess scored");
        self.session.push_event(GameEvent::GuessScored {
            round: round_idx,
            distance_km: distance,
            time_bonus: bonus,
            score,
            total_score: self.session.total_score,
        });
        Ok(())
    }

    /// Leave the result screen and move to the next round.
    ///
    /// After the last round this finishes the game instead.
    pub fn next_round(&mut self) -> Result<(), EngineError> {
        if self.session.phase != GamePhase::ShowingResult {
            return Err(EngineError::NotShowingResult);
        }

        self.session.current_round += 1;

        if self.session.current_round >= self.session.rounds.len() {
            self.session.phase = GamePhase::Finished;
            self.session.timer_active = false;

            debug!(total_score = self.session.total_score, "game finished");
            self.session.push_event(GameEvent::GameFinished {
                total_score: self.session.total_score,
            });
        } else {
            self.session.phase = GamePhase::AwaitingGuess;
            self.session.time_remaining = self.session.settings.round_time;
            self.session.timer_active = true;

            self.session.push_event(GameEvent::RoundAdvanced {
                round: self.session.current_round,
            });
        }
        Ok(())
    }

    /// Advance the round clock by one second.
    ///
    /// A no-op unless the clock is running with time left. The tick
    /// that would reach zero settles the round through the same
    /// primitive as a guess, with no guessed location and a forced
    /// zero score; once settled, further ticks change nothing.
    pub fn timer_tick(&mut self) -> TickOutcome {
        if !self.session.timer_active
            || self.session.phase != GamePhase::AwaitingGuess
            || self.session.time_remaining == 0
        {
            return TickOutcome::Idle;
        }

        if self.session.time_remaining > 1 {
            self.session.time_remaining -= 1;
            return TickOutcome::Counting {
                time_remaining: self.session.time_remaining,
            };
        }

        // Time's up: settle with no guess, zero score, distance unset.
        self.session.time_remaining = 0;
        let round_idx = self.session.current_round;
        self.finalize_current(None, None, 0);

        debug!(round = round_idx, "round timed out");
        self.session.push_event(GameEvent::RoundTimedOut {
            round: round_idx,
            total_score: self.session.total_score,
        });
        TickOutcome::Expired
    }

    /// Validate and merge a settings update.
    ///
    /// A `round_time` change resets the round clock to the new value
    /// immediately; `time_remaining` therefore never exceeds the round
    /// time in effect.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<(), EngineError> {
        if let Some(seconds) = update.round_time {
            if !is_allowed_round_time(seconds) {
                return Err(EngineError::InvalidRoundTime { seconds });
            }
        }

        self.session.settings = update.merged_into(self.session.settings);
        if update.round_time.is_some() {
            self.session.time_remaining = self.session.settings.round_time;
        }

        self.session.push_event(GameEvent::SettingsUpdated {
            settings: self.session.settings,
        });
        Ok(())
    }

    /// Pause the round clock without settling anything.
    pub fn pause_timer(&mut self) -> Result<(), EngineError> {
        if self.session.phase != GamePhase::AwaitingGuess || !self.session.timer_active {
            return Err(EngineError::TimerNotRunning);
        }
        self.session.timer_active = false;
        self.session.push_event(GameEvent::TimerPaused {
            round: self.session.current_round,
        });
        Ok(())
    }

    /// Resume a paused round clock.
    pub fn resume_timer(&mut self) -> Result<(), EngineError> {
        if self.session.phase != GamePhase::AwaitingGuess || self.session.timer_active {
            return Err(EngineError::TimerNotPaused);
        }
        self.session.timer_active = true;
        self.session.push_event(GameEvent::TimerResumed {
            round: self.session.current_round,
        });
        Ok(())
    }

    /// The single settlement path for a round.
    ///
    /// Writes the outcome onto the current round, recomputes the total
    /// from the round list and moves to the result screen with the
    /// clock stopped - one atomic transition from the caller's view.
    fn finalize_current(&mut self, guess: Option<Location>, distance_km: Option<u32>, score: u32) {
        if let Some(round) = self.session.active_round_mut() {
            round.guess = guess;
            round.distance_km = distance_km;
            round.score = Some(score);
        }
        self.session.recompute_total();
        self.session.phase = GamePhase::ShowingResult;
        self.session.timer_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score::MAX_SCORE;

    /// Provider that cycles through a scripted list of locations.
    struct ScriptedProvider {
        locations: Vec<Location>,
        next: usize,
    }

    impl ScriptedProvider {
        fn new(locations: Vec<Location>) -> Self {
            Self { locations, next: 0 }
        }

        fn single(location: Location) -> Self {
            Self::new(vec![location])
        }
    }

    impl LocationProvider for ScriptedProvider {
        fn next_location(&mut self) -> Location {
            let loc = self.locations[self.next % self.locations.len()];
            self.next += 1;
            loc
        }
    }

    const TIMES_SQUARE: Location = Location::new(40.7580, -73.9855);
    const BIG_BEN: Location = Location::new(51.5007, -0.1246);

    fn engine_at(actual: Location) -> GameEngine<ScriptedProvider> {
        GameEngine::new(ScriptedProvider::single(actual))
    }

    /// The invariant every mutator must preserve.
    fn assert_total_consistent(session: &SessionState) {
        let expected: u32 = session.rounds.iter().filter_map(|r| r.score).sum();
        assert_eq!(session.total_score, expected);
    }

    #[test]
    fn test_start_initializes_session() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();

        let s = engine.session();
        assert_eq!(s.rounds.len(), ROUNDS_PER_GAME);
        assert_eq!(s.current_round, 0);
        assert!(s.is_started());
        assert!(!s.is_finished());
        assert!(s.timer_active);
        assert_eq!(s.time_remaining, s.settings.round_time);
        assert_eq!(s.total_score, 0);
        assert!(s.rounds.iter().all(|r| !r.finalized()));
    }

    #[test]
    fn test_start_emits_event() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        let events = engine.take_events();
        assert_eq!(
            events,
            vec![GameEvent::GameStarted {
                rounds: ROUNDS_PER_GAME,
                round_time: 120
            }]
        );
    }

    #[test]
    fn test_perfect_guess_full_time() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.submit_guess(TIMES_SQUARE).unwrap();

        let s = engine.session();
        let round = &s.rounds[0];
        assert_eq!(round.distance_km, Some(0));
        // Base 5000 plus full time bonus of 500, uncapped
        assert_eq!(round.score, Some(MAX_SCORE + MAX_SCORE / 10));
        assert_eq!(round.guess, Some(TIMES_SQUARE));
        assert_eq!(s.total_score, 5500);
        assert!(s.showing_result());
        assert!(!s.timer_active);
        assert_total_consistent(s);
    }

    #[test]
    fn test_guess_with_partial_time() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        // Burn half the clock: 120 -> 60
        for _ in 0..60 {
            assert!(matches!(engine.timer_tick(), TickOutcome::Counting { .. }));
        }
        assert_eq!(engine.session().time_remaining, 60);

        engine.submit_guess(TIMES_SQUARE).unwrap();
        // Base 5000 + floor((60/120) * 500) = 5250
        assert_eq!(engine.session().rounds[0].score, Some(5250));
    }

    #[test]
    fn test_double_submission_rejected() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.submit_guess(BIG_BEN).unwrap();
        let settled = engine.session().rounds[0].clone();

        // Second submission must not overwrite the first
        assert_eq!(
            engine.submit_guess(TIMES_SQUARE),
            Err(EngineError::NotAwaitingGuess)
        );
        assert_eq!(engine.session().rounds[0], settled);
        assert_total_consistent(engine.session());
    }

    #[test]
    fn test_submit_before_start_rejected() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_eq!(
            engine.submit_guess(BIG_BEN),
            Err(EngineError::NotAwaitingGuess)
        );
    }

    #[test]
    fn test_next_round_only_from_result_screen() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_eq!(engine.next_round(), Err(EngineError::NotShowingResult));

        engine.start();
        assert_eq!(engine.next_round(), Err(EngineError::NotShowingResult));

        engine.submit_guess(BIG_BEN).unwrap();
        assert!(engine.next_round().is_ok());

        let s = engine.session();
        assert_eq!(s.current_round, 1);
        assert!(!s.showing_result());
        assert!(s.timer_active);
        assert_eq!(s.time_remaining, s.settings.round_time);
    }

    #[test]
    fn test_timeout_settles_with_zero_score() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();

        let round_time = engine.session().settings.round_time;
        for _ in 0..round_time - 1 {
            assert!(matches!(engine.timer_tick(), TickOutcome::Counting { .. }));
        }
        assert_eq!(engine.timer_tick(), TickOutcome::Expired);

        let s = engine.session();
        let round = &s.rounds[0];
        assert_eq!(round.score, Some(0));
        assert!(round.guess.is_none());
        assert!(round.distance_km.is_none());
        assert_eq!(s.time_remaining, 0);
        assert!(s.showing_result());
        assert!(!s.timer_active);
        assert_total_consistent(s);
    }

    #[test]
    fn test_timeout_is_idempotent() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        while engine.timer_tick() != TickOutcome::Expired {}

        let settled = engine.session().clone();
        for _ in 0..10 {
            assert_eq!(engine.timer_tick(), TickOutcome::Idle);
        }
        let s = engine.session();
        assert_eq!(s.rounds, settled.rounds);
        assert_eq!(s.time_remaining, 0);
        assert_eq!(s.total_score, settled.total_score);
    }

    #[test]
    fn test_no_guess_accepted_after_expiry() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        while engine.timer_tick() != TickOutcome::Expired {}

        assert_eq!(
            engine.submit_guess(TIMES_SQUARE),
            Err(EngineError::NotAwaitingGuess)
        );
        assert_eq!(engine.session().rounds[0].score, Some(0));
    }

    #[test]
    fn test_tick_outside_round_is_idle() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_eq!(engine.timer_tick(), TickOutcome::Idle);

        engine.start();
        engine.submit_guess(BIG_BEN).unwrap();
        // Result screen showing: late ticks from a cancelled timer
        // task must not touch anything.
        let before = engine.session().time_remaining;
        assert_eq!(engine.timer_tick(), TickOutcome::Idle);
        assert_eq!(engine.session().time_remaining, before);
    }

    #[test]
    fn test_full_game_to_finished() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();

        for round in 0..ROUNDS_PER_GAME {
            if round % 2 == 0 {
                engine.submit_guess(BIG_BEN).unwrap();
            } else {
                while engine.timer_tick() != TickOutcome::Expired {}
            }
            assert_total_consistent(engine.session());
            engine.next_round().unwrap();
        }

        let s = engine.session();
        assert!(s.is_finished());
        assert_eq!(s.current_round, ROUNDS_PER_GAME);
        assert!(!s.timer_active);
        assert!(!s.showing_result());
        assert_eq!(s.display_round(), ROUNDS_PER_GAME);

        // Guessed rounds 0/2/4 all scored the same; timed-out rounds scored 0
        let per_round = s.rounds[0].score.unwrap();
        assert_eq!(s.total_score, per_round * 3);
        assert_total_consistent(s);

        // Nothing left to advance to
        assert_eq!(engine.next_round(), Err(EngineError::NotShowingResult));
    }

    #[test]
    fn test_finished_game_emits_final_event() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        for _ in 0..ROUNDS_PER_GAME {
            engine.submit_guess(TIMES_SQUARE).unwrap();
            engine.next_round().unwrap();
        }
        let events = engine.take_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameFinished {
                total_score: 5500 * ROUNDS_PER_GAME as u32
            })
        );
    }

    #[test]
    fn test_reset_returns_to_pristine() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.submit_guess(BIG_BEN).unwrap();
        engine.reset();

        let s = engine.session();
        assert!(!s.is_started());
        assert!(s.rounds.is_empty());
        assert_eq!(s.current_round, 0);
        assert_eq!(s.total_score, 0);
        assert_eq!(s.time_remaining, s.settings.round_time);
        assert!(!s.timer_active);

        // Idempotent
        engine.reset();
        assert!(!engine.session().is_started());
    }

    #[test]
    fn test_restart_mid_game_discards_old_rounds() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.submit_guess(BIG_BEN).unwrap();
        let old_total = engine.session().total_score;
        assert!(old_total > 0);

        engine.start();
        let s = engine.session();
        assert_eq!(s.total_score, 0);
        assert_eq!(s.current_round, 0);
        assert!(s.rounds.iter().all(|r| !r.finalized()));
        assert!(s.timer_active);
    }

    #[test]
    fn test_update_settings_validates_round_time() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_eq!(
            engine.update_settings(SettingsUpdate {
                round_time: Some(45),
                allow_navigation: None,
            }),
            Err(EngineError::InvalidRoundTime { seconds: 45 })
        );
        // Rejected update leaves settings untouched
        assert_eq!(engine.session().settings.round_time, 120);
    }

    #[test]
    fn test_update_round_time_resets_clock() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine
            .update_settings(SettingsUpdate {
                round_time: Some(30),
                allow_navigation: None,
            })
            .unwrap();

        let s = engine.session();
        assert_eq!(s.settings.round_time, 30);
        assert_eq!(s.time_remaining, 30);

        // A started game picks up the new round time too
        engine.start();
        assert_eq!(engine.session().time_remaining, 30);
    }

    #[test]
    fn test_update_navigation_only_keeps_clock() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.timer_tick();
        let remaining = engine.session().time_remaining;

        engine
            .update_settings(SettingsUpdate {
                round_time: None,
                allow_navigation: Some(false),
            })
            .unwrap();

        let s = engine.session();
        assert!(!s.settings.allow_navigation);
        assert_eq!(s.time_remaining, remaining);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_eq!(engine.pause_timer(), Err(EngineError::TimerNotRunning));

        engine.start();
        assert_eq!(engine.resume_timer(), Err(EngineError::TimerNotPaused));

        engine.pause_timer().unwrap();
        let s = engine.session();
        assert!(!s.timer_active);
        assert!(s.phase == GamePhase::AwaitingGuess);

        // Paused clock does not count down
        assert_eq!(engine.timer_tick(), TickOutcome::Idle);

        engine.resume_timer().unwrap();
        assert!(engine.session().timer_active);
        assert!(matches!(engine.timer_tick(), TickOutcome::Counting { .. }));
    }

    #[test]
    fn test_guess_while_paused_still_scores() {
        let mut engine = engine_at(TIMES_SQUARE);
        engine.start();
        engine.pause_timer().unwrap();
        engine.submit_guess(TIMES_SQUARE).unwrap();
        // Full clock remaining at submission -> full bonus
        assert_eq!(engine.session().rounds[0].score, Some(5500));
    }

    #[test]
    fn test_total_consistent_after_every_operation() {
        let mut engine = engine_at(TIMES_SQUARE);
        assert_total_consistent(engine.session());

        engine.start();
        assert_total_consistent(engine.session());

        engine.timer_tick();
        assert_total_consistent(engine.session());

        engine.submit_guess(BIG_BEN).unwrap();
        assert_total_consistent(engine.session());

        engine.next_round().unwrap();
        assert_total_consistent(engine.session());

        while engine.timer_tick() != TickOutcome::Expired {}
        assert_total_consistent(engine.session());

        engine.reset();
        assert_total_consistent(engine.session());
    }
}
