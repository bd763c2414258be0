//! Session State Machine
//!
//! The game engine proper: one session of N rounds, driven by guarded
//! operations and a one-second timer tick.
//!
//! ## Module Structure
//!
//! - `state`: rounds, phase and session state
//! - `engine`: the guarded operations (start, guess, advance, tick, ...)
//! - `settings`: round time and navigation settings
//! - `locations`: location provider for round generation
//! - `events`: events consumed by display collaborators
//! - `scoreboard`: high score persistence seam

pub mod engine;
pub mod events;
pub mod locations;
pub mod scoreboard;
pub mod settings;
pub mod state;

// Re-export key types
pub use engine::{EngineError, GameEngine, TickOutcome};
pub use events::GameEvent;
pub use locations::{CatalogProvider, LocationProvider};
pub use scoreboard::{InMemoryScoreboard, SaveOutcome, ScoreEntry, Scoreboard, ScoreboardError};
pub use settings::{GameSettings, SettingsUpdate, ROUND_TIME_OPTIONS};
pub use state::{GamePhase, Round, SessionState};
