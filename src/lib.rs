//! # Pinpoint Game Engine
//!
//! Round and scoring engine for a street-level panorama guessing game:
//! the player is shown a panorama, drops a pin on a world map, and is
//! scored by great-circle distance plus a time bonus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PINPOINT ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure leaf primitives                      │
//! │  ├── geo.rs      - Locations and haversine distance          │
//! │  ├── score.rs    - Exponential-decay scoring + time bonus    │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  game/           - Session state machine                     │
//! │  ├── state.rs    - Rounds, phase, session state              │
//! │  ├── engine.rs   - Guarded operations (start/guess/tick/...) │
//! │  ├── settings.rs - Round time and navigation settings        │
//! │  ├── locations.rs- Location provider for round generation    │
//! │  ├── events.rs   - Events for display collaborators          │
//! │  └── scoreboard.rs - High score persistence seam             │
//! │                                                              │
//! │  runtime/        - Async driver (tokio)                      │
//! │  ├── timer.rs    - Cancellable one-second tick task          │
//! │  └── host.rs     - Session host command loop + event fanout  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are synchronous and deterministic:
//! every state change happens inside one of the engine's guarded
//! operations, and all randomness (location selection) comes from a
//! seeded Xorshift128+ generator. Given the same seed, the same settings
//! and the same operation sequence, a session plays out identically.
//!
//! The `runtime/` module is the only place that touches wall-clock time:
//! it delivers one `timer_tick` per second and cancels the pending tick
//! task on every transition out of awaiting-guess.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::geo::{distance_km, Location, EARTH_RADIUS_KM};
pub use crate::core::rng::SessionRng;
pub use crate::core::score::{base_score, round_score, time_bonus, MAX_SCORE};
pub use crate::game::engine::{EngineError, GameEngine, TickOutcome};
pub use crate::game::events::GameEvent;
pub use crate::game::locations::{CatalogProvider, LocationProvider};
pub use crate::game::settings::{GameSettings, SettingsUpdate, ROUND_TIME_OPTIONS};
pub use crate::game::state::{GamePhase, Round, SessionState};
pub use crate::runtime::host::{HostError, HostHandle, SessionHost};
pub use crate::runtime::timer::RoundTimer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rounds per game session
pub const ROUNDS_PER_GAME: usize = 5;

/// Default round time in seconds (2 minutes)
pub const DEFAULT_ROUND_TIME: u32 = 120;
