//! Pure leaf primitives.
//!
//! Everything in this module is stateless or self-contained: geographic
//! math, scoring formulas and the seeded PRNG used for location selection.
//! Nothing here depends on session state.

pub mod geo;
pub mod rng;
pub mod score;

// Re-export core types
pub use geo::{distance_km, Location, EARTH_RADIUS_KM};
pub use rng::SessionRng;
pub use score::{base_score, round_score, time_bonus, MAX_SCORE};
