//! Scoring Functions
//!
//! Pure, stateless scoring: an exponential decay over guess distance
//! plus a linear time bonus. No dependency on session state beyond the
//! explicit inputs, so every formula is testable in isolation.

/// Maximum base score for a perfect guess.
pub const MAX_SCORE: u32 = 5000;

/// Distance in kilometers at which the base score falls to `1/e` of max.
pub const DISTANCE_DECAY_KM: f64 = 2000.0;

/// Base score for a guess at the given distance.
///
/// `round(MAX_SCORE * e^(-distance / 2000))`: a perfect guess earns
/// [`MAX_SCORE`], and the score decays toward (but never below) zero as
/// the distance grows.
#[inline]
pub fn base_score(distance_km: u32) -> u32 {
    let decayed = f64::from(MAX_SCORE) * (-f64::from(distance_km) / DISTANCE_DECAY_KM).exp();
    decayed.round() as u32
}

/// Time bonus for the fraction of round time left at submission.
///
/// `floor((time_remaining / round_time) * MAX_SCORE / 10)`: up to 10% of
/// [`MAX_SCORE`], linear in the remaining time. Zero for a zero
/// `round_time` (never produced by validated settings).
#[inline]
pub fn time_bonus(time_remaining: u32, round_time: u32) -> u32 {
    if round_time == 0 {
        return 0;
    }
    let fraction = f64::from(time_remaining) / f64::from(round_time);
    (fraction * (f64::from(MAX_SCORE) / 10.0)).floor() as u32
}

/// Final score for a round: base score plus time bonus.
///
/// Deliberately uncapped: a perfect guess with full time remaining earns
/// `MAX_SCORE + MAX_SCORE/10`. This mirrors the original product
/// behavior rather than clamping at [`MAX_SCORE`].
#[inline]
pub fn round_score(distance_km: u32, bonus: u32) -> u32 {
    base_score(distance_km) + bonus
}
