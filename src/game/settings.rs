//! Game Settings
//!
//! Structured configuration for a session. Settings are immutable values;
//! changes go through [`SettingsUpdate`], a partial update validated and
//! merged by the engine into a new settings value.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_ROUND_TIME;

/// Allowed round durations in seconds.
pub const ROUND_TIME_OPTIONS: [u32; 5] = [30, 60, 120, 180, 300];

/// Settings for a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Time per round in seconds. One of [`ROUND_TIME_OPTIONS`].
    pub round_time: u32,

    /// Whether the panorama viewer should allow moving around.
    ///
    /// Advisory flag for the viewer collaborator only; has no effect
    /// on scoring.
    pub allow_navigation: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_time: DEFAULT_ROUND_TIME,
            allow_navigation: true,
        }
    }
}

/// Partial settings update.
///
/// `None` fields are left unchanged by the merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New round time in seconds, if changing.
    pub round_time: Option<u32>,
    /// New navigation flag, if changing.
    pub allow_navigation: Option<bool>,
}

impl SettingsUpdate {
    /// Merge this update into existing settings, producing a new value.
    ///
    /// Validation happens in the engine before merging.
    pub fn merged_into(self, settings: GameSettings) -> GameSettings {
        GameSettings {
            round_time: self.round_time.unwrap_or(settings.round_time),
            allow_navigation: self.allow_navigation.unwrap_or(settings.allow_navigation),
        }
    }
}

/// Check whether a round time is one of the allowed options.
#[inline]
pub fn is_allowed_round_time(seconds: u32) -> bool {
    ROUND_TIME_OPTIONS.contains(&seconds)
}
