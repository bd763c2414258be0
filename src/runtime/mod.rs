//! Async Driver (tokio)
//!
//! The only part of the crate that touches wall-clock time. A
//! [`SessionHost`](host::SessionHost) owns the engine behind a command
//! channel and fans events out to collaborators; a
//! [`RoundTimer`](timer::RoundTimer) delivers one tick per second and
//! is cancelled on every transition out of awaiting-guess.

pub mod host;
pub mod timer;

pub use host::{HostError, HostHandle, SessionHost};
pub use timer::RoundTimer;
