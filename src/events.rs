//! Host-facing notifications
//!
//! The engine emits plain values on an unbounded channel; the hosting
//! layer maps them onto its own controls (play/pause icon, seek slider,
//! time label). Serde-serializable so embedding hosts can forward them
//! over whatever wire they already have.

use serde::{Deserialize, Serialize};

use crate::engine::state::PlayerState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// The state machine moved.
    StateChanged { state: PlayerState },
    /// A newly loaded source exposed its duration.
    DurationReady { seconds: f64, label: String },
    /// Position tick: seek-bar fraction in [0, 1] plus the "MM:SS" label.
    /// High-frequency and read-only; never accompanies a state change.
    Position { fraction: f64, label: String },
    RecordingStarted,
    /// A recording stopped with nothing captured; the prior source stays.
    RecordingDiscarded { reason: String },
    /// Diagnostic for a failed command.
    Error { message: String },
}
