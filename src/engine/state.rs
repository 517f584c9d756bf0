use serde::{Deserialize, Serialize};

/// Playback states. Recording is an orthogonal sub-state tracked by the
/// engine's capture session slot, entered from Idle or Paused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Loading => "loading",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
        }
    }
}
