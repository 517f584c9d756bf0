//! Embeddable audio player/recorder core
//!
//! The heart of the crate is the real-time spectrum-to-path pipeline: a
//! frame of byte-valued frequency magnitudes is smoothed with Catmull-Rom
//! interpolation, closed into a filled silhouette and eased onto a render
//! surface at display rate, driven by a playback/recording state machine.
//! The hosting layer supplies the media stack through the `platform`
//! traits; `audio` ships reference capture/analysis backends.

pub mod audio;
pub mod clock;
pub mod engine;
pub mod events;
pub mod platform;
pub mod viz;

pub use engine::{PlayerEngine, PlayerError, PlayerState};
pub use events::PlayerEvent;
