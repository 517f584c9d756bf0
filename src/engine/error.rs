use thiserror::Error;

/// Error taxonomy for engine commands.
///
/// Every failure is terminal for the single command that raised it: the
/// engine logs it, emits a diagnostic event and settles back into a
/// well-defined prior state. Nothing here propagates as an unhandled fault
/// to the hosting layer, and nothing is retried.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// No playable source could be opened. Fatal to the load attempt; the
    /// engine reverts to Idle.
    #[error("no playable source could be opened")]
    UnsupportedSource,

    /// A recording session stopped with zero captured chunks. The state
    /// machine drops back to Idle; the previous source stays loaded.
    #[error("recording produced no audio")]
    EmptyRecording,

    /// Seek with a non-finite fraction or an unknown duration. Logged and
    /// ignored; no state change.
    #[error("seek target is not representable")]
    InvalidSeek,

    /// Microphone permission denied or no capture backend present. The
    /// record command is rejected before any state change.
    #[error("microphone capture is unavailable: {0}")]
    CaptureUnavailable(String),

    /// A playback toggle arrived while a prior toggle was still mid
    /// transition; the newcomer is dropped.
    #[error("another transition is in flight")]
    Busy,

    /// Anything else the host's media stack reports.
    #[error("platform failure: {0}")]
    Platform(String),
}
