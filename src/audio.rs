//! Reference platform backends
//!
//! Concrete implementations of the capture and analysis contracts so the
//! crate is usable stand-alone:
//! - `recorder`: cpal-backed microphone capture with WAV finalization
//! - `spectrum`: rustfft-backed analysis node yielding byte magnitudes

pub mod recorder;
pub mod spectrum;

pub use recorder::{InputDeviceInfo, MicCapture, MicSession, wav_blob};
pub use spectrum::{SpectrumAnalyzer, SpectrumTap};
