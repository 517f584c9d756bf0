//! Microphone capture backed by CPAL
//!
//! Implements the `CaptureDevice`/`CaptureSession` contracts over the
//! default input device: f32 callback samples are converted to 16-bit PCM
//! chunks as they arrive, dropping the stream releases the hardware, and a
//! finished buffer can be finalized into a WAV blob with `wav_blob`.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, StreamConfig};
use hound::{WavSpec, WavWriter};

use crate::engine::error::PlayerError;
use crate::platform::{CaptureDevice, CaptureSession, RecordingBuffer};

/// Capture sample rate. High enough for music, not just speech.
const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Microphone capture device with a resolved stream configuration.
pub struct MicCapture {
    device: Device,
    config: StreamConfig,
    sample_rate: u32,
}

/// Information about an available audio input device.
#[derive(Debug)]
pub struct InputDeviceInfo {
    pub name: String,
    pub is_default: bool,
    pub supported_sample_rates: Vec<u32>,
    pub supported_formats: Vec<SampleFormat>,
}

impl MicCapture {
    pub fn new() -> Result<Self, PlayerError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| PlayerError::CaptureUnavailable("no default input device".into()))?;

        let (config, sample_rate) = Self::best_config(&device, TARGET_SAMPLE_RATE)?;
        Ok(Self {
            device,
            config,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Find the input configuration closest to the target sample rate.
    fn best_config(
        device: &Device,
        target_sample_rate: u32,
    ) -> Result<(StreamConfig, u32), PlayerError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| PlayerError::CaptureUnavailable(e.to_string()))?;

        pick_config(supported_configs, target_sample_rate)
            .ok_or_else(|| PlayerError::CaptureUnavailable("no input configuration".into()))
    }

    /// List all available audio input devices.
    pub fn list_devices() -> Result<Vec<InputDeviceInfo>, PlayerError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| PlayerError::CaptureUnavailable(e.to_string()))?;
        let default_device = host.default_input_device();

        let mut device_infos = Vec::new();

        for device in devices {
            let name = device.name().unwrap_or_else(|_| "Unknown Device".to_string());
            let is_default = default_device
                .as_ref()
                .map(|d| d.name().unwrap_or_default() == name)
                .unwrap_or(false);

            let configs: Vec<_> = device
                .supported_input_configs()
                .map_err(|e| PlayerError::CaptureUnavailable(e.to_string()))?
                .collect();

            device_infos.push(InputDeviceInfo {
                name,
                is_default,
                supported_sample_rates: configs.iter().map(|c| c.max_sample_rate().0).collect(),
                supported_formats: configs.iter().map(|c| c.sample_format()).collect(),
            });
        }

        Ok(device_infos)
    }

    /// Open the input stream and start buffering chunks.
    pub fn open_session(&self) -> Result<MicSession, PlayerError> {
        let chunks: Arc<Mutex<Vec<Vec<u8>>>> = Arc::new(Mutex::new(Vec::new()));
        let chunks_cb = Arc::clone(&chunks);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut chunk = Vec::with_capacity(data.len() * 2);
                    for &sample in data {
                        let sample = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                        chunk.extend_from_slice(&sample.to_le_bytes());
                    }
                    if let Ok(mut chunks) = chunks_cb.lock() {
                        chunks.push(chunk);
                    }
                },
                |err| {
                    log::error!("capture stream error: {err}");
                },
                None,
            )
            .map_err(|e| PlayerError::CaptureUnavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlayerError::CaptureUnavailable(e.to_string()))?;

        Ok(MicSession {
            stream,
            chunks,
            sample_rate: self.sample_rate,
        })
    }
}

/// Pick the range whose maximum sample rate is closest to the target and
/// the actual rate to request from it. The target is clamped into the
/// range; cpal asserts range membership in `with_sample_rate`.
fn pick_config(
    configs: impl IntoIterator<Item = cpal::SupportedStreamConfigRange>,
    target_sample_rate: u32,
) -> Option<(StreamConfig, u32)> {
    let best = configs
        .into_iter()
        .min_by_key(|c| c.max_sample_rate().0.abs_diff(target_sample_rate))?;

    let rate = target_sample_rate.clamp(best.min_sample_rate().0, best.max_sample_rate().0);
    let config = best.with_sample_rate(cpal::SampleRate(rate));
    Some((config.into(), rate))
}

impl CaptureDevice for MicCapture {
    type Session = MicSession;

    async fn acquire(&mut self) -> Result<MicSession, PlayerError> {
        self.open_session()
    }
}

/// An open microphone session. Dropping (or finishing) it stops the input
/// stream and releases the hardware.
pub struct MicSession {
    stream: cpal::Stream,
    chunks: Arc<Mutex<Vec<Vec<u8>>>>,
    sample_rate: u32,
}

impl MicSession {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stop the stream and hand back everything buffered so far. The
    /// hardware is released before the buffer is assembled.
    pub fn finish(self) -> RecordingBuffer {
        drop(self.stream);
        let chunks = self
            .chunks
            .lock()
            .map(|mut chunks| std::mem::take(&mut *chunks))
            .unwrap_or_default();
        RecordingBuffer::from_chunks(chunks)
    }
}

impl CaptureSession for MicSession {
    fn chunk_count(&self) -> usize {
        self.chunks.lock().map(|c| c.len()).unwrap_or(0)
    }

    async fn stop(self) -> Result<RecordingBuffer, PlayerError> {
        Ok(self.finish())
    }
}

/// Encode a finished recording as a mono 16-bit WAV blob.
pub fn wav_blob(buffer: &RecordingBuffer, sample_rate: u32) -> Result<Vec<u8>, PlayerError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec).map_err(wav_err)?;
    for chunk in buffer.chunks() {
        for bytes in chunk.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([bytes[0], bytes[1]]))
                .map_err(wav_err)?;
        }
    }
    writer.finalize().map_err(wav_err)?;

    Ok(cursor.into_inner())
}

fn wav_err(err: hound::Error) -> PlayerError {
    PlayerError::Platform(err.to_string())
}
