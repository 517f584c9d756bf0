use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wavebox::audio::{MicCapture, SpectrumAnalyzer, wav_blob};
use wavebox::platform::AnalysisNode;
use wavebox::viz::{MORPH_DURATION, MorphSurface, PathRenderer, Theme, smooth};

#[derive(Parser)]
#[command(name = "wavebox")]
#[command(about = "Audio player/recorder core: record, inspect devices, render spectra")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available audio input devices
    Devices,

    /// Record the microphone to a WAV file
    Record {
        /// Output WAV path
        #[arg(long, default_value = "recording.wav")]
        output: PathBuf,

        /// Recording duration in seconds
        #[arg(long, default_value = "5")]
        duration: u64,
    },

    /// Render the loudest spectrum frame of a WAV file as an SVG silhouette
    Render {
        /// Input WAV path
        input: PathBuf,

        /// Output SVG path
        #[arg(long, default_value = "spectrum.svg")]
        output: PathBuf,

        /// Color theme: light, default or dark
        #[arg(long, default_value = "default")]
        theme: String,

        /// Render width in pixels
        #[arg(long, default_value = "600")]
        width: f32,

        /// Render height in pixels
        #[arg(long, default_value = "60")]
        height: f32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Devices => list_devices(),
        Commands::Record { output, duration } => record(&output, duration),
        Commands::Render {
            input,
            output,
            theme,
            width,
            height,
        } => render(&input, &output, &theme, width, height),
    }
}

fn list_devices() -> Result<()> {
    let devices = MicCapture::list_devices()?;
    if devices.is_empty() {
        println!("No audio input devices found");
        return Ok(());
    }

    for device in devices {
        let marker = if device.is_default { " (default)" } else { "" };
        println!("{}{}", device.name, marker);
        println!("  sample rates: {:?}", device.supported_sample_rates);
        println!("  formats: {:?}", device.supported_formats);
    }
    Ok(())
}

fn record(output: &Path, duration: u64) -> Result<()> {
    let capture = MicCapture::new()?;
    let session = capture.open_session()?;

    log::info!("Recording for {duration}s...");
    std::thread::sleep(Duration::from_secs(duration));

    let buffer = session.finish();
    if buffer.is_empty() {
        anyhow::bail!("recording produced no audio");
    }

    let chunks = buffer.chunk_count();
    let blob = wav_blob(&buffer, capture.sample_rate())?;
    std::fs::write(output, &blob)
        .with_context(|| format!("failed to write {}", output.display()))?;

    log::info!("Wrote {} ({} chunks)", output.display(), chunks);
    Ok(())
}

fn render(input: &Path, output: &Path, theme: &str, width: f32, height: f32) -> Result<()> {
    let mut reader = hound::WavReader::open(input)
        .with_context(|| format!("failed to open {}", input.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let mut analyzer = SpectrumAnalyzer::new();
    let tap = analyzer.tap();

    // Keep the loudest frame across the whole file.
    let mut best = tap.magnitudes();
    let mut best_energy = 0u32;

    // Mono analysis: first channel only.
    match spec.sample_format {
        hound::SampleFormat::Float => {
            for (i, sample) in reader.samples::<f32>().enumerate() {
                let sample = sample?;
                if i % channels == 0 && analyzer.push_sample(sample) {
                    keep_loudest(&tap, &mut best, &mut best_energy);
                }
            }
        }
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            for (i, sample) in reader.samples::<i32>().enumerate() {
                let sample = sample? as f32 / full_scale;
                if i % channels == 0 && analyzer.push_sample(sample) {
                    keep_loudest(&tap, &mut best, &mut best_energy);
                }
            }
        }
    }

    let renderer = PathRenderer::new(width, height, Theme::parse(theme));
    let mut surface = MorphSurface::new();
    renderer.render(&smooth(&best, width, height), &mut surface);
    let frame = surface.tick(Instant::now() + MORPH_DURATION);

    std::fs::write(output, frame.to_svg_document(width, height))
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote {}", output.display());
    Ok(())
}

fn keep_loudest(tap: &wavebox::audio::SpectrumTap, best: &mut Vec<u8>, best_energy: &mut u32) {
    let frame = tap.magnitudes();
    let energy: u32 = frame.iter().map(|&m| m as u32).sum();
    if energy > *best_energy {
        *best_energy = energy;
        *best = frame;
    }
}
