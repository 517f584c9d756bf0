//! FFT-based analysis node yielding byte magnitudes
//!
//! A reference implementation of the analysis-node contract: push PCM
//! samples in, and a Hann-windowed FFT refreshes a fixed-size frame of
//! byte magnitudes (0-255) once per window. The processing half needs
//! `&mut`; `tap()` hands out a cheap shared read view for the visualizer.

use std::sync::{Arc, Mutex};

use rustfft::{FftPlanner, num_complex::Complex};

use crate::platform::AnalysisNode;

/// Default FFT window size; the magnitude frame holds half as many bins.
pub const DEFAULT_FFT_SIZE: usize = 512;

const SMOOTHING_FACTOR: f32 = 0.7;

pub struct SpectrumAnalyzer {
    fft_size: usize,
    sample_buffer: Vec<f32>,
    fft_planner: FftPlanner<f32>,
    window: Vec<f32>,
    prev: Vec<f32>,
    frame: Arc<Mutex<Vec<u8>>>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::with_fft_size(DEFAULT_FFT_SIZE)
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fft_size(fft_size: usize) -> Self {
        // Hann window to reduce spectral leakage
        let mut window = vec![0.0; fft_size];
        for (i, w) in window.iter_mut().enumerate() {
            *w = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos());
        }

        Self {
            fft_size,
            sample_buffer: Vec::with_capacity(fft_size),
            fft_planner: FftPlanner::new(),
            window,
            prev: vec![0.0; fft_size / 2],
            frame: Arc::new(Mutex::new(vec![0; fft_size / 2])),
        }
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Shared read view over the current magnitude frame.
    pub fn tap(&self) -> SpectrumTap {
        SpectrumTap {
            frame: Arc::clone(&self.frame),
            bins: self.fft_size / 2,
        }
    }

    /// Push one sample; returns true when a fresh frame was produced.
    pub fn push_sample(&mut self, sample: f32) -> bool {
        self.sample_buffer.push(sample);

        if self.sample_buffer.len() >= self.fft_size {
            self.compute_frame();
            self.sample_buffer.clear();
            true
        } else {
            false
        }
    }

    fn compute_frame(&mut self) {
        let mut windowed: Vec<Complex<f32>> = self
            .sample_buffer
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        let fft = self.fft_planner.plan_fft_forward(self.fft_size);
        fft.process(&mut windowed);

        // A full-scale sine lands at ~N/4 after the Hann window's coherent
        // gain, so this scale maps it to 1.0.
        let norm_scale = 4.0 / self.fft_size as f32;

        for (i, bin) in windowed[..self.fft_size / 2].iter().enumerate() {
            let magnitude = (bin.norm() * norm_scale).min(1.0);
            // Square-root compression for visual dynamic range, then
            // temporal smoothing against the previous frame.
            let compressed = magnitude.sqrt();
            self.prev[i] = SMOOTHING_FACTOR * self.prev[i] + (1.0 - SMOOTHING_FACTOR) * compressed;
        }

        if let Ok(mut frame) = self.frame.lock() {
            for (byte, &value) in frame.iter_mut().zip(self.prev.iter()) {
                *byte = (value.clamp(0.0, 1.0) * 255.0) as u8;
            }
        }
    }
}

/// Read half of a `SpectrumAnalyzer`: the fixed-size byte-magnitude frame,
/// overwritten on every completed FFT window.
#[derive(Debug, Clone)]
pub struct SpectrumTap {
    frame: Arc<Mutex<Vec<u8>>>,
    bins: usize,
}

impl AnalysisNode for SpectrumTap {
    fn frequency_bin_count(&self) -> usize {
        self.bins
    }

    fn magnitudes(&self) -> Vec<u8> {
        self.frame
            .lock()
            .map(|frame| frame.clone())
            .unwrap_or_else(|_| vec![0; self.bins])
    }
}
