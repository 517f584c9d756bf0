//! Collaborator contracts supplied by the hosting layer
//!
//! The engine never talks to a concrete media stack. The host implements
//! these traits over whatever it has (a browser audio graph, cpal, a test
//! double) and the engine wires them together. `audio` ships reference
//! implementations for microphone capture and spectrum analysis.

use std::sync::Arc;
use std::time::Duration;

use crate::engine::error::PlayerError;
use crate::viz::path::{PathData, Rgba};

/// What to load: an external locator the host's media stack understands,
/// or an in-memory blob produced by a finished recording.
#[derive(Debug, Clone)]
pub enum SourceRef {
    Locator(String),
    Blob(Arc<[u8]>),
}

/// A playable source handle with play/pause/seek/position semantics.
///
/// Position-progress notifications flow the other way: the host calls
/// `PlayerEngine::position_changed` as its source emits them.
pub trait MediaSource {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);
    fn paused(&self) -> bool;
    /// Duration in seconds; may be non-finite while still unknown.
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
}

/// The analysis node of a live audio graph binding: a fixed-size frame of
/// byte-valued frequency magnitudes, refreshed continuously.
pub trait AnalysisNode {
    fn frequency_bin_count(&self) -> usize;
    /// Current magnitudes, one byte per bin. Overwritten every frame;
    /// callers must not assume two reads agree.
    fn magnitudes(&self) -> Vec<u8>;
}

/// The host's audio-graph execution environment.
///
/// At most one binding (source -> gain -> analyser -> output) is live at a
/// time; `disconnect` must fully tear the old one down before the next
/// `connect`, or the output path would be duplicated.
pub trait AudioGraph {
    type Source: MediaSource;
    type Analyser: AnalysisNode;

    /// Open a playable source and wait for first-data readiness.
    async fn open_source(&mut self, source: SourceRef) -> Result<Self::Source, PlayerError>;

    /// Build the gain -> analyser -> output binding for an open source.
    fn connect(&mut self, source: &Self::Source) -> Result<Arc<Self::Analyser>, PlayerError>;

    /// Tear down the live binding, if any.
    fn disconnect(&mut self);

    /// Resume the processing context so output becomes audible. Called
    /// lazily, once, on the first transition to playback.
    async fn resume(&mut self) -> Result<(), PlayerError>;
}

/// Chunks accumulated during an active recording session, finalized into a
/// single immutable blob when the session stops.
#[derive(Debug, Default)]
pub struct RecordingBuffer {
    chunks: Vec<Vec<u8>>,
}

impl RecordingBuffer {
    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self { chunks }
    }

    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Concatenate the chunks into the immutable blob that becomes the
    /// next source.
    pub fn into_blob(self) -> Arc<[u8]> {
        let total = self.chunks.iter().map(Vec::len).sum();
        let mut blob = Vec::with_capacity(total);
        for chunk in &self.chunks {
            blob.extend_from_slice(chunk);
        }
        Arc::from(blob)
    }
}

/// An open microphone capture session.
pub trait CaptureSession {
    fn chunk_count(&self) -> usize;

    /// Stop capturing and hand back everything buffered so far. Hardware
    /// must be released before finalization, even when finalization fails.
    async fn stop(self) -> Result<RecordingBuffer, PlayerError>;
}

/// Microphone access. `acquire` fails with `CaptureUnavailable` when
/// permission is denied or no capture backend exists, before any engine
/// state changes.
pub trait CaptureDevice {
    type Session: CaptureSession;

    async fn acquire(&mut self) -> Result<Self::Session, PlayerError>;
}

/// Where frames land: a drawable surface accepting a path description and
/// a fill color, each with an independent ease-out transition of the given
/// duration. A transition issued while a prior one is in flight supersedes
/// it for that property.
pub trait RenderSurface {
    fn transition_path(&mut self, path: PathData, duration: Duration);
    fn transition_fill(&mut self, fill: Rgba, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_buffer_concatenates_in_order() {
        let mut buffer = RecordingBuffer::default();
        buffer.push_chunk(vec![1, 2]);
        buffer.push_chunk(vec![3]);
        buffer.push_chunk(vec![4, 5, 6]);
        assert_eq!(buffer.chunk_count(), 3);
        let blob = buffer.into_blob();
        assert_eq!(&blob[..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_buffer_is_empty() {
        let buffer = RecordingBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.into_blob().len(), 0);
    }
}
