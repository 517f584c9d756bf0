//! Playback/recording state machine
//!
//! Owns the current source handle and the single live audio graph binding,
//! drives the visualizer loop's cancellation token, and emits
//! [`PlayerEvent`]s for the hosting layer. All commands run on one async
//! task; the only suspension points are the awaited platform operations
//! (opening a source, resuming the context, acquiring and stopping the
//! microphone).

pub mod error;
pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::clock;
use crate::events::PlayerEvent;
use crate::platform::{
    AudioGraph, CaptureDevice, CaptureSession, MediaSource, RenderSurface, SourceRef,
};
use crate::viz::path::{PathRenderer, Theme};
use crate::viz::visualizer::{SharedBinding, Visualizer};

pub use error::PlayerError;
pub use state::PlayerState;

pub struct PlayerEngine<G, C, S>
where
    G: AudioGraph,
    C: CaptureDevice,
{
    graph: G,
    capture: C,
    state: PlayerState,
    source: Option<G::Source>,
    binding: SharedBinding<G::Analyser>,
    session: Option<C::Session>,
    surface: Arc<Mutex<S>>,
    renderer: PathRenderer,
    viz_cancel: Option<Arc<AtomicBool>>,
    context_resumed: bool,
    toggle_in_flight: bool,
    duration: f64,
    events: UnboundedSender<PlayerEvent>,
}

impl<G, C, S> PlayerEngine<G, C, S>
where
    G: AudioGraph,
    G::Analyser: Send + Sync + 'static,
    C: CaptureDevice,
    S: RenderSurface + Send + 'static,
{
    /// Build an engine over the host's graph, capture device and surface.
    /// Returns the engine and the event stream the host should drain.
    pub fn new(
        graph: G,
        capture: C,
        surface: Arc<Mutex<S>>,
        theme: Theme,
        width: f32,
        height: f32,
    ) -> (Self, UnboundedReceiver<PlayerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            graph,
            capture,
            state: PlayerState::Idle,
            source: None,
            binding: Arc::new(Mutex::new(None)),
            session: None,
            surface,
            renderer: PathRenderer::new(width, height, theme),
            viz_cancel: None,
            context_resumed: false,
            toggle_in_flight: false,
            duration: f64::NAN,
            events,
        };
        (engine, rx)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Chunks buffered so far by the active recording session, or `None`
    /// when not recording. Hosts poll this for a capture-progress readout.
    pub fn recording_chunk_count(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.chunk_count())
    }

    /// Replace the current source.
    ///
    /// The old binding is fully torn down before the new one is created;
    /// connecting while the old binding is still attached would duplicate
    /// the output path. On failure the engine reverts to Idle with no
    /// binding live.
    pub async fn load_source(&mut self, source: SourceRef) -> Result<(), PlayerError> {
        self.cancel_visualizer();
        if let Ok(mut binding) = self.binding.lock() {
            binding.take();
        }
        self.graph.disconnect();
        self.source = None;
        self.duration = f64::NAN;
        self.set_state(PlayerState::Loading);

        let source = match self.graph.open_source(source).await {
            Ok(source) => source,
            Err(err) => {
                self.set_state(PlayerState::Idle);
                self.emit_error(&err);
                return Err(err);
            }
        };

        let analyser = match self.graph.connect(&source) {
            Ok(analyser) => analyser,
            Err(err) => {
                self.graph.disconnect();
                self.set_state(PlayerState::Idle);
                self.emit_error(&err);
                return Err(err);
            }
        };

        self.duration = source.duration();
        self.source = Some(source);
        if let Ok(mut binding) = self.binding.lock() {
            *binding = Some(analyser);
        }

        let _ = self.events.send(PlayerEvent::DurationReady {
            seconds: self.duration,
            label: clock::format_time(self.duration),
        });
        self.set_state(PlayerState::Paused);
        self.start_visualizer();
        Ok(())
    }

    /// Binary play/pause toggle. Toggles arriving while a prior transition
    /// is still mid-flight are dropped rather than interleaved.
    pub async fn toggle_playback(&mut self) -> Result<(), PlayerError> {
        if self.toggle_in_flight {
            let err = PlayerError::Busy;
            log::warn!("playback toggle dropped: {err}");
            return Err(err);
        }

        let Some(paused) = self.source.as_ref().map(|s| s.paused()) else {
            log::warn!("playback toggle ignored: no source loaded");
            return Ok(());
        };

        self.toggle_in_flight = true;
        let result = if paused {
            self.begin_playback().await
        } else {
            self.pause_playback()
        };
        self.toggle_in_flight = false;
        result
    }

    async fn begin_playback(&mut self) -> Result<(), PlayerError> {
        // The processing context resumes lazily, once; output is inaudible
        // until it has.
        if !self.context_resumed {
            if let Err(err) = self.graph.resume().await {
                self.emit_error(&err);
                return Err(err);
            }
            self.context_resumed = true;
        }

        if let Some(source) = self.source.as_mut() {
            source.play();
        }
        self.set_state(PlayerState::Playing);
        self.start_visualizer();
        Ok(())
    }

    fn pause_playback(&mut self) -> Result<(), PlayerError> {
        if let Some(source) = self.source.as_mut() {
            source.pause();
        }
        self.set_state(PlayerState::Paused);
        self.cancel_visualizer();
        Ok(())
    }

    /// Start recording when idle/paused; stop and commit when recording.
    /// A successful recording becomes the new source; an empty one is
    /// discarded and drops the state back to Idle, leaving the current
    /// source untouched.
    pub async fn toggle_recording(&mut self) -> Result<(), PlayerError> {
        match self.session.take() {
            Some(session) => self.finish_recording(session).await,
            None => self.begin_recording().await,
        }
    }

    async fn begin_recording(&mut self) -> Result<(), PlayerError> {
        if matches!(self.state, PlayerState::Playing | PlayerState::Loading) {
            log::warn!("record toggle ignored in state {}", self.state.as_str());
            return Ok(());
        }

        // Rejected before any state change when the microphone is denied.
        let session = match self.capture.acquire().await {
            Ok(session) => session,
            Err(err) => {
                self.emit_error(&err);
                return Err(err);
            }
        };

        self.session = Some(session);
        let _ = self.events.send(PlayerEvent::RecordingStarted);
        Ok(())
    }

    async fn finish_recording(&mut self, session: C::Session) -> Result<(), PlayerError> {
        // stop() releases the capture hardware before finalizing; the
        // session slot is already cleared, so even a failure here leaves
        // the engine out of the recording sub-state.
        let buffer = match session.stop().await {
            Ok(buffer) => buffer,
            Err(err) => {
                self.emit_error(&err);
                return Err(err);
            }
        };

        if buffer.is_empty() {
            let err = PlayerError::EmptyRecording;
            log::warn!("{err}; keeping current source");
            let _ = self.events.send(PlayerEvent::RecordingDiscarded {
                reason: err.to_string(),
            });
            // The discard resets the state machine, but the previously
            // loaded source (and its binding) stays playable.
            self.set_state(PlayerState::Idle);
            return Err(err);
        }

        self.load_source(SourceRef::Blob(buffer.into_blob())).await
    }

    /// Seek to `fraction` of the duration. Non-finite input or an unknown
    /// duration is logged and ignored.
    pub fn seek_to(&mut self, fraction: f64) {
        if !fraction.is_finite() || !self.duration.is_finite() || self.duration <= 0.0 {
            let err = PlayerError::InvalidSeek;
            log::warn!("{err}: fraction={fraction}, duration={}", self.duration);
            return;
        }

        let position = self.duration * fraction;
        if let Some(source) = self.source.as_mut() {
            source.seek(position);
        }
    }

    /// Source time-progress notification. Recomputes the seek fraction and
    /// the time label; never transitions state.
    pub fn position_changed(&self, current: f64) {
        let _ = self.events.send(PlayerEvent::Position {
            fraction: clock::seek_fraction(current, self.duration),
            label: clock::format_time(current),
        });
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state == state {
            return;
        }
        self.state = state;
        let _ = self.events.send(PlayerEvent::StateChanged { state });
    }

    fn emit_error(&self, err: &PlayerError) {
        log::warn!("{err}");
        let _ = self.events.send(PlayerEvent::Error {
            message: err.to_string(),
        });
    }

    fn start_visualizer(&mut self) {
        if self.viz_cancel.is_some() {
            return;
        }
        let cancel = Arc::new(AtomicBool::new(false));
        let visualizer = Visualizer::new(
            Arc::clone(&self.binding),
            Arc::clone(&self.surface),
            self.renderer.clone(),
        );
        visualizer.spawn(Arc::clone(&cancel));
        self.viz_cancel = Some(cancel);
    }

    fn cancel_visualizer(&mut self) {
        if let Some(cancel) = self.viz_cancel.take() {
            cancel.store(true, Ordering::Release);
        }
    }
}

impl<G, C, S> Drop for PlayerEngine<G, C, S>
where
    G: AudioGraph,
    C: CaptureDevice,
{
    fn drop(&mut self) {
        if let Some(cancel) = self.viz_cancel.take() {
            cancel.store(true, Ordering::Release);
        }
    }
}
