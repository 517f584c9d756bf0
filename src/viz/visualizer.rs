//! Cancellable per-frame sampling loop
//!
//! Pulls a frame of magnitudes from the live analysis binding, smooths it
//! and renders it to the surface, at display rate. The engine owns the
//! cancellation token and sets it whenever playback leaves the Playing
//! state, so the loop never keeps sampling a paused or replaced source.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::curve;
use super::path::PathRenderer;
use crate::platform::{AnalysisNode, RenderSurface};

/// Nominal display frame interval (60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Shared handle to the live analysis binding. The engine clears it before
/// tearing a binding down and republishes after the rebuild, so the loop
/// never samples a binding mid-replacement.
pub type SharedBinding<A> = Arc<Mutex<Option<Arc<A>>>>;

pub struct Visualizer<A, S> {
    binding: SharedBinding<A>,
    surface: Arc<Mutex<S>>,
    renderer: PathRenderer,
}

impl<A, S> Visualizer<A, S>
where
    A: AnalysisNode + Send + Sync + 'static,
    S: RenderSurface + Send + 'static,
{
    pub fn new(binding: SharedBinding<A>, surface: Arc<Mutex<S>>, renderer: PathRenderer) -> Self {
        Self {
            binding,
            surface,
            renderer,
        }
    }

    /// Sample, smooth and render one frame. Quietly skips the frame when no
    /// binding is live.
    pub fn frame(&self) {
        // Read the binding reference once per frame.
        let analyser = match self.binding.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        let Some(analyser) = analyser else {
            return;
        };

        let magnitudes = analyser.magnitudes();
        let smoothed = curve::smooth(&magnitudes, self.renderer.width(), self.renderer.height());

        if let Ok(mut surface) = self.surface.lock() {
            self.renderer.render(&smoothed, &mut *surface);
        }
    }

    /// Run until `cancel` is set.
    pub async fn run(self, cancel: Arc<AtomicBool>) {
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !cancel.load(Ordering::Acquire) {
            ticker.tick().await;
            self.frame();
        }
        log::debug!("visualizer loop stopped");
    }

    pub fn spawn(self, cancel: Arc<AtomicBool>) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::path::{PathData, Rgba, Theme};

    struct FixedAnalyser(Vec<u8>);

    impl AnalysisNode for FixedAnalyser {
        fn frequency_bin_count(&self) -> usize {
            self.0.len()
        }

        fn magnitudes(&self) -> Vec<u8> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct CountingSurface {
        paths: usize,
        fills: usize,
        last_path: Option<PathData>,
    }

    impl RenderSurface for CountingSurface {
        fn transition_path(&mut self, path: PathData, _duration: Duration) {
            self.paths += 1;
            self.last_path = Some(path);
        }

        fn transition_fill(&mut self, _fill: Rgba, _duration: Duration) {
            self.fills += 1;
        }
    }

    fn harness(
        binding: Option<Arc<FixedAnalyser>>,
    ) -> (Visualizer<FixedAnalyser, CountingSurface>, Arc<Mutex<CountingSurface>>) {
        let binding = Arc::new(Mutex::new(binding));
        let surface = Arc::new(Mutex::new(CountingSurface::default()));
        let renderer = PathRenderer::new(600.0, 60.0, Theme::Default);
        (
            Visualizer::new(binding, Arc::clone(&surface), renderer),
            surface,
        )
    }

    #[test]
    fn test_frame_renders_path_and_fill() {
        let analyser = Arc::new(FixedAnalyser(vec![128; 32]));
        let (viz, surface) = harness(Some(analyser));

        viz.frame();

        let surface = surface.lock().unwrap();
        assert_eq!(surface.paths, 1);
        assert_eq!(surface.fills, 1);
        let path = surface.last_path.as_ref().unwrap();
        // 2 samples per segment plus the two bottom corners.
        assert_eq!(path.points.len(), 2 * 31 + 2);
    }

    #[test]
    fn test_frame_without_binding_is_skipped() {
        let (viz, surface) = harness(None);
        viz.frame();
        assert_eq!(surface.lock().unwrap().paths, 0);
    }

    #[tokio::test]
    async fn test_loop_halts_once_cancelled() {
        let analyser = Arc::new(FixedAnalyser(vec![64; 16]));
        let (viz, surface) = harness(Some(analyser));

        let cancel = Arc::new(AtomicBool::new(false));
        let handle = viz.spawn(Arc::clone(&cancel));

        tokio::time::sleep(Duration::from_millis(80)).await;
        cancel.store(true, Ordering::Release);
        handle.await.unwrap();

        let rendered = surface.lock().unwrap().paths;
        assert!(rendered > 0);

        // No further frames arrive after the token is set.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(surface.lock().unwrap().paths, rendered);
    }
}
