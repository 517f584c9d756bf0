//! Ease-out tweening for path and fill transitions

use std::time::{Duration, Instant};

/// Duration of the path-morph and fill-morph transitions issued each frame.
pub const MORPH_DURATION: Duration = Duration::from_millis(100);

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Time-bounded ease-out progress tracker.
///
/// Both the shape morph and the fill morph run off one of these; they are
/// independent of each other and a new tween simply replaces the old one
/// for its property, whether or not the old one finished.
#[derive(Debug, Clone)]
pub struct Tween {
    started_at: Instant,
    duration: Duration,
}

impl Tween {
    pub fn new(duration: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            duration,
        }
    }

    pub fn starting_at(started_at: Instant, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
        }
    }

    /// Eased progress at `now` and whether the tween has completed.
    pub fn tick(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        (ease_out_quad(t), t >= 1.0)
    }
}
