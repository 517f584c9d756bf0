//! Software render surface with per-property morphs
//!
//! `MorphSurface` is the crate's own `RenderSurface`: it holds the current
//! outline and fill and at most one in-flight tween per property. Hosts
//! with a native animation stack (SVG, canvas) implement `RenderSurface`
//! themselves and can ignore this module.

use std::time::{Duration, Instant};

use super::animation::Tween;
use super::curve::Point;
use super::path::{PathData, Rgba};
use crate::platform::RenderSurface;

#[derive(Debug)]
struct PathMorph {
    from: PathData,
    to: PathData,
    tween: Tween,
}

#[derive(Debug)]
struct FillMorph {
    from: Rgba,
    to: Rgba,
    tween: Tween,
}

/// A settled view of the surface at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    pub path: PathData,
    pub fill: Rgba,
}

impl SurfaceFrame {
    /// A complete standalone SVG document for this frame.
    pub fn to_svg_document(&self, width: f32, height: f32) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\"><path d=\"{d}\" fill=\"{fill}\"/></svg>\n",
            w = width,
            h = height,
            d = self.path.to_svg(),
            fill = self.fill.to_css(),
        )
    }
}

/// Render surface that eases between submitted frames.
///
/// Shape and fill animate independently; re-targeting a property mid-morph
/// restarts its tween from the currently interpolated value, so there is
/// never a visual jump. Outlines with a different point count snap instead
/// of interpolating.
#[derive(Debug, Default)]
pub struct MorphSurface {
    path: PathData,
    fill: Rgba,
    path_morph: Option<PathMorph>,
    fill_morph: Option<FillMorph>,
}

impl MorphSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.path_morph.is_some() || self.fill_morph.is_some()
    }

    fn current_path(&self, now: Instant) -> PathData {
        match &self.path_morph {
            Some(morph) => {
                let (p, _) = morph.tween.tick(now);
                lerp_path(&morph.from, &morph.to, p)
            }
            None => self.path.clone(),
        }
    }

    fn current_fill(&self, now: Instant) -> Rgba {
        match &self.fill_morph {
            Some(morph) => {
                let (p, _) = morph.tween.tick(now);
                morph.from.lerp(morph.to, p)
            }
            None => self.fill,
        }
    }

    /// Advance the morphs and return the frame to draw at `now`.
    pub fn tick(&mut self, now: Instant) -> SurfaceFrame {
        let path_done = self
            .path_morph
            .as_ref()
            .is_some_and(|morph| morph.tween.tick(now).1);
        if path_done {
            self.path_morph = None;
        }

        let fill_done = self
            .fill_morph
            .as_ref()
            .is_some_and(|morph| morph.tween.tick(now).1);
        if fill_done {
            self.fill_morph = None;
        }

        SurfaceFrame {
            path: self.current_path(now),
            fill: self.current_fill(now),
        }
    }
}

impl RenderSurface for MorphSurface {
    fn transition_path(&mut self, path: PathData, duration: Duration) {
        let now = Instant::now();
        let from = self.current_path(now);

        if from.points.len() != path.points.len() || from.closed != path.closed {
            self.path = path;
            self.path_morph = None;
            return;
        }

        self.path = path.clone();
        self.path_morph = Some(PathMorph {
            from,
            to: path,
            tween: Tween::starting_at(now, duration),
        });
    }

    fn transition_fill(&mut self, fill: Rgba, duration: Duration) {
        let now = Instant::now();
        let from = self.current_fill(now);

        self.fill = fill;
        self.fill_morph = Some(FillMorph {
            from,
            to: fill,
            tween: Tween::starting_at(now, duration),
        });
    }
}

fn lerp_path(from: &PathData, to: &PathData, t: f32) -> PathData {
    let points = from
        .points
        .iter()
        .zip(to.points.iter())
        .map(|(a, b)| Point {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        })
        .collect();
    PathData {
        points,
        closed: to.closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_path(y: f32) -> PathData {
        PathData {
            points: vec![Point { x: 0.0, y }, Point { x: 10.0, y }],
            closed: true,
        }
    }

    #[test]
    fn test_mismatched_point_counts_snap() {
        let mut surface = MorphSurface::new();
        surface.transition_path(flat_path(5.0), Duration::from_millis(100));
        assert!(surface.path_morph.is_none());

        let frame = surface.tick(Instant::now());
        assert_eq!(frame.path, flat_path(5.0));
    }

    #[test]
    fn test_morph_settles_on_target() {
        let mut surface = MorphSurface::new();
        surface.transition_path(flat_path(0.0), Duration::from_millis(100));
        surface.transition_path(flat_path(40.0), Duration::from_millis(100));
        assert!(surface.is_animating());

        let frame = surface.tick(Instant::now() + Duration::from_millis(200));
        assert_eq!(frame.path, flat_path(40.0));
        assert!(!surface.is_animating());
    }

    #[test]
    fn test_retarget_supersedes_without_completing() {
        let mut surface = MorphSurface::new();
        surface.transition_path(flat_path(0.0), Duration::from_millis(100));
        surface.transition_path(flat_path(100.0), Duration::from_secs(10));

        // Retarget while the first morph is barely under way; the new morph
        // must start from the current interpolated value, not from either
        // endpoint.
        surface.transition_path(flat_path(50.0), Duration::from_millis(100));
        let morph = surface.path_morph.as_ref().unwrap();
        assert!(morph.from.points[0].y < 50.0);
        assert_eq!(morph.to, flat_path(50.0));

        let frame = surface.tick(Instant::now() + Duration::from_millis(200));
        assert_eq!(frame.path, flat_path(50.0));
    }

    #[test]
    fn test_fill_and_path_animate_independently() {
        let mut surface = MorphSurface::new();
        surface.transition_fill(Rgba::new(255.0, 255.0, 255.0, 1.0), Duration::from_millis(100));
        assert!(surface.fill_morph.is_some());
        assert!(surface.path_morph.is_none());

        let frame = surface.tick(Instant::now() + Duration::from_millis(200));
        assert_eq!(frame.fill, Rgba::new(255.0, 255.0, 255.0, 1.0));
    }

    #[test]
    fn test_svg_document_wraps_path_and_fill() {
        let frame = SurfaceFrame {
            path: flat_path(5.0),
            fill: Rgba::new(0.0, 0.0, 0.0, 0.07),
        };
        let doc = frame.to_svg_document(600.0, 60.0);
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("M 0,5 L 10,5 Z"));
        assert!(doc.contains("rgba(0,0,0,0.07)"));
    }
}
