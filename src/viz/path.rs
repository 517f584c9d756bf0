//! Closed-outline construction, themes and fill colors

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::animation::MORPH_DURATION;
use super::curve::Point;
use crate::platform::RenderSurface;

/// An RGBA fill color. Channels are kept as floats so in-flight fill
/// morphs can blend between themes without rounding at every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    /// Fully transparent; what a surface shows before its first fill.
    fn default() -> Self {
        Rgba::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS/SVG `rgba(..)` form.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r.round() as u8,
            self.g.round() as u8,
            self.b.round() as u8,
            self.a
        )
    }
}

/// Widget color theme. Unrecognized names fall back to `Default`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Default,
    Dark,
}

impl Theme {
    pub fn parse(name: &str) -> Theme {
        match name {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Default,
        }
    }
}

/// Fill color for a theme: near-opaque white for light surfaces, a faint
/// translucent black for dark ones, and an accent blue otherwise.
pub fn resolve_fill(theme: Theme) -> Rgba {
    match theme {
        Theme::Light => Rgba::new(255.0, 255.0, 255.0, 1.0),
        Theme::Dark => Rgba::new(0.0, 0.0, 0.0, 0.07),
        Theme::Default => Rgba::new(0x29 as f32, 0x62 as f32, 0xff as f32, 1.0),
    }
}

/// An ordered point list with an explicit close. The host's surface decides
/// how to draw it; `to_svg` gives the text form for SVG hosts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl PathData {
    /// SVG path string: move to the first point, line through the rest,
    /// then `Z` when closed.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            if i == 0 {
                d.push_str(&format!("M {},{}", p.x, p.y));
            } else {
                d.push_str(&format!(" L {},{}", p.x, p.y));
            }
        }
        if self.closed && !self.points.is_empty() {
            d.push_str(" Z");
        }
        d
    }
}

/// Close an open curve along the bottom edge of the render area, turning
/// the spectrum line into a filled "mountain" silhouette. An empty curve
/// yields an empty path.
pub fn closed_outline(curve: &[Point], width: f32, height: f32) -> PathData {
    if curve.is_empty() {
        return PathData::default();
    }

    let mut points = Vec::with_capacity(curve.len() + 2);
    points.extend_from_slice(curve);
    points.push(Point {
        x: width,
        y: height,
    });
    points.push(Point { x: 0.0, y: height });

    PathData {
        points,
        closed: true,
    }
}

/// Turns smoothed curves into surface transitions.
///
/// Each `render` call issues two independent 100 ms ease-out transitions
/// against the surface: one morphing the outline, one morphing the fill.
/// Neither blocks the other and each supersedes any in-flight transition
/// for its own property.
#[derive(Debug, Clone)]
pub struct PathRenderer {
    width: f32,
    height: f32,
    fill: Rgba,
}

impl PathRenderer {
    pub fn new(width: f32, height: f32, theme: Theme) -> Self {
        Self {
            width,
            height,
            fill: resolve_fill(theme),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn fill(&self) -> Rgba {
        self.fill
    }

    pub fn render<S: RenderSurface>(&self, curve: &[Point], surface: &mut S) {
        self.render_with(curve, surface, MORPH_DURATION);
    }

    pub fn render_with<S: RenderSurface>(
        &self,
        curve: &[Point],
        surface: &mut S,
        duration: Duration,
    ) {
        let path = closed_outline(curve, self.width, self.height);
        surface.transition_path(path, duration);
        surface.transition_fill(self.fill, duration);
    }
}
