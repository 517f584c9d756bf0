//! Spectrum visualization pipeline
//!
//! Turns the per-frame byte magnitudes pulled from an analysis node into a
//! smooth closed outline and schedules eased transitions on the bound
//! render surface. Organized as:
//! - `curve`: Catmull-Rom smoothing of raw magnitude bins
//! - `path`: closed-outline construction, themes and fill colors
//! - `animation`: ease-out tweening shared by renderer and surfaces
//! - `surface`: a software render surface that interpolates between frames
//! - `visualizer`: the cancellable per-frame sampling loop

pub mod animation;
pub mod curve;
pub mod path;
pub mod surface;
pub mod visualizer;

pub use animation::{MORPH_DURATION, Tween, ease_out_quad};
pub use curve::{MAX_BANDS, Point, smooth};
pub use path::{PathData, PathRenderer, Rgba, Theme, closed_outline, resolve_fill};
pub use surface::{MorphSurface, SurfaceFrame};
pub use visualizer::Visualizer;
