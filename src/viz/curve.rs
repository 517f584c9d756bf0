//! Catmull-Rom smoothing of raw magnitude bins
//!
//! Maps a frame of byte magnitudes (0-255) into render-surface pixel space
//! and interpolates a smooth curve through them. Each frame's point list is
//! rebuilt from scratch; nothing here is retained between frames.

/// Upper bound on the number of frequency bins drawn, independent of the
/// analyser's resolution. Keeps the outline visually dense without tracking
/// every bin of a large FFT.
pub const MAX_BANDS: usize = 110;

/// A coordinate in render-surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Smooth a frame of byte magnitudes into a curve spanning `width` x `height`.
///
/// Bin `i` of `n` lands at `x = i / n * width` (clamped to `width`); the
/// magnitude is inverted so louder bins draw taller. Consecutive points are
/// interpolated with the cubic Catmull-Rom basis over boundary-clamped
/// quadruples, sampled at t = 0 and t = 0.5 only, so the output holds
/// exactly `2 * (n - 1)` points. Fewer than two usable bins short-circuits
/// to the raw point list.
pub fn smooth(samples: &[u8], width: f32, height: f32) -> Vec<Point> {
    let n = samples.len().min(MAX_BANDS);

    let mut points = Vec::with_capacity(n);
    for (i, &magnitude) in samples[..n].iter().enumerate() {
        let x = ((i as f32 / n as f32) * width).min(width);
        let y = height - (magnitude as f32 / 255.0) * height;
        points.push(Point { x, y });
    }

    if points.len() < 2 {
        return points;
    }

    let mut smoothed = Vec::with_capacity(2 * (n - 1));
    for i in 0..points.len() - 1 {
        // Boundary segments reuse the nearest real point instead of
        // extrapolating past the ends of the spectrum.
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = *points.get(i + 2).unwrap_or(&p2);

        for step in 0..2 {
            let t = step as f32 * 0.5;
            smoothed.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }

    smoothed
}

/// Standard cubic Catmull-Rom basis, applied independently to x and y.
fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;

    let x = 0.5
        * ((2.0 * p1.x)
            + (-p0.x + p2.x) * t
            + (2.0 * p0.x - 5.0 * p1.x + 4.0 * p2.x - p3.x) * t2
            + (-p0.x + 3.0 * p1.x - 3.0 * p2.x + p3.x) * t3);
    let y = 0.5
        * ((2.0 * p1.y)
            + (-p0.y + p2.y) * t
            + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * t2
            + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * t3);

    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_empty() {
        assert!(smooth(&[], 600.0, 60.0).is_empty());
    }

    #[test]
    fn test_single_bin_short_circuits() {
        let curve = smooth(&[128], 600.0, 60.0);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].x, 0.0);
    }

    #[test]
    fn test_curve_anchors_first_bin_at_origin() {
        for len in [2usize, 3, 7, 110, 256] {
            let samples: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
            let curve = smooth(&samples, 600.0, 60.0);
            assert_eq!(curve[0].x, 0.0, "len={}", len);
            let last = curve.last().unwrap();
            assert!(last.x <= 600.0, "len={} last.x={}", len, last.x);
        }
    }

    #[test]
    fn test_output_length_is_two_per_segment() {
        let samples = vec![0u8; 10];
        assert_eq!(smooth(&samples, 600.0, 60.0).len(), 2 * 9);
    }

    #[test]
    fn test_input_is_capped_at_max_bands() {
        let samples = vec![255u8; 512];
        let curve = smooth(&samples, 600.0, 60.0);
        assert_eq!(curve.len(), 2 * (MAX_BANDS - 1));
    }

    #[test]
    fn test_flat_input_stays_flat() {
        // A constant spectrum must not overshoot: every smoothed y equals
        // the mapped magnitude height.
        let samples = vec![255u8; 8];
        let curve = smooth(&samples, 600.0, 60.0);
        for p in &curve {
            assert!(p.y.abs() < 1e-4, "y={}", p.y);
        }
    }

    #[test]
    fn test_silence_sits_on_the_baseline() {
        let samples = vec![0u8; 8];
        let curve = smooth(&samples, 600.0, 60.0);
        for p in &curve {
            assert!((p.y - 60.0).abs() < 1e-4);
        }
    }
}
