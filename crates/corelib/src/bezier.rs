//! Piecewise cubic Bézier curves sampled into a closed playback path.

use crate::Vec3;

/// Evaluate one cubic segment at `t` (Bernstein form).
#[inline]
pub fn cubic_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
}

/// Chain of cubic segments sharing end points: `P0..P3`, `P3..P6`, ...
///
/// Samples are precomputed once; playback walks them by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BezierCurve {
    control_points: Vec<Vec3>,
    points_per_segment: u32,
    samples: Vec<Vec3>,
}

impl BezierCurve {
    pub fn new(control_points: Vec<Vec3>, points_per_segment: u32) -> Self {
        let points_per_segment = points_per_segment.max(1);
        let samples = sample_chain(&control_points, points_per_segment);
        Self {
            control_points,
            points_per_segment,
            samples,
        }
    }

    /// Curve with no samples; playback on it is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`, wrapping around the end of the path.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples[index % self.samples.len()])
    }

    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    pub fn points_per_segment(&self) -> u32 {
        self.points_per_segment
    }
}

fn sample_chain(control: &[Vec3], per_segment: u32) -> Vec<Vec3> {
    if control.len() < 4 {
        return Vec::new();
    }

    let segments = (control.len() - 1) / 3;
    let mut out = Vec::with_capacity(segments * per_segment as usize + 1);
    for s in 0..segments {
        let base = s * 3;
        let [p0, p1, p2, p3] = [
            control[base],
            control[base + 1],
            control[base + 2],
            control[base + 3],
        ];
        for k in 0..per_segment {
            let t = k as f32 / per_segment as f32;
            out.push(cubic_point(p0, p1, p2, p3, t));
        }
    }
    // Close the last segment exactly on its end point.
    out.push(control[segments * 3]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn square_loop() -> Vec<Vec3> {
        vec![
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(-1.0, 1.0, 0.0),
            vec3(-1.0, 0.0, 0.0),
            vec3(0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn cubic_hits_end_points() {
        let (a, b, c, d) = (Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE);
        assert_eq!(cubic_point(a, b, c, d, 0.0), a);
        assert!((cubic_point(a, b, c, d, 1.0) - d).length() < 1e-6);
    }

    #[test]
    fn cubic_midpoint_of_straight_line() {
        let p = cubic_point(
            Vec3::ZERO,
            vec3(1.0, 0.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(3.0, 0.0, 0.0),
            0.5,
        );
        assert!((p - vec3(1.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn sample_count_covers_all_segments() {
        let curve = BezierCurve::new(square_loop(), 10);
        // two segments * 10 samples + closing point
        assert_eq!(curve.len(), 21);
        assert_eq!(curve.samples()[0], Vec3::ZERO);
        assert_eq!(*curve.samples().last().unwrap(), Vec3::ZERO);
        // start of second segment is the shared control point
        assert!((curve.samples()[10] - vec3(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn too_few_control_points_gives_empty_curve() {
        let curve = BezierCurve::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], 50);
        assert!(curve.is_empty());
        assert_eq!(curve.point(3), None);
    }

    #[test]
    fn trailing_points_are_ignored() {
        let mut pts = square_loop();
        pts.push(vec3(9.0, 9.0, 9.0));
        pts.push(vec3(8.0, 8.0, 8.0));
        let curve = BezierCurve::new(pts, 4);
        assert_eq!(curve.len(), 9);
        assert_eq!(*curve.samples().last().unwrap(), Vec3::ZERO);
    }

    #[test]
    fn point_wraps_around() {
        let curve = BezierCurve::new(square_loop(), 3);
        let n = curve.len();
        assert_eq!(curve.point(n + 2), curve.point(2));
    }

    #[test]
    fn zero_points_per_segment_is_clamped() {
        let curve = BezierCurve::new(square_loop(), 0);
        assert_eq!(curve.points_per_segment(), 1);
        assert_eq!(curve.len(), 3);
    }
}
