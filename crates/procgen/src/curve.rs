//! Uniform Catmull-Rom spline through an ordered point list.

use glam::Vec3;

/// Interpolating curve that passes through every control point.
///
/// End segments reuse the end points as phantom neighbours (clamped ends).
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
}

impl CatmullRomCurve {
    /// Returns `None` when fewer than two points are given.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn span_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Point at parameter `t` in [0, 1] over the whole curve.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let (span, local) = self.locate(t);
        let [p0, p1, p2, p3] = self.span_points(span);
        let t2 = local * local;
        let t3 = t2 * local;
        0.5 * ((2.0 * p1)
            + (-p0 + p2) * local
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
    }

    /// Derivative with respect to the span-local parameter. May be zero on degenerate input.
    pub fn derivative_at(&self, t: f32) -> Vec3 {
        let (span, local) = self.locate(t);
        let [p0, p1, p2, p3] = self.span_points(span);
        let t2 = local * local;
        0.5 * ((-p0 + p2)
            + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * local
            + 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t2)
    }

    /// Polyline length through the control points.
    pub fn chord_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    fn locate(&self, t: f32) -> (usize, f32) {
        let spans = self.span_count();
        let scaled = t.clamp(0.0, 1.0) * spans as f32;
        let span = (scaled.floor() as usize).min(spans - 1);
        (span, scaled - span as f32)
    }

    fn span_points(&self, span: usize) -> [Vec3; 4] {
        let last = self.points.len() - 1;
        let p1 = self.points[span];
        let p2 = self.points[span + 1];
        let p0 = if span == 0 { p1 } else { self.points[span - 1] };
        let p3 = if span + 2 > last { p2 } else { self.points[span + 2] };
        [p0, p1, p2, p3]
    }
}
