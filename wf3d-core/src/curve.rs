/// Control points and cubic spline curves
use nalgebra::{DMatrix, Point2, Vector2};

use crate::error::{Result, Wf3dError};
use crate::matrix::multiply;
use crate::projection::Viewport;
use crate::surface::DrawingSurface;

/// Tangent handles are scaled by this before entering the Hermite basis
pub const HERMITE_TANGENT_SCALE: f64 = 4.0;

/// Offset of a fresh tangent handle from its position point
pub const DEFAULT_TANGENT_OFFSET: f64 = 0.1;

/// Pixel radius used when drawing control points
pub const DEFAULT_CONTROL_RADIUS: f64 = 3.0;

/// Cubic Bezier basis, rows multiply `[t^3, t^2, t, 1]`
const BEZIER_BASIS: [f64; 16] = [
    -1.0, 3.0, -3.0, 1.0, //
    3.0, -6.0, 3.0, 0.0, //
    -3.0, 3.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, 0.0,
];

/// A draggable point in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub position: Point2<f64>,
    canvas: Option<Point2<f64>>,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            canvas: None,
        }
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.position = Point2::new(x, y);
    }

    /// Where this point landed on the canvas the last time it was drawn
    pub fn canvas_coord(&self) -> Option<Point2<f64>> {
        self.canvas
    }

    /// Draw a full circle of `radius` pixels and remember the canvas position
    pub fn draw(&mut self, surface: &mut dyn DrawingSurface, viewport: &Viewport, radius: f64) {
        let c = viewport.model_to_canvas(self.position);
        self.canvas = Some(c);
        surface.begin_path();
        surface.arc(c.x, c.y, radius, 0.0, std::f64::consts::TAU);
        surface.stroke();
    }
}

/// Which half of a [`Control`] a pick landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHandle {
    Position,
    Tangent,
}

/// A position point paired with its tangent handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub position: ControlPoint,
    pub tangent: ControlPoint,
}

impl Control {
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_tangent_offset(x, y, DEFAULT_TANGENT_OFFSET)
    }

    pub fn with_tangent_offset(x: f64, y: f64, offset: f64) -> Self {
        Self {
            position: ControlPoint::new(x, y),
            tangent: ControlPoint::new(x + offset, y + offset),
        }
    }

    /// Move the position point. The tangent handle stays where it is.
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.position.update(x, y);
    }

    pub fn update_tangent(&mut self, x: f64, y: f64) {
        self.tangent.update(x, y);
    }

    pub fn update_handle(&mut self, handle: ControlHandle, x: f64, y: f64) {
        match handle {
            ControlHandle::Position => self.update_position(x, y),
            ControlHandle::Tangent => self.update_tangent(x, y),
        }
    }

    /// Tangent handle minus position
    pub fn tangent_delta(&self) -> Vector2<f64> {
        self.tangent.position - self.position.position
    }

    /// Nearest handle within `tolerance` of a model-space point.
    /// Ties go to the position point.
    pub fn pick(&self, point: Point2<f64>, tolerance: f64) -> Option<ControlHandle> {
        let to_position = (self.position.position - point).norm();
        let to_tangent = (self.tangent.position - point).norm();
        if to_position <= tolerance && to_position <= to_tangent {
            Some(ControlHandle::Position)
        } else if to_tangent <= tolerance {
            Some(ControlHandle::Tangent)
        } else {
            None
        }
    }

    fn is_finite(&self) -> bool {
        [self.position.position, self.tangent.position]
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Both points, then the segment joining them
    pub fn draw(&mut self, surface: &mut dyn DrawingSurface, viewport: &Viewport, radius: f64) {
        self.position.draw(surface, viewport, radius);
        self.tangent.draw(surface, viewport, radius);
        if let (Some(a), Some(b)) = (self.position.canvas, self.tangent.canvas) {
            surface.begin_path();
            surface.move_to(a.x, a.y);
            surface.line_to(b.x, b.y);
            surface.stroke();
        }
    }
}

/// A parametric 2D curve on t in [0, 1]
pub trait Curve {
    fn evaluate(&self, t: f64) -> Point2<f64>;

    /// `resolution` evenly spaced samples, `t = i / (resolution - 1)`
    fn samples(&self, resolution: usize) -> Result<Samples<'_, Self>>
    where
        Self: Sized,
    {
        if resolution < 2 {
            return Err(Wf3dError::InvalidResolution {
                what: "curve sampling",
                min: 2,
                got: resolution,
            });
        }
        Ok(Samples {
            curve: self,
            resolution,
            index: 0,
        })
    }

    /// Draw the samples as one open polyline
    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        viewport: &Viewport,
        resolution: usize,
    ) -> Result<()>
    where
        Self: Sized,
    {
        let mut samples = self.samples(resolution)?.map(|p| viewport.model_to_canvas(p));
        surface.begin_path();
        if let Some(first) = samples.next() {
            surface.move_to(first.x, first.y);
        }
        for p in samples {
            surface.line_to(p.x, p.y);
        }
        surface.stroke();
        Ok(())
    }
}

/// Lazy sample sequence over a curve. Clone it to restart.
#[derive(Debug)]
pub struct Samples<'a, C> {
    curve: &'a C,
    resolution: usize,
    index: usize,
}

impl<C> Clone for Samples<'_, C> {
    fn clone(&self) -> Self {
        Self {
            curve: self.curve,
            resolution: self.resolution,
            index: self.index,
        }
    }
}

impl<C: Curve> Iterator for Samples<'_, C> {
    type Item = Point2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.resolution {
            return None;
        }
        let t = self.index as f64 / (self.resolution - 1) as f64;
        self.index += 1;
        Some(self.curve.evaluate(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.resolution - self.index;
        (remaining, Some(remaining))
    }
}

impl<C: Curve> ExactSizeIterator for Samples<'_, C> {}

fn is_finite_vector(v: &Vector2<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Cubic Hermite segment between two controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hermite {
    pub p0: Vector2<f64>,
    pub p1: Vector2<f64>,
    pub m0: Vector2<f64>,
    pub m1: Vector2<f64>,
}

impl Hermite {
    /// Tangents are `4 * (tangent handle - position)` at each end
    pub fn new(start: &Control, end: &Control) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Wf3dError::NonFiniteControl);
        }
        let m0 = start.tangent_delta() * HERMITE_TANGENT_SCALE;
        let m1 = end.tangent_delta() * HERMITE_TANGENT_SCALE;
        // Finite handles can still overflow once scaled
        if !is_finite_vector(&m0) || !is_finite_vector(&m1) {
            return Err(Wf3dError::NonFiniteControl);
        }
        Ok(Self {
            p0: start.position.position.coords,
            p1: end.position.position.coords,
            m0,
            m1,
        })
    }
}

impl Curve for Hermite {
    fn evaluate(&self, t: f64) -> Point2<f64> {
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        Point2::from(self.p0 * h00 + self.m0 * h10 + self.p1 * h01 + self.m1 * h11)
    }
}

/// Cubic Bezier segment stored as power-basis coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct Bezier {
    points: [Point2<f64>; 4],
    coefficients: [Vector2<f64>; 4],
}

impl Bezier {
    /// Coefficients are `M . G` with `G` the 4x2 matrix of control points
    pub fn new(points: [Point2<f64>; 4]) -> Result<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Wf3dError::NonFiniteControl);
        }
        let basis = DMatrix::from_row_slice(4, 4, &BEZIER_BASIS);
        let geometry = DMatrix::from_fn(4, 2, |r, c| points[r][c]);
        let product = multiply(&basis, &geometry)?;

        let mut coefficients = [Vector2::zeros(); 4];
        for (r, coefficient) in coefficients.iter_mut().enumerate() {
            *coefficient = Vector2::new(product[(r, 0)], product[(r, 1)]);
        }
        if !coefficients.iter().all(is_finite_vector) {
            return Err(Wf3dError::NonFiniteControl);
        }
        Ok(Self {
            points,
            coefficients,
        })
    }

    /// Start position, start handle, end position mirrored through the end
    /// handle, end position
    pub fn from_controls(start: &Control, end: &Control) -> Result<Self> {
        let p3 = end.position.position;
        Self::new([
            start.position.position,
            start.tangent.position,
            p3 - end.tangent_delta(),
            p3,
        ])
    }

    pub fn points(&self) -> &[Point2<f64>; 4] {
        &self.points
    }
}

impl Curve for Bezier {
    fn evaluate(&self, t: f64) -> Point2<f64> {
        let [a, b, c, d] = self.coefficients;
        Point2::from(((a * t + b) * t + c) * t + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn controls() -> (Control, Control) {
        let mut start = Control::new(-0.5, -0.25);
        start.update_tangent(-0.3, 0.4);
        let mut end = Control::new(0.6, 0.1);
        end.update_tangent(0.9, -0.2);
        (start, end)
    }

    #[test]
    fn test_control_defaults() {
        let control = Control::new(0.2, 0.3);
        assert_eq!(control.tangent.position, Point2::new(0.2 + 0.1, 0.3 + 0.1));
        assert!(control.position.canvas_coord().is_none());
    }

    #[test]
    fn test_update_position_keeps_tangent() {
        let mut control = Control::new(0.0, 0.0);
        control.update_position(0.5, 0.5);
        assert_eq!(control.position.position, Point2::new(0.5, 0.5));
        assert_eq!(control.tangent.position, Point2::new(0.1, 0.1));
    }

    #[test]
    fn test_hermite_endpoints_exact() {
        let (start, end) = controls();
        let curve = Hermite::new(&start, &end).unwrap();
        let points: Vec<_> = curve.samples(7).unwrap().collect();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], start.position.position);
        assert_eq!(points[6], end.position.position);
    }

    #[test]
    fn test_hermite_tangent_scale() {
        let (start, end) = controls();
        let curve = Hermite::new(&start, &end).unwrap();
        assert!((curve.m0 - Vector2::new(0.2, 0.65) * 4.0).norm() < 1e-12);
        assert_eq!(curve.m1, (end.tangent.position - end.position.position) * 4.0);

        // Derivative at t = 0 approximates m0
        let h = 1e-6;
        let slope = (curve.evaluate(h) - curve.evaluate(0.0)) / h;
        assert!((slope - curve.m0).norm() < 1e-4);
    }

    #[test]
    fn test_samples_restartable() {
        let (start, end) = controls();
        let curve = Hermite::new(&start, &end).unwrap();
        let samples = curve.samples(5).unwrap();
        assert_eq!(samples.len(), 5);
        let first: Vec<_> = samples.clone().collect();
        let second: Vec<_> = samples.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_below_two_rejected() {
        let (start, end) = controls();
        let curve = Hermite::new(&start, &end).unwrap();
        assert!(matches!(
            curve.samples(1),
            Err(Wf3dError::InvalidResolution { min: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_control_rejected() {
        let (start, _) = controls();
        let end = Control::new(f64::NAN, 0.0);
        assert!(matches!(
            Hermite::new(&start, &end),
            Err(Wf3dError::NonFiniteControl)
        ));
    }

    #[test]
    fn test_overflowing_tangent_rejected() {
        let mut start = Control::new(f64::MAX / 2.0, 0.0);
        start.update_tangent(-f64::MAX / 2.0, 0.0);
        let (_, end) = controls();
        assert!(matches!(
            Hermite::new(&start, &end),
            Err(Wf3dError::NonFiniteControl)
        ));
        assert!(matches!(
            Bezier::from_controls(&end, &start),
            Err(Wf3dError::NonFiniteControl)
        ));
    }

    #[test]
    fn test_curve_draws_open_polyline() {
        let (start, end) = controls();
        let curve = Hermite::new(&start, &end).unwrap();
        let mut surface = RecordingSurface::new();
        curve.draw(&mut surface, &Viewport::default(), 10).unwrap();
        assert_eq!(surface.line_count(), 9);
        assert!(!surface.commands.contains(&DrawCommand::ClosePath));
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let curve = Bezier::new(points).unwrap();
        assert!((curve.evaluate(0.0) - points[0]).norm() < 1e-12);
        assert!((curve.evaluate(1.0) - points[3]).norm() < 1e-12);
        assert!((curve.evaluate(0.5) - Point2::new(0.5, 0.75)).norm() < 1e-12);
    }

    #[test]
    fn test_bezier_matches_hermite_from_same_controls() {
        // A Bezier handle at offset d gives an end tangent of 3d
        let mut start = Control::new(-0.5, 0.0);
        start.update_tangent(-0.5 + 0.3, 0.3);
        let mut end = Control::new(0.5, 0.0);
        end.update_tangent(0.5 + 0.3, -0.3);

        let bezier = Bezier::from_controls(&start, &end).unwrap();
        let hermite = Hermite {
            p0: start.position.position.coords,
            p1: end.position.position.coords,
            m0: start.tangent_delta() * 3.0,
            m1: end.tangent_delta() * 3.0,
        };
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((bezier.evaluate(t) - hermite.evaluate(t)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_pick() {
        let control = Control::new(0.0, 0.0);
        assert_eq!(control.pick(Point2::new(0.01, 0.0), 0.05), Some(ControlHandle::Position));
        assert_eq!(control.pick(Point2::new(0.1, 0.11), 0.05), Some(ControlHandle::Tangent));
        assert_eq!(control.pick(Point2::new(0.5, 0.5), 0.05), None);
    }

    #[test]
    fn test_control_draw_records_canvas_coords() {
        let mut control = Control::new(0.0, 0.0);
        let mut surface = RecordingSurface::new();
        control.draw(&mut surface, &Viewport::new(100.0, 100.0), 3.0);
        assert_eq!(control.position.canvas_coord(), Some(Point2::new(50.0, 50.0)));
        assert_eq!(
            surface
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Arc { radius, .. } if *radius == 3.0))
                .count(),
            2
        );
        assert_eq!(surface.line_count(), 1);
    }
}
