/// Orthographic mapping between model space and canvas pixels
use nalgebra::{Point2, Vector4};

/// Map a model-space point in [-1, 1]^2 to canvas pixels.
///
/// Both axes are scaled by half the canvas width, so model space stays
/// square on non-square canvases. Canvas y grows downwards.
pub fn model_to_canvas(point: Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    let half_w = width / 2.0;
    Point2::new(half_w + point.x * half_w, height / 2.0 - point.y * half_w)
}

/// Inverse of [`model_to_canvas`], used to turn pointer input into model space
pub fn canvas_to_model(point: Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    let half_w = width / 2.0;
    Point2::new((point.x - half_w) / half_w, (height / 2.0 - point.y) / half_w)
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn model_to_canvas(&self, point: Point2<f64>) -> Point2<f64> {
        model_to_canvas(point, self.width, self.height)
    }

    pub fn canvas_to_model(&self, point: Point2<f64>) -> Point2<f64> {
        canvas_to_model(point, self.width, self.height)
    }

    /// Project a transformed homogeneous vertex, dropping z
    pub fn project(&self, vertex: &Vector4<f64>) -> Point2<f64> {
        self.model_to_canvas(Point2::new(vertex.x, vertex.y))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_to_canvas_corners() {
        let c = model_to_canvas(Point2::new(0.0, 0.0), 800.0, 600.0);
        assert_eq!(c, Point2::new(400.0, 300.0));

        let c = model_to_canvas(Point2::new(-1.0, 1.0), 800.0, 800.0);
        assert_eq!(c, Point2::new(0.0, 0.0));

        let c = model_to_canvas(Point2::new(1.0, -1.0), 800.0, 800.0);
        assert_eq!(c, Point2::new(800.0, 800.0));
    }

    #[test]
    fn test_y_scale_uses_width() {
        let c = model_to_canvas(Point2::new(0.0, 0.5), 400.0, 1000.0);
        assert_eq!(c, Point2::new(200.0, 400.0));
    }

    #[test]
    fn test_canvas_to_model_inverse() {
        let viewport = Viewport::new(640.0, 480.0);
        let p = Point2::new(0.25, -0.75);
        let back = viewport.canvas_to_model(viewport.model_to_canvas(p));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn test_project_drops_z() {
        let viewport = Viewport::default();
        let a = viewport.project(&Vector4::new(0.5, 0.5, -3.0, 1.0));
        let b = viewport.project(&Vector4::new(0.5, 0.5, 9.0, 1.0));
        assert_eq!(a, b);
    }
}
