/// Transformable wireframe shapes
use nalgebra::Vector4;

use crate::error::Result;
use crate::geometry::{Mesh, MeshData, ShapeKind};
use crate::projection::Viewport;
use crate::surface::DrawingSurface;
use crate::transform::Transform;

/// Something that owns a [`Transform`] and a vertex set it applies it to.
///
/// The composition methods forward to the owned transform and then call
/// [`Transformable::invalidate`] so cached results can be dropped.
pub trait Transformable {
    fn transform_state(&self) -> &Transform;
    fn transform_state_mut(&mut self) -> &mut Transform;

    /// Recompute transformed vertices from the current transform
    fn transform(&mut self) -> Result<()>;

    /// Called after every composition; drops any cached transform output
    fn invalidate(&mut self) {}

    fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().translate(dx, dy, dz);
        self.invalidate();
        self
    }

    fn rotate_x(&mut self, theta: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().rotate_x(theta);
        self.invalidate();
        self
    }

    fn rotate_y(&mut self, theta: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().rotate_y(theta);
        self.invalidate();
        self
    }

    fn rotate_z(&mut self, theta: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().rotate_z(theta);
        self.invalidate();
        self
    }

    fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().scale(sx, sy, sz);
        self.invalidate();
        self
    }

    fn reset_transform(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.transform_state_mut().reset();
        self.invalidate();
        self
    }
}

/// Something that can draw itself onto a [`DrawingSurface`]
pub trait Drawable {
    fn draw(&mut self, surface: &mut dyn DrawingSurface, viewport: &Viewport) -> Result<()>;
}

/// A mesh with its own transform and transformed-vertex cache
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    mesh: Mesh,
    transform: Transform,
    transformed: Vec<Vector4<f64>>,
}

impl Shape {
    /// Generate the mesh for `kind` and start from the identity transform
    pub fn new(kind: ShapeKind) -> Result<Self> {
        let mesh = kind.generate()?;
        Ok(Self {
            kind,
            mesh,
            transform: Transform::identity(),
            transformed: Vec::new(),
        })
    }

    pub fn cube() -> Self {
        Self::from_parts(ShapeKind::Cube, Mesh::cube())
    }

    pub fn pyramid() -> Self {
        Self::from_parts(ShapeKind::Pyramid, Mesh::pyramid())
    }

    /// Wrap externally supplied mesh data
    pub fn from_mesh_data(data: MeshData) -> Result<Self> {
        Self::new(ShapeKind::Custom(data))
    }

    fn from_parts(kind: ShapeKind, mesh: Mesh) -> Self {
        Self {
            kind,
            mesh,
            transform: Transform::identity(),
            transformed: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Vertices as of the last [`Transformable::transform`] call; empty once
    /// the transform has changed since.
    pub fn transformed_vertices(&self) -> &[Vector4<f64>] {
        &self.transformed
    }
}

impl Transformable for Shape {
    fn transform_state(&self) -> &Transform {
        &self.transform
    }

    fn transform_state_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn transform(&mut self) -> Result<()> {
        let positions = self.mesh.positions();
        self.transform.transform(&positions, &mut self.transformed)
    }

    fn invalidate(&mut self) {
        self.transformed.clear();
    }
}

impl Drawable for Shape {
    /// Transform, then draw every edge in edge-list order as one path
    fn draw(&mut self, surface: &mut dyn DrawingSurface, viewport: &Viewport) -> Result<()> {
        Transformable::transform(self)?;
        log::trace!(
            "drawing {} with {} edges",
            self.kind.name(),
            self.mesh.edges.len()
        );

        surface.begin_path();
        for edge in &self.mesh.edges {
            let a = viewport.project(&self.transformed[edge.0]);
            let b = viewport.project(&self.transformed[edge.1]);
            surface.move_to(a.x, a.y);
            surface.line_to(b.x, b.y);
        }
        surface.stroke();
        surface.close_path();
        Ok(())
    }
}
