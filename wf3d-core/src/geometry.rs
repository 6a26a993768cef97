/// Geometry primitives and parametric shape generators
use std::f64::consts::{PI, TAU};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, Wf3dError};

/// A model-space vertex with an optional outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: None,
        }
    }

    pub fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }
}

/// A line segment between two vertices, by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

/// Wire format produced by the mesh converter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<[f64; 3]>,
    pub edges: Vec<[usize; 2]>,
}

impl MeshData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: MeshData = serde_json::from_str(json)?;
        log::debug!(
            "parsed mesh data: {} vertices, {} edges",
            data.vertices.len(),
            data.edges.len()
        );
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Wf3dError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

/// Vertices plus the edges that connect them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// Check every edge index against the vertex count
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (edge, &Edge(a, b)) in self.edges.iter().enumerate() {
            for index in [a, b] {
                if index >= vertex_count {
                    return Err(Wf3dError::EdgeOutOfBounds {
                        edge,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Unit cube corners at +-1 with its 12 edges
    pub fn cube() -> Self {
        let vertices = vec![
            Vertex::new(-1.0, 1.0, 1.0),
            Vertex::new(1.0, 1.0, 1.0),
            Vertex::new(1.0, -1.0, 1.0),
            Vertex::new(-1.0, -1.0, 1.0),
            Vertex::new(-1.0, 1.0, -1.0),
            Vertex::new(1.0, 1.0, -1.0),
            Vertex::new(1.0, -1.0, -1.0),
            Vertex::new(-1.0, -1.0, -1.0),
        ];
        let edges = vec![
            // Front face
            Edge(0, 1),
            Edge(1, 2),
            Edge(2, 3),
            Edge(3, 0),
            // Back face
            Edge(4, 5),
            Edge(5, 6),
            Edge(6, 7),
            Edge(7, 4),
            // Connecting edges
            Edge(0, 4),
            Edge(1, 5),
            Edge(2, 6),
            Edge(3, 7),
        ];
        Self::new(vertices, edges)
    }

    /// Square pyramid: apex at y = 1, base at y = -1
    pub fn pyramid() -> Self {
        let vertices = vec![
            Vertex::new(0.0, 1.0, 0.0),
            Vertex::new(-1.0, -1.0, 1.0),
            Vertex::new(1.0, -1.0, 1.0),
            Vertex::new(1.0, -1.0, -1.0),
            Vertex::new(-1.0, -1.0, -1.0),
        ];
        let edges = vec![
            Edge(1, 2),
            Edge(2, 3),
            Edge(3, 4),
            Edge(4, 1),
            Edge(0, 1),
            Edge(0, 2),
            Edge(0, 3),
            Edge(0, 4),
        ];
        Self::new(vertices, edges)
    }

    /// Unit-radius cylinder along z from -1 to 1.
    ///
    /// Vertices `0..res` form the front ring (z = 1), `res..2*res` the back
    /// ring. Each ring is closed and every pair is joined by a side edge.
    pub fn cylinder(resolution: usize) -> Result<Self> {
        check_resolution("cylinder", resolution)?;
        let mut vertices = Vec::with_capacity(resolution * 2);
        for z in [1.0, -1.0] {
            for i in 0..resolution {
                let theta = TAU * i as f64 / resolution as f64;
                let (x, y) = theta.sin_cos();
                vertices.push(Vertex::with_normal(
                    Point3::new(x, y, z),
                    Vector3::new(x, y, 0.0),
                ));
            }
        }

        let mut edges = Vec::with_capacity(resolution * 3);
        for i in 0..resolution {
            let next = (i + 1) % resolution;
            edges.push(Edge(i, next));
            edges.push(Edge(resolution + i, resolution + next));
            edges.push(Edge(i, resolution + i));
        }
        Ok(Self::new(vertices, edges))
    }

    /// Unit sphere as a latitude/longitude grid.
    ///
    /// `resolution + 1` latitude rows from the south pole to the north pole,
    /// `resolution` points per row. Meridians join consecutive rows and every
    /// row except the two poles is closed into a parallel.
    pub fn sphere(resolution: usize) -> Result<Self> {
        check_resolution("sphere", resolution)?;
        let mut vertices = Vec::with_capacity((resolution + 1) * resolution);
        for i in 0..=resolution {
            let phi = PI * (i as f64 / resolution as f64 - 0.5);
            for j in 0..resolution {
                let theta = TAU * j as f64 / resolution as f64;
                let position = Point3::new(
                    phi.cos() * theta.sin(),
                    phi.cos() * theta.cos(),
                    phi.sin(),
                );
                let normal = position.coords.normalize();
                vertices.push(Vertex::with_normal(position, normal));
            }
        }

        let index = |i: usize, j: usize| i * resolution + (j % resolution);
        let mut edges = Vec::new();
        for i in 0..=resolution {
            for j in 0..resolution {
                if i < resolution {
                    edges.push(Edge(index(i, j), index(i + 1, j)));
                }
                if i > 0 && i < resolution {
                    edges.push(Edge(index(i, j), index(i, j + 1)));
                }
            }
        }
        Ok(Self::new(vertices, edges))
    }

    /// Torus around the z axis.
    ///
    /// `major` is the distance from the centre to the middle of the tube,
    /// `minor` the tube radius. Normals are the normalized cross product of
    /// the exact partial derivatives of the parametric surface.
    pub fn torus(resolution: usize, major: f64, minor: f64) -> Result<Self> {
        check_resolution("torus", resolution)?;
        if !(minor > 0.0 && major > minor) {
            return Err(Wf3dError::InvalidRadii { major, minor });
        }

        let mut vertices = Vec::with_capacity(resolution * resolution);
        for i in 0..resolution {
            let phi = TAU * i as f64 / resolution as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..resolution {
                let theta = TAU * j as f64 / resolution as f64;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let ring = major + minor * cos_phi;

                let position = Point3::new(ring * sin_theta, ring * cos_theta, minor * sin_phi);
                let d_theta = Vector3::new(ring * cos_theta, -ring * sin_theta, 0.0);
                let d_phi = Vector3::new(
                    -minor * sin_phi * sin_theta,
                    -minor * sin_phi * cos_theta,
                    minor * cos_phi,
                );
                let normal = d_phi.cross(&d_theta).normalize();
                vertices.push(Vertex::with_normal(position, normal));
            }
        }

        let index = |i: usize, j: usize| (i % resolution) * resolution + (j % resolution);
        let mut edges = Vec::with_capacity(resolution * resolution * 2);
        for i in 0..resolution {
            for j in 0..resolution {
                edges.push(Edge(index(i, j), index(i, j + 1)));
                edges.push(Edge(index(i, j), index(i + 1, j)));
            }
        }
        Ok(Self::new(vertices, edges))
    }
}

impl TryFrom<MeshData> for Mesh {
    type Error = Wf3dError;

    fn try_from(data: MeshData) -> Result<Self> {
        let mesh = Mesh::new(
            data.vertices
                .iter()
                .map(|&[x, y, z]| Vertex::new(x, y, z))
                .collect(),
            data.edges.iter().map(|&[a, b]| Edge(a, b)).collect(),
        );
        mesh.validate()?;
        Ok(mesh)
    }
}

/// Smallest ring resolution the curved generators accept
pub const MIN_RESOLUTION: usize = 3;

fn check_resolution(what: &'static str, resolution: usize) -> Result<()> {
    if resolution < MIN_RESOLUTION {
        log::warn!("rejected {} resolution {}", what, resolution);
        return Err(Wf3dError::InvalidResolution {
            what,
            min: MIN_RESOLUTION,
            got: resolution,
        });
    }
    Ok(())
}

/// Every kind of shape the library can build, with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Cube,
    Pyramid,
    Cylinder { resolution: usize },
    Sphere { resolution: usize },
    Torus {
        resolution: usize,
        major_radius: f64,
        minor_radius: f64,
    },
    Custom(MeshData),
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::Cylinder { .. } => "cylinder",
            ShapeKind::Sphere { .. } => "sphere",
            ShapeKind::Torus { .. } => "torus",
            ShapeKind::Custom(_) => "custom",
        }
    }

    /// Build the vertex and edge lists for this kind
    pub fn generate(&self) -> Result<Mesh> {
        let mesh = match self {
            ShapeKind::Cube => Mesh::cube(),
            ShapeKind::Pyramid => Mesh::pyramid(),
            ShapeKind::Cylinder { resolution } => Mesh::cylinder(*resolution)?,
            ShapeKind::Sphere { resolution } => Mesh::sphere(*resolution)?,
            ShapeKind::Torus {
                resolution,
                major_radius,
                minor_radius,
            } => Mesh::torus(*resolution, *major_radius, *minor_radius)?,
            ShapeKind::Custom(data) => Mesh::try_from(data.clone())?,
        };
        log::debug!(
            "generated {}: {} vertices, {} edges",
            self.name(),
            mesh.vertices.len(),
            mesh.edges.len()
        );
        Ok(mesh)
    }
}
