/// Error types shared by every part of the core library
use thiserror::Error;

/// Errors produced by matrix math, geometry construction and curve sampling
#[derive(Debug, Error)]
pub enum Wf3dError {
    /// Operand shapes do not line up for a multiply or dot product.
    #[error("dimension mismatch in {context}: left is {left}, right is {right}")]
    Dimension {
        context: &'static str,
        left: String,
        right: String,
    },
    #[error("edge {edge} references vertex {index}, but the mesh has {vertex_count} vertices")]
    EdgeOutOfBounds {
        edge: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("{what} needs a resolution of at least {min}, got {got}")]
    InvalidResolution {
        what: &'static str,
        min: usize,
        got: usize,
    },
    #[error("torus radii must satisfy major > minor > 0 (major {major}, minor {minor})")]
    InvalidRadii { major: f64, minor: f64 },
    #[error("control coordinates must be finite")]
    NonFiniteControl,
    #[error("invalid mesh data: {0}")]
    MeshData(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Wf3dError {
    pub(crate) fn dimension(
        context: &'static str,
        left: impl std::fmt::Display,
        right: impl std::fmt::Display,
    ) -> Self {
        Self::Dimension {
            context,
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Wf3dError>;
