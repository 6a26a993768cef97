/// Scene configuration, loadable from JSON
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::{DEFAULT_CONTROL_RADIUS, DEFAULT_TANGENT_OFFSET};
use crate::error::{Result, Wf3dError};
use crate::geometry::{ShapeKind, MIN_RESOLUTION};
use crate::projection::Viewport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Segments per ring for cylinders, spheres and tori
    pub shape_resolution: usize,
    pub torus_major_radius: f64,
    pub torus_minor_radius: f64,
    /// Samples per drawn curve
    pub curve_resolution: usize,
    /// Pixel radius of drawn control points
    pub control_radius: f64,
    pub tangent_offset: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 800,
            shape_resolution: 20,
            torus_major_radius: 0.5,
            torus_minor_radius: 0.25,
            curve_resolution: 50,
            control_radius: DEFAULT_CONTROL_RADIUS,
            tangent_offset: DEFAULT_TANGENT_OFFSET,
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SceneConfig =
            serde_json::from_str(json).map_err(|e| Wf3dError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Wf3dError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Wf3dError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.shape_resolution < MIN_RESOLUTION {
            return Err(Wf3dError::Config(format!(
                "shape_resolution must be at least {}",
                MIN_RESOLUTION
            )));
        }
        if self.curve_resolution < 2 {
            return Err(Wf3dError::Config(
                "curve_resolution must be at least 2".to_string(),
            ));
        }
        if !(self.torus_minor_radius > 0.0 && self.torus_major_radius > self.torus_minor_radius) {
            return Err(Wf3dError::InvalidRadii {
                major: self.torus_major_radius,
                minor: self.torus_minor_radius,
            });
        }
        if !(self.control_radius >= 0.0) {
            return Err(Wf3dError::Config(
                "control_radius must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas_width as f64, self.canvas_height as f64)
    }

    /// Shape kind by name, using this config's resolution and radii
    pub fn shape_kind(&self, name: &str) -> Option<ShapeKind> {
        let resolution = self.shape_resolution;
        match name.to_ascii_lowercase().as_str() {
            "cube" => Some(ShapeKind::Cube),
            "pyramid" => Some(ShapeKind::Pyramid),
            "cylinder" => Some(ShapeKind::Cylinder { resolution }),
            "sphere" => Some(ShapeKind::Sphere { resolution }),
            "torus" => Some(ShapeKind::Torus {
                resolution,
                major_radius: self.torus_major_radius,
                minor_radius: self.torus_minor_radius,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.viewport(), Viewport::new(800.0, 800.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SceneConfig::from_json_str(r#"{"canvas_width": 640, "curve_resolution": 10}"#)
            .unwrap();
        assert_eq!(config.canvas_width, 640);
        assert_eq!(config.canvas_height, 800);
        assert_eq!(config.curve_resolution, 10);
        assert_eq!(config.torus_minor_radius, 0.25);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SceneConfig::from_json_str(r#"{"canvas_height": 0}"#),
            Err(Wf3dError::Config(_))
        ));
        assert!(SceneConfig::from_json_str(r#"{"shape_resolution": 2}"#).is_err());
        assert!(SceneConfig::from_json_str(r#"{"curve_resolution": 1}"#).is_err());
        assert!(matches!(
            SceneConfig::from_json_str(r#"{"torus_major_radius": 0.1}"#),
            Err(Wf3dError::InvalidRadii { .. })
        ));
    }

    #[test]
    fn test_shape_kind_lookup() {
        let config = SceneConfig::default();
        assert_eq!(config.shape_kind("Cube"), Some(ShapeKind::Cube));
        assert_eq!(
            config.shape_kind("sphere"),
            Some(ShapeKind::Sphere { resolution: 20 })
        );
        assert_eq!(config.shape_kind("teapot"), None);
    }
}
