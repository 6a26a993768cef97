/// WF3D Web - Canvas 2D wireframe renderer for the browser
///
/// Wraps a `CanvasRenderingContext2d` as a drawing surface and exposes a
/// scene with one shape and one editable Hermite curve to JavaScript.

use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wf3d_core::{
    Control, Curve, Drawable, DrawingSurface, Hermite, MeshData, SceneConfig, Shape,
    Transformable, Viewport, Wf3dError,
};

fn to_js(err: Wf3dError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Drawing surface backed by an HTML canvas
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl DrawingSurface for CanvasSurface {
    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        if let Err(err) = self.context.arc(x, y, radius, start_angle, end_angle) {
            web_sys::console::warn_2(&JsValue::from_str("canvas arc failed:"), &err);
        }
    }
}

#[wasm_bindgen]
pub struct WebScene {
    surface: CanvasSurface,
    viewport: Viewport,
    config: SceneConfig,
    shape: Shape,
    controls: [Control; 2],
    show_curve: bool,
}

#[wasm_bindgen]
impl WebScene {
    /// Attach to the canvas element with the given id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebScene, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;

        let config = SceneConfig {
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            ..SceneConfig::default()
        };
        config.validate().map_err(to_js)?;
        let offset = config.tangent_offset;

        Ok(WebScene {
            surface: CanvasSurface::new(context),
            viewport: config.viewport(),
            config,
            shape: Shape::cube(),
            controls: [
                Control::with_tangent_offset(-0.5, -0.5, offset),
                Control::with_tangent_offset(0.5, -0.5, offset),
            ],
            show_curve: false,
        })
    }

    /// Switch to a built-in shape by name
    pub fn set_shape(&mut self, name: &str) -> Result<(), JsValue> {
        let kind = self
            .config
            .shape_kind(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown shape '{}'", name)))?;
        self.shape = Shape::new(kind).map_err(to_js)?;
        Ok(())
    }

    /// Show a mesh given as `{"vertices": [[x,y,z],...], "edges": [[a,b],...]}`
    pub fn load_mesh(&mut self, json: &str) -> Result<(), JsValue> {
        let data = MeshData::from_json_str(json).map_err(to_js)?;
        self.shape = Shape::from_mesh_data(data).map_err(to_js)?;
        Ok(())
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.shape.translate(dx, dy, dz);
    }

    /// Rotate about X, then Y, then Z, in radians
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.shape.rotate_x(dx).rotate_y(dy).rotate_z(dz);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.shape.scale(sx, sy, sz);
    }

    pub fn reset(&mut self) {
        self.shape.reset_transform();
    }

    /// Row-major 4x4 matrix of the current shape
    pub fn matrix(&self) -> Vec<f64> {
        self.shape.transform_state().to_row_major_array().to_vec()
    }

    pub fn set_show_curve(&mut self, show: bool) {
        self.show_curve = show;
    }

    /// Move whichever curve handle lies near a canvas pixel to that pixel.
    /// Returns whether a handle was hit.
    pub fn drag_handle(&mut self, from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> bool {
        let from = self.viewport.canvas_to_model(Point2::new(from_x, from_y));
        let to = self.viewport.canvas_to_model(Point2::new(to_x, to_y));
        let tolerance = 2.0 * self.config.control_radius / self.viewport.width;
        for control in &mut self.controls {
            if let Some(handle) = control.pick(from, tolerance) {
                control.update_handle(handle, to.x, to.y);
                return true;
            }
        }
        false
    }

    /// Clear the canvas and draw the scene
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.surface
            .context
            .clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        self.shape
            .draw(&mut self.surface, &self.viewport)
            .map_err(to_js)?;

        if self.show_curve {
            let [start, end] = &self.controls;
            Hermite::new(start, end)
                .and_then(|curve| {
                    curve.draw(&mut self.surface, &self.viewport, self.config.curve_resolution)
                })
                .map_err(to_js)?;
            for control in &mut self.controls {
                control.draw(&mut self.surface, &self.viewport, self.config.control_radius);
            }
        }
        Ok(())
    }
}
