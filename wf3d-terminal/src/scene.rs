/// Viewer state: the current shape, its transform and an editable curve
use crossterm::event::KeyCode;
use nalgebra::Point2;
use wf3d_core::{
    Bezier, Control, ControlHandle, Curve, Drawable, Hermite, MeshData, SceneConfig, Shape,
    ShapeKind, Transformable, Viewport,
};

use crate::renderer::TerminalSurface;

const ROTATE_STEP: f64 = 0.1;
const TRANSLATE_STEP: f64 = 0.05;
const SCALE_STEP: f64 = 1.1;
const INITIAL_SCALE: f64 = 0.5;

/// Which spline is drawn through the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveMode {
    Hermite,
    Bezier,
}

/// A control handle addressed by control index and half
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRef {
    pub control: usize,
    pub handle: ControlHandle,
}

/// Everything the viewer draws, independent of the terminal itself
pub struct Scene {
    config: SceneConfig,
    custom_mesh: Option<MeshData>,
    shape: Shape,
    pub auto_rotate: bool,
    pub show_curve: bool,
    pub curve_mode: CurveMode,
    controls: [Control; 2],
    selected: HandleRef,
    dragging: Option<HandleRef>,
}

impl Scene {
    pub fn new(config: SceneConfig, custom_mesh: Option<MeshData>) -> wf3d_core::Result<Self> {
        let kind = match &custom_mesh {
            Some(data) => ShapeKind::Custom(data.clone()),
            None => ShapeKind::Cube,
        };
        let shape = Self::build_shape(kind)?;
        let offset = config.tangent_offset;
        Ok(Self {
            controls: [
                Control::with_tangent_offset(-0.6, -0.4, offset),
                Control::with_tangent_offset(0.6, -0.4, offset),
            ],
            config,
            custom_mesh,
            shape,
            auto_rotate: true,
            show_curve: true,
            curve_mode: CurveMode::Hermite,
            selected: HandleRef {
                control: 0,
                handle: ControlHandle::Tangent,
            },
            dragging: None,
        })
    }

    fn build_shape(kind: ShapeKind) -> wf3d_core::Result<Shape> {
        let mut shape = Shape::new(kind)?;
        shape.scale(INITIAL_SCALE, INITIAL_SCALE, INITIAL_SCALE);
        Ok(shape)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn controls(&self) -> &[Control; 2] {
        &self.controls
    }

    pub fn selected(&self) -> HandleRef {
        self.selected
    }

    /// Swap in a new shape; an invalid kind keeps the current one
    pub fn select_shape(&mut self, kind: ShapeKind) {
        match Self::build_shape(kind) {
            Ok(shape) => {
                tracing::debug!(shape = shape.kind().name(), "selected shape");
                self.shape = shape;
            }
            Err(e) => tracing::warn!(error = %e, "could not build shape"),
        }
    }

    pub fn select_shape_by_name(&mut self, name: &str) -> bool {
        match self.config.shape_kind(name) {
            Some(kind) => {
                self.select_shape(kind);
                true
            }
            None => false,
        }
    }

    /// Per-frame update
    pub fn update(&mut self) {
        if self.auto_rotate {
            self.shape.rotate_x(0.01).rotate_y(0.015);
        }
    }

    /// Returns false when the key asks to quit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('1') => self.select_shape(ShapeKind::Cube),
            KeyCode::Char('2') => self.select_shape(ShapeKind::Pyramid),
            KeyCode::Char('3') => {
                self.select_shape_by_name("cylinder");
            }
            KeyCode::Char('4') => {
                self.select_shape_by_name("sphere");
            }
            KeyCode::Char('5') => {
                self.select_shape_by_name("torus");
            }
            KeyCode::Char('6') => {
                if let Some(data) = self.custom_mesh.clone() {
                    self.select_shape(ShapeKind::Custom(data));
                }
            }
            KeyCode::Char('w') => {
                self.shape.rotate_x(ROTATE_STEP);
            }
            KeyCode::Char('s') => {
                self.shape.rotate_x(-ROTATE_STEP);
            }
            KeyCode::Char('a') => {
                self.shape.rotate_y(-ROTATE_STEP);
            }
            KeyCode::Char('d') => {
                self.shape.rotate_y(ROTATE_STEP);
            }
            KeyCode::Char('e') => {
                self.shape.rotate_z(ROTATE_STEP);
            }
            KeyCode::Char('r') => {
                self.shape.rotate_z(-ROTATE_STEP);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.shape.scale(SCALE_STEP, SCALE_STEP, SCALE_STEP);
            }
            KeyCode::Char('-') => {
                let s = 1.0 / SCALE_STEP;
                self.shape.scale(s, s, s);
            }
            KeyCode::Char('h') => {
                self.shape.translate(-TRANSLATE_STEP, 0.0, 0.0);
            }
            KeyCode::Char('l') => {
                self.shape.translate(TRANSLATE_STEP, 0.0, 0.0);
            }
            KeyCode::Char('k') => {
                self.shape.translate(0.0, TRANSLATE_STEP, 0.0);
            }
            KeyCode::Char('j') => {
                self.shape.translate(0.0, -TRANSLATE_STEP, 0.0);
            }
            KeyCode::Char('0') => {
                self.shape
                    .reset_transform()
                    .scale(INITIAL_SCALE, INITIAL_SCALE, INITIAL_SCALE);
            }
            KeyCode::Char(' ') => self.auto_rotate = !self.auto_rotate,
            KeyCode::Char('c') => self.show_curve = !self.show_curve,
            KeyCode::Char('b') => {
                self.curve_mode = match self.curve_mode {
                    CurveMode::Hermite => CurveMode::Bezier,
                    CurveMode::Bezier => CurveMode::Hermite,
                }
            }
            KeyCode::Tab => self.select_next_handle(),
            KeyCode::Up => self.nudge_selected(0.0, TRANSLATE_STEP),
            KeyCode::Down => self.nudge_selected(0.0, -TRANSLATE_STEP),
            KeyCode::Left => self.nudge_selected(-TRANSLATE_STEP, 0.0),
            KeyCode::Right => self.nudge_selected(TRANSLATE_STEP, 0.0),
            _ => {}
        }
        true
    }

    fn select_next_handle(&mut self) {
        let HandleRef { control, handle } = self.selected;
        self.selected = match handle {
            ControlHandle::Position => HandleRef {
                control,
                handle: ControlHandle::Tangent,
            },
            ControlHandle::Tangent => HandleRef {
                control: (control + 1) % self.controls.len(),
                handle: ControlHandle::Position,
            },
        };
    }

    fn handle_point(&self, r: HandleRef) -> Point2<f64> {
        let control = &self.controls[r.control];
        match r.handle {
            ControlHandle::Position => control.position.position,
            ControlHandle::Tangent => control.tangent.position,
        }
    }

    fn nudge_selected(&mut self, dx: f64, dy: f64) {
        let r = self.selected;
        let p = self.handle_point(r);
        self.controls[r.control].update_handle(r.handle, p.x + dx, p.y + dy);
    }

    /// Start dragging whichever handle lies under a canvas pixel
    pub fn press(&mut self, canvas: Point2<f64>, viewport: &Viewport) {
        let model = viewport.canvas_to_model(canvas);
        // Two cells either way, in model units
        let tolerance = 4.0 / viewport.width;
        self.dragging = self
            .controls
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.pick(model, tolerance).map(|handle| HandleRef { control: i, handle }));
        if let Some(r) = self.dragging {
            self.selected = r;
        }
    }

    pub fn drag(&mut self, canvas: Point2<f64>, viewport: &Viewport) {
        if let Some(r) = self.dragging {
            let model = viewport.canvas_to_model(canvas);
            self.controls[r.control].update_handle(r.handle, model.x, model.y);
        }
    }

    pub fn release(&mut self) {
        self.dragging = None;
    }

    /// Draw the shape, then the curve and its controls
    pub fn render(&mut self, surface: &mut TerminalSurface) -> wf3d_core::Result<()> {
        let (width, height) = surface.pixel_size();
        let viewport = Viewport::new(width, height);

        surface.set_brush('#');
        self.shape.draw(surface, &viewport)?;

        if self.show_curve {
            let [start, end] = &self.controls;
            surface.set_brush('*');
            match self.curve_mode {
                CurveMode::Hermite => Hermite::new(start, end)?.draw(
                    surface,
                    &viewport,
                    self.config.curve_resolution,
                )?,
                CurveMode::Bezier => Bezier::from_controls(start, end)?.draw(
                    surface,
                    &viewport,
                    self.config.curve_resolution,
                )?,
            }

            // Handle points are single cells on a terminal
            let radius = self.config.control_radius.min(1.0);
            for control in &mut self.controls {
                surface.set_brush('+');
                control.draw(surface, &viewport, radius);
            }
        }
        Ok(())
    }
}
