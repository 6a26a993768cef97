/// Terminal-based wireframe viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Point2;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wf3d_core::{MeshData, SceneConfig, Viewport};

pub mod renderer;
pub mod scene;

pub use renderer::TerminalSurface;
pub use scene::{CurveMode, Scene};

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    scene: Scene,
    surface: TerminalSurface,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig, custom_mesh: Option<MeshData>) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        let scene = Scene::new(config, custom_mesh)?;

        Ok(Self {
            scene,
            // Top row is reserved for the status line
            surface: TerminalSurface::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.scene.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn viewport(&self) -> Viewport {
        let (width, height) = self.surface.pixel_size();
        Viewport::new(width, height)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if !self.scene.handle_key(code) {
                    self.running = false;
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                // Row 0 is the status line; each cell is two pixels tall
                let Some(row) = row.checked_sub(1) else {
                    return;
                };
                let canvas = Point2::new(column as f64, row as f64 * 2.0 + 1.0);
                let viewport = self.viewport();
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.scene.press(canvas, &viewport),
                    MouseEventKind::Drag(MouseButton::Left) => self.scene.drag(canvas, &viewport),
                    MouseEventKind::Up(MouseButton::Left) => self.scene.release(),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.surface
                    .resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.surface.clear();
        self.scene.render(&mut self.surface)?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "WF3D | {} | {:?} | FPS: {:.1} | 1-6 shape, WASD/E/R rotate, HJKL move, +/- scale, 0 reset, Tab/arrows/mouse edit curve, B curve type, Q quit",
                self.scene.shape().kind().name(),
                self.scene.curve_mode,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Render one frame of `scene` into a fresh surface and return it as text
pub fn render_to_text(scene: &mut Scene, width: usize, height: usize) -> io::Result<String> {
    let mut surface = TerminalSurface::new(width, height);
    scene
        .render(&mut surface)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(surface.to_text())
}
