/// Character-grid drawing surface for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wf3d_core::DrawingSurface;

/// Segments used to approximate a full circle
const ARC_SEGMENTS: usize = 16;

/// Canvas pixels are half a cell tall, so one cell holds two pixel rows
const PIXELS_PER_ROW: usize = 2;

/// Pixel rectangle edge a clipped segment crosses, in half-scale pixels
#[derive(Debug, Clone, Copy)]
enum Bound {
    X(f64),
    Y(f64),
}

/// Renders draw calls into a grid of characters.
///
/// Pixel space is `width` by `2 * height`, which keeps model space roughly
/// square on typical terminal fonts.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    brush: char,
    path: Vec<Vec<(f64, f64)>>,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
            brush: '#',
            path: Vec::new(),
        }
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.width as f64, (self.height * PIXELS_PER_ROW) as f64)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
        self.path.clear();
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.path.clear();
    }

    /// Character used by subsequent strokes
    pub fn set_brush(&mut self, brush: char) {
        self.brush = brush;
    }

    /// Character at a cell, if inside the grid
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        if column < self.width && row < self.height {
            Some(self.char_buffer[row * self.width + column])
        } else {
            None
        }
    }

    /// Number of cells that are not blank
    pub fn filled_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// The grid as text, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.char_buffer.chunks(self.width.max(1)) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        let column = x as usize;
        let row = y as usize / PIXELS_PER_ROW;
        if column < self.width && row < self.height {
            self.char_buffer[row * self.width + column] = self.brush;
        }
    }

    /// Liang-Barsky clip of a segment to the pixel rectangle.
    ///
    /// Works at half scale so the difference of two finite coordinates
    /// cannot overflow. A clipped end is placed on the boundary it crossed
    /// rather than at `from + t * delta`, which loses all precision for very
    /// long segments.
    fn clip_segment(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (max_x, max_y) = (
            (self.width - 1) as f64 / 2.0,
            (self.height * PIXELS_PER_ROW - 1) as f64 / 2.0,
        );
        let (x0, y0) = (from.0 / 2.0, from.1 / 2.0);
        let (dx, dy) = (to.0 / 2.0 - x0, to.1 / 2.0 - y0);

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        let mut enter = None;
        let mut exit = None;
        let bounds = [
            (-dx, x0, Bound::X(0.0)),
            (dx, max_x - x0, Bound::X(max_x)),
            (-dy, y0, Bound::Y(0.0)),
            (dy, max_y - y0, Bound::Y(max_y)),
        ];
        for (p, q, bound) in bounds {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 && r > t0 {
                t0 = r;
                enter = Some(bound);
            } else if p > 0.0 && r < t1 {
                t1 = r;
                exit = Some(bound);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |bound: Option<Bound>, end: (f64, f64)| {
            let (x, y) = match bound {
                None => return end,
                Some(Bound::X(x)) => (x, y0 + (x - x0) * (dy / dx)),
                Some(Bound::Y(y)) => (x0 + (y - y0) * (dx / dy), y),
            };
            (x.clamp(0.0, max_x) * 2.0, y.clamp(0.0, max_y) * 2.0)
        };
        Some((at(enter, from), at(exit, to)))
    }

    /// Bresenham between two pixel coordinates, after clipping
    fn rasterize_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }
        let Some((from, to)) = self.clip_segment(from, to) else {
            return;
        };
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    '#' => Color::Cyan,
                    '*' => Color::Yellow,
                    'o' => Color::Red,
                    '+' => Color::DarkGrey,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawingSurface for TerminalSurface {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.path.last_mut() {
            Some(subpath) => subpath.push((x, y)),
            None => self.path.push(vec![(x, y)]),
        }
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        for subpath in &path {
            if let [only] = subpath.as_slice() {
                self.rasterize_line(*only, *only);
            }
            for pair in subpath.windows(2) {
                self.rasterize_line(pair[0], pair[1]);
            }
        }
        self.path = path;
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.path.last_mut() {
            if let Some(&first) = subpath.first() {
                subpath.push(first);
            }
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let point = |angle: f64| (x + radius * angle.cos(), y + radius * angle.sin());
        self.move_to(point(start_angle).0, point(start_angle).1);
        for i in 1..=ARC_SEGMENTS {
            let angle = start_angle + (end_angle - start_angle) * i as f64 / ARC_SEGMENTS as f64;
            let (px, py) = point(angle);
            self.line_to(px, py);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut surface = TerminalSurface::new(10, 5);
        surface.begin_path();
        surface.move_to(0.0, 4.0);
        surface.line_to(9.0, 4.0);
        surface.stroke();
        for x in 0..10 {
            assert_eq!(surface.cell(x, 2), Some('#'));
        }
        assert_eq!(surface.filled_cells(), 10);
    }

    #[test]
    fn test_nothing_drawn_before_stroke() {
        let mut surface = TerminalSurface::new(10, 5);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(9.0, 9.0);
        assert_eq!(surface.filled_cells(), 0);
        surface.stroke();
        assert!(surface.filled_cells() > 0);
    }

    #[test]
    fn test_clipping() {
        let mut surface = TerminalSurface::new(4, 2);
        surface.begin_path();
        surface.move_to(-100.0, -100.0);
        surface.line_to(100.0, 100.0);
        surface.stroke();
        assert!(surface.filled_cells() <= 8);
    }

    #[test]
    fn test_far_off_screen_line_is_clipped() {
        let mut surface = TerminalSurface::new(80, 24);
        surface.begin_path();
        surface.move_to(-1e300, 10.0);
        surface.line_to(1e300, 10.0);
        surface.move_to(-f64::MAX, -f64::MAX);
        surface.line_to(f64::MAX, f64::MAX);
        surface.move_to(-1e9, -5.0);
        surface.line_to(1e9, -5.0);
        surface.stroke();
        for x in 0..80 {
            assert_eq!(surface.cell(x, 5), Some('#'));
        }
        // The diagonal lands somewhere on the grid; the line above it does not
        assert!(surface.filled_cells() > 80);
        assert!(surface.filled_cells() < 80 * 24);
    }

    #[test]
    fn test_clip_keeps_inside_segment() {
        let surface = TerminalSurface::new(10, 5);
        let clipped = surface.clip_segment((1.0, 2.0), (8.0, 7.0));
        assert_eq!(clipped, Some(((1.0, 2.0), (8.0, 7.0))));
        assert_eq!(surface.clip_segment((-5.0, 20.0), (-1.0, 30.0)), None);
    }

    #[test]
    fn test_brush_and_arc() {
        let mut surface = TerminalSurface::new(20, 10);
        surface.set_brush('o');
        surface.begin_path();
        surface.arc(10.0, 10.0, 4.0, 0.0, std::f64::consts::TAU);
        surface.stroke();
        assert!(surface.filled_cells() > 4);
        assert_eq!(surface.cell(10, 5), Some(' '));
        assert!(surface.to_text().contains('o'));
    }

    #[test]
    fn test_pixel_size() {
        let surface = TerminalSurface::new(80, 24);
        assert_eq!(surface.pixel_size(), (80.0, 48.0));
    }
}
