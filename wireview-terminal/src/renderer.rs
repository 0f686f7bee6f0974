/// Half-block pixel surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use wireview_core::{Background, Rgb, Surface};

/// Logical units covered by one terminal cell horizontally
pub const CELL_WIDTH: f32 = 8.0;
/// Logical units covered by one terminal cell vertically
pub const CELL_HEIGHT: f32 = 16.0;

/// A terminal viewed as a pixel grid two pixels tall per cell.
///
/// Each cell spans `CELL_WIDTH × CELL_HEIGHT` logical units, so one device
/// pixel is `CELL_WIDTH` units square and the backing store is
/// `columns × 2·rows` pixels.
pub struct CellSurface {
    columns: u16,
    rows: u16,
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
    background: Option<Rgb>,
}

impl CellSurface {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            background: None,
        }
    }

    /// Record the terminal's current size. The backing store follows on the
    /// next frame.
    pub fn set_container(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Logical position of the centre of a terminal cell
    pub fn cell_center(column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.5) * CELL_WIDTH,
            (row as f32 + 0.5) * CELL_HEIGHT,
        )
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    fn plot(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = Some(color);
        }
    }

    /// Bresenham line between two device-space points
    fn draw_line(&mut self, a: Point2<f32>, b: Point2<f32>, color: Rgb) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let max = Point2::new((self.width - 1) as f32, (self.height - 1) as f32);
        let Some((a, b)) = clip_segment(a, b, max) else {
            return;
        };

        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
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

    /// Write the whole grid starting at the top-left cell
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.cell_rows() {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            self.draw_row(writer, row)?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Write the grid as plain lines at the cursor, for non-fullscreen output
    pub fn print<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.cell_rows() {
            self.draw_row(writer, row)?;
            writer.queue(ResetColor)?;
            writer.queue(Print('\n'))?;
        }
        Ok(())
    }

    fn cell_rows(&self) -> usize {
        self.height.div_ceil(2)
    }

    fn draw_row<W: Write>(&self, writer: &mut W, row: usize) -> std::io::Result<()> {
        let background = self.background.map(to_color).unwrap_or(Color::Reset);
        let mut current: Option<(Color, Color)> = None;

        for x in 0..self.width {
            let top = self.pixel(x, row * 2);
            let bottom = self.pixel(x, row * 2 + 1);
            let (glyph, fg, bg) = match (top, bottom) {
                (None, None) => (' ', background, background),
                (Some(t), None) => ('▀', to_color(t), background),
                (None, Some(b)) => ('▄', to_color(b), background),
                (Some(t), Some(b)) if t == b => ('█', to_color(t), background),
                (Some(t), Some(b)) => ('▀', to_color(t), to_color(b)),
            };

            if current != Some((fg, bg)) {
                writer.queue(SetForegroundColor(fg))?;
                writer.queue(SetBackgroundColor(bg))?;
                current = Some((fg, bg));
            }
            writer.queue(Print(glyph))?;
        }
        Ok(())
    }
}

impl Surface for CellSurface {
    fn container_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * CELL_WIDTH,
            self.rows as f32 * CELL_HEIGHT,
        )
    }

    fn pixel_ratio(&self) -> f32 {
        1.0 / CELL_WIDTH
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = height as usize;
        self.pixels = vec![None; self.width * self.height];
    }

    fn clear(&mut self, background: Background) {
        self.background = background.color();
        self.pixels.fill(None);
    }

    fn stroke_closed(&mut self, points: &[Point2<f32>], color: Rgb) {
        let ratio = self.pixel_ratio();
        let to_device = |p: &Point2<f32>| Point2::new(p.x * ratio, p.y * ratio);

        for (i, a) in points.iter().enumerate() {
            let b = &points[(i + 1) % points.len()];
            self.draw_line(to_device(a), to_device(b), color);
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the box `[0, max]`.
///
/// Segments with non-finite endpoints are dropped; they come from points
/// projected at or behind the camera plane.
fn clip_segment(
    a: Point2<f32>,
    b: Point2<f32>,
    max: Point2<f32>,
) -> Option<(Point2<f32>, Point2<f32>)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }

    let d = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    Some((a + d * t0, a + d * t1))
}
