/// Drawing surface abstraction
use nalgebra::Point2;

use crate::color::{Background, Rgb};

/// Something the viewer can draw a wireframe onto.
///
/// Sizes come in two flavours: the container's on-screen size in logical
/// units, and the backing store in device pixels. Stroke coordinates are
/// logical; the surface applies its own pixel ratio.
pub trait Surface {
    /// Current on-screen size of the container, in logical units
    fn container_size(&self) -> (f32, f32);

    /// Device pixels per logical unit
    fn pixel_ratio(&self) -> f32;

    /// Current size of the backing store, in device pixels
    fn backing_size(&self) -> (u32, u32);

    fn resize_backing(&mut self, width: u32, height: u32);

    /// Erase the previous frame, filling with the background if it has a color
    fn clear(&mut self, background: Background);

    /// Stroke `points` in order, plus the segment from the last back to the first
    fn stroke_closed(&mut self, points: &[Point2<f32>], color: Rgb);
}

/// A closed polyline captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point2<f32>>,
    pub color: Rgb,
}

/// Headless surface that records what was drawn in the last frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub container: (f32, f32),
    pub pixel_ratio: f32,
    pub backing: (u32, u32),
    pub resizes: usize,
    pub last_clear: Option<Background>,
    pub strokes: Vec<Stroke>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_pixel_ratio(width, height, 1.0)
    }

    pub fn with_pixel_ratio(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            container: (width, height),
            pixel_ratio,
            backing: (0, 0),
            resizes: 0,
            last_clear: None,
            strokes: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn container_size(&self) -> (f32, f32) {
        self.container
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.resizes += 1;
    }

    fn clear(&mut self, background: Background) {
        self.last_clear = Some(background);
        self.strokes.clear();
    }

    fn stroke_closed(&mut self, points: &[Point2<f32>], color: Rgb) {
        self.strokes.push(Stroke {
            points: points.to_vec(),
            color,
        });
    }
}
