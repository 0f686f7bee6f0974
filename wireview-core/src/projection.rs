/// Camera and projection utilities
use nalgebra::{Point2, Point3};

/// Share of the surface a projected coordinate of 1.0 reaches from the centre
pub const SCREEN_FILL: f32 = 0.45;

/// Fixed perspective camera looking down -z at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Distance from the camera to the origin along z
    pub distance: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, distance: f32) -> Self {
        Self {
            fov_degrees,
            distance,
        }
    }

    /// `1 / tan(fov / 2)`
    pub fn focal_length(&self) -> f32 {
        1.0 / (self.fov_degrees.to_radians() / 2.0).tan()
    }

    /// Projection for a surface with the given width/height ratio
    pub fn projector(&self, aspect: f32) -> Projector {
        Projector {
            focal: self.focal_length(),
            aspect,
            distance: self.distance,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(50.0, 2.5)
    }
}

/// Perspective projection with the per-frame constants folded in
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    focal: f32,
    aspect: f32,
    distance: f32,
}

impl Projector {
    /// Project a rotated, normalized point.
    ///
    /// Points at or behind the camera (`z - distance >= 0`) are not clipped;
    /// they come out sign-inverted or non-finite.
    pub fn project(&self, point: &Point3<f32>) -> Point2<f32> {
        let depth = -(point.z - self.distance);
        Point2::new(
            (point.x * self.focal / self.aspect) / depth,
            (point.y * self.focal) / depth,
        )
    }
}

/// Maps projected coordinates onto a surface of logical size `width × height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Screen y grows downward, view y grows upward.
    pub fn to_screen(&self, projected: &Point2<f32>) -> Point2<f32> {
        Point2::new(
            (projected.x * SCREEN_FILL + 0.5) * self.width,
            (-projected.y * SCREEN_FILL + 0.5) * self.height,
        )
    }
}
