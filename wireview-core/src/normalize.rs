/// Fit arbitrary geometry into a canonical unit frame
use nalgebra::Point3;

use crate::geometry::Bounds;

/// Vertices recentred on the origin and uniformly scaled so the largest
/// bounding-box span is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMesh {
    pub vertices: Vec<Point3<f32>>,
    pub center: Point3<f32>,
    pub scale: f32,
}

impl NormalizedMesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            center: Point3::origin(),
            scale: 1.0,
        }
    }
}

impl Default for NormalizedMesh {
    fn default() -> Self {
        Self::empty()
    }
}

/// Remap every vertex to `(v - center) * scale`.
///
/// Point-like or empty input keeps `scale == 1`.
pub fn normalize(vertices: &[Point3<f32>]) -> NormalizedMesh {
    let Some(bounds) = Bounds::from_points(vertices) else {
        return NormalizedMesh::empty();
    };

    let center = bounds.center();
    let extent = bounds.extent();
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };

    NormalizedMesh {
        vertices: vertices
            .iter()
            .map(|v| Point3::from((v - center) * scale))
            .collect(),
        center,
        scale,
    }
}
