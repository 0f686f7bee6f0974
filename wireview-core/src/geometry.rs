/// Geometry primitives for wireframe rendering
use nalgebra::{Point3, Vector3};

/// An ordered loop of 0-based vertex indices.
///
/// Indices are kept exactly as parsed, so they may be negative or past the
/// end of the vertex list. They are validated when the face is drawn.
pub type Face = Vec<isize>;

/// A polygon mesh: vertex positions plus face connectivity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) {
        self.vertices.push(Point3::new(x, y, z));
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Resolve a face into `out` as checked `usize` indices.
    ///
    /// Returns `false` (leaving `out` in an unspecified state) when any index
    /// falls outside `[0, vertices.len())`.
    pub fn resolve_face(&self, face: &[isize], out: &mut Vec<usize>) -> bool {
        out.clear();
        for &index in face {
            match usize::try_from(index) {
                Ok(i) if i < self.vertices.len() => out.push(i),
                _ => return false,
            }
        }
        true
    }

    /// Create a cube centred on the origin with quad faces
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 6);

        for &(x, y, z) in &[
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
        ] {
            mesh.add_vertex(x, y, z);
        }

        // Back, front, bottom, top, left, right
        mesh.add_face(vec![0, 3, 2, 1]);
        mesh.add_face(vec![4, 5, 6, 7]);
        mesh.add_face(vec![0, 1, 5, 4]);
        mesh.add_face(vec![3, 7, 6, 2]);
        mesh.add_face(vec![0, 4, 7, 3]);
        mesh.add_face(vec![1, 2, 6, 5]);

        mesh
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    /// Bounds of a point set, or `None` when it is empty
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let first = *points.first()?;
        let bounds = points.iter().skip(1).fold(
            Self {
                min: first,
                max: first,
            },
            |acc, p| Self {
                min: acc.min.inf(p),
                max: acc.max.sup(p),
            },
        );
        Some(bounds)
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis spans
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// The largest of the three axis spans
    pub fn extent(&self) -> f32 {
        self.size().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_topology() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 6);
        assert!(cube.faces.iter().all(|f| f.len() == 4));
        assert!(cube.faces.iter().flatten().all(|&i| (0..8).contains(&i)));
    }

    #[test]
    fn test_resolve_face_rejects_out_of_range() {
        let cube = Mesh::cube(1.0);
        let mut out = Vec::new();

        assert!(cube.resolve_face(&[0, 1, 2], &mut out));
        assert_eq!(out, vec![0, 1, 2]);

        assert!(!cube.resolve_face(&[0, 8, 2], &mut out));
        assert!(!cube.resolve_face(&[-1, 1, 2], &mut out));
    }

    #[test]
    fn test_bounds() {
        let points = [
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 2.5),
            Point3::new(0.0, 1.0, 3.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, 2.0));
        assert_eq!(bounds.max, Point3::new(3.0, 1.0, 3.0));
        assert_eq!(bounds.center(), Point3::new(1.0, -0.5, 2.5));
        assert_eq!(bounds.extent(), 4.0);

        assert!(Bounds::from_points(&[]).is_none());
    }
}
