/// The viewer instance: owns every piece of per-instance state and turns it
/// into one frame of strokes at a time.
///
/// Hosts drive it from a single thread: they call [`Viewer::frame`] once per
/// display tick, forward pointer events as they arrive, and hand back load
/// results tagged with the token from [`Viewer::request_load`].

use nalgebra::Point2;

use crate::config::ViewerConfig;
use crate::geometry::Mesh;
use crate::interaction::Interaction;
use crate::loader::{LoadCompletion, LoadProtocol, LoadRequest, LoadStatus};
use crate::normalize::{normalize, NormalizedMesh};
use crate::obj::{parse_obj_with_report, ParseReport};
use crate::projection::{Camera, Viewport};
use crate::surface::Surface;
use crate::transform::{RotationState, Transform};

/// Yaw advance per frame while auto-rotating
pub const AUTO_ROTATE_STEP: f32 = 0.01;

/// Pose shown before any interaction
pub const INITIAL_ROTATION: RotationState = RotationState {
    pitch: -0.3,
    yaw: 0.6,
};

/// What a single frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub resized: bool,
    pub faces_drawn: usize,
    /// Faces with fewer than two vertices or an out-of-range index
    pub faces_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { vertices: usize, faces: usize },
    /// A newer request was made after this one; the result was dropped
    Stale,
    /// The fetch failed; the previous mesh is kept
    Failed,
}

#[derive(Debug)]
struct ActiveMesh {
    mesh: Mesh,
    normalized: NormalizedMesh,
}

#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    camera: Camera,
    rotation: RotationState,
    interaction: Interaction,
    loads: LoadProtocol,
    status: LoadStatus,
    source: Option<String>,
    active: Option<ActiveMesh>,
    report: ParseReport,
    // Per-frame scratch, kept to avoid reallocating every frame
    projected: Vec<Point2<f32>>,
    face_indices: Vec<usize>,
    face_points: Vec<Point2<f32>>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            camera: Camera::default(),
            rotation: INITIAL_ROTATION,
            interaction: Interaction::default(),
            loads: LoadProtocol::new(),
            status: LoadStatus::Idle,
            source: None,
            active: None,
            report: ParseReport::default(),
            projected: Vec::new(),
            face_indices: Vec::new(),
            face_points: Vec::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// The most recently requested source, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.active.as_ref().map(|active| &active.mesh)
    }

    pub fn normalized(&self) -> Option<&NormalizedMesh> {
        self.active.as_ref().map(|active| &active.normalized)
    }

    /// Parse report of the mesh currently shown
    pub fn parse_report(&self) -> &ParseReport {
        &self.report
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.interaction.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.interaction.pointer_move(x, y, &mut self.rotation);
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    /// Start loading `source`. Any load still in flight becomes stale.
    pub fn request_load(&mut self, source: impl Into<String>) -> LoadRequest {
        let request = self.loads.begin(source);
        log::debug!("requesting mesh {} ({})", request.source, request.token);
        self.source = Some(request.source.clone());
        self.status = LoadStatus::Loading;
        request
    }

    /// Request the current source again
    pub fn reload(&mut self) -> Option<LoadRequest> {
        let source = self.source.clone()?;
        Some(self.request_load(source))
    }

    pub fn complete_load(&mut self, completion: LoadCompletion) -> LoadOutcome {
        if !self.loads.is_current(completion.token) {
            log::debug!("discarding stale mesh load {}", completion.token);
            return LoadOutcome::Stale;
        }

        match completion.result {
            Ok(text) => {
                let (mesh, report) = parse_obj_with_report(&text);
                let outcome = LoadOutcome::Applied {
                    vertices: mesh.vertices.len(),
                    faces: mesh.faces.len(),
                };
                self.install(mesh, report);
                outcome
            }
            Err(err) => {
                log::warn!("mesh load failed: {err}");
                self.status = LoadStatus::Failed(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Show `mesh` right away, superseding any pending load
    pub fn show_mesh(&mut self, mesh: Mesh) {
        self.loads.invalidate();
        self.install(mesh, ParseReport::default());
    }

    fn install(&mut self, mesh: Mesh, report: ParseReport) {
        log::info!(
            "showing mesh with {} vertices and {} faces",
            mesh.vertices.len(),
            mesh.faces.len()
        );
        if report.is_degraded() {
            log::warn!(
                "{} malformed OBJ lines were skipped",
                report.skipped_lines.len()
            );
        }

        let normalized = normalize(&mesh.vertices);
        self.active = Some(ActiveMesh { mesh, normalized });
        self.report = report;
        self.status = LoadStatus::Ready;
    }

    /// Draw one frame
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        let mut stats = FrameStats::default();

        let (width, height) = surface.container_size();
        let backing = device_size(width, height, surface.pixel_ratio());
        if surface.backing_size() != backing {
            surface.resize_backing(backing.0, backing.1);
            stats.resized = true;
        }

        surface.clear(self.config.background_color);

        if self.config.auto_rotate && !self.interaction.is_dragging() {
            self.rotation.yaw += AUTO_ROTATE_STEP;
        }

        let viewport = Viewport::new(width, height);
        let Self {
            config,
            camera,
            rotation,
            active,
            projected,
            face_indices,
            face_points,
            ..
        } = self;
        let Some(active) = active.as_ref() else {
            return stats;
        };
        if !viewport.has_area() {
            return stats;
        }

        let model = Transform::rotation(rotation);
        let projector = camera.projector(viewport.aspect());
        projected.clear();
        projected.extend(
            active
                .normalized
                .vertices
                .iter()
                .map(|v| viewport.to_screen(&projector.project(&(model * v)))),
        );

        for face in &active.mesh.faces {
            if face.len() < 2 || !active.mesh.resolve_face(face, face_indices) {
                stats.faces_skipped += 1;
                continue;
            }
            face_points.clear();
            face_points.extend(face_indices.iter().map(|&i| projected[i]));
            surface.stroke_closed(face_points, config.wire_color);
            stats.faces_drawn += 1;
        }

        stats
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

/// Backing store size for a container, in whole device pixels
fn device_size(width: f32, height: f32, pixel_ratio: f32) -> (u32, u32) {
    (
        (width * pixel_ratio).floor() as u32,
        (height * pixel_ratio).floor() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Background, Rgb};
    use crate::error::LoadError;
    use crate::surface::RecordingSurface;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn loaded(text: &str) -> Viewer {
        let mut viewer = Viewer::default();
        let request = viewer.request_load("mesh.obj");
        viewer.complete_load(LoadCompletion::new(&request, Ok(text.to_string())));
        viewer
    }

    #[test]
    fn test_backing_follows_container_and_pixel_ratio() {
        let mut viewer = Viewer::default();
        let mut surface = RecordingSurface::with_pixel_ratio(200.5, 100.0, 2.0);

        assert!(viewer.frame(&mut surface).resized);
        assert_eq!(surface.backing, (401, 200));

        assert!(!viewer.frame(&mut surface).resized);
        assert_eq!(surface.resizes, 1);

        surface.container = (50.0, 50.0);
        assert!(viewer.frame(&mut surface).resized);
        assert_eq!(surface.backing, (100, 100));
    }

    #[test]
    fn test_clear_uses_configured_background() {
        let config = ViewerConfig {
            background_color: Background::Color(Rgb(1, 2, 3)),
            ..ViewerConfig::default()
        };
        let mut viewer = Viewer::new(config);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        viewer.frame(&mut surface);
        assert_eq!(surface.last_clear, Some(Background::Color(Rgb(1, 2, 3))));
    }

    #[test]
    fn test_empty_viewer_draws_nothing() {
        let mut viewer = Viewer::default();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let stats = viewer.frame(&mut surface);
        assert_eq!(stats.faces_drawn, 0);
        assert!(surface.strokes.is_empty());
        assert_eq!(surface.last_clear, Some(Background::Transparent));
    }

    #[test]
    fn test_triangle_draws_one_closed_stroke() {
        let mut viewer = loaded(TRIANGLE);
        let mut surface = RecordingSurface::new(400.0, 300.0);
        let stats = viewer.frame(&mut surface);

        assert_eq!(stats.faces_drawn, 1);
        assert_eq!(surface.strokes.len(), 1);
        assert_eq!(surface.strokes[0].points.len(), 3);
        assert_eq!(surface.strokes[0].color, ViewerConfig::DEFAULT_WIRE_COLOR);

        let normalized = viewer.normalized().unwrap();
        assert_eq!(normalized.vertices.len(), 3);
        assert_relative_eq!(normalized.scale, 1.0);
    }

    #[test]
    fn test_bad_faces_are_skipped() {
        let mut viewer = loaded("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\nf 1 2 3\nf -1 1 2\n");
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let stats = viewer.frame(&mut surface);
        assert_eq!(stats.faces_drawn, 1);
        assert_eq!(stats.faces_skipped, 2);
    }

    #[test]
    fn test_two_vertex_face_is_drawable() {
        let mut viewer = Viewer::default();
        let mut mesh = Mesh::new();
        mesh.add_vertex(0.0, 0.0, 0.0);
        mesh.add_vertex(1.0, 1.0, 1.0);
        mesh.add_face(vec![0, 1]);
        mesh.add_face(vec![1]);
        viewer.show_mesh(mesh);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        let stats = viewer.frame(&mut surface);
        assert_eq!(stats.faces_drawn, 1);
        assert_eq!(stats.faces_skipped, 1);
        assert_eq!(surface.strokes[0].points.len(), 2);
    }

    #[test]
    fn test_zero_area_container_draws_nothing() {
        let mut viewer = loaded(TRIANGLE);
        let mut surface = RecordingSurface::new(0.0, 0.0);
        let stats = viewer.frame(&mut surface);
        assert_eq!(stats.faces_drawn, 0);
        assert_eq!(surface.backing, (0, 0));
    }

    #[test]
    fn test_auto_rotate_advances_yaw() {
        let mut viewer = Viewer::default();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        viewer.frame(&mut surface);
        viewer.frame(&mut surface);
        assert_relative_eq!(
            viewer.rotation().yaw,
            INITIAL_ROTATION.yaw + 2.0 * AUTO_ROTATE_STEP,
            epsilon = 1e-6
        );
        assert_eq!(viewer.rotation().pitch, INITIAL_ROTATION.pitch);
    }

    #[test]
    fn test_auto_rotate_can_be_disabled() {
        let mut viewer = Viewer::new(ViewerConfig {
            auto_rotate: false,
            ..ViewerConfig::default()
        });
        let mut surface = RecordingSurface::new(10.0, 10.0);
        viewer.frame(&mut surface);
        assert_eq!(viewer.rotation(), INITIAL_ROTATION);
        assert!(!viewer.config().auto_rotate);
    }

    #[test]
    fn test_failed_load_keeps_previous_mesh() {
        let mut viewer = loaded(TRIANGLE);
        let request = viewer.request_load("missing.obj");
        let error = LoadError::Status {
            reference: "missing.obj".into(),
            status: 404,
        };

        assert_eq!(
            viewer.complete_load(LoadCompletion::new(&request, Err(error))),
            LoadOutcome::Failed
        );
        assert_eq!(viewer.mesh().map(|m| m.vertices.len()), Some(3));
        assert!(matches!(viewer.status(), LoadStatus::Failed(msg) if msg.contains("404")));
    }

    #[test]
    fn test_show_mesh_supersedes_pending_load() {
        let mut viewer = Viewer::default();
        let request = viewer.request_load("slow.obj");
        viewer.show_mesh(Mesh::cube(1.0));

        let outcome = viewer.complete_load(LoadCompletion::new(&request, Ok(TRIANGLE.into())));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(viewer.mesh().map(|m| m.vertices.len()), Some(8));
    }

    #[test]
    fn test_reload_reuses_source() {
        let mut viewer = Viewer::default();
        assert!(viewer.reload().is_none());

        let first = viewer.request_load("a.obj");
        let again = viewer.reload().unwrap();
        assert_eq!(again.source, "a.obj");
        assert!(again.token > first.token);
        assert_eq!(viewer.status(), &LoadStatus::Loading);
    }

    #[test]
    fn test_degraded_parse_is_reported() {
        let viewer = loaded("v 0 0 0\nv 1 oops\nf 1 1 1\n");
        assert!(viewer.parse_report().is_degraded());
        assert_eq!(viewer.parse_report().skipped_lines, vec![2]);
        assert_eq!(viewer.status(), &LoadStatus::Ready);
    }
}
