/// wireview core - host-agnostic wireframe mesh viewer
///
/// Parses OBJ vertex/face data, fits it into a unit frame, rotates and
/// projects it through a fixed perspective camera, and strokes the faces
/// onto any [`Surface`]. Hosts supply the surface, the frame clock, pointer
/// events and the actual fetching of mesh text.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod loader;
pub mod normalize;
pub mod obj;
pub mod projection;
pub mod surface;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use color::{Background, Rgb};
pub use config::ViewerConfig;
pub use error::{ColorError, LoadError};
pub use geometry::{Bounds, Face, Mesh};
pub use interaction::{Interaction, DRAG_SENSITIVITY};
pub use loader::{GenerationToken, LoadCompletion, LoadProtocol, LoadRequest, LoadStatus};
pub use normalize::{normalize, NormalizedMesh};
pub use obj::{parse_obj, parse_obj_with_report, ParseReport};
pub use projection::{Camera, Projector, Viewport};
pub use surface::{RecordingSurface, Stroke, Surface};
pub use transform::{RotationState, Transform};
pub use viewer::{FrameStats, LoadOutcome, Viewer, AUTO_ROTATE_STEP, INITIAL_ROTATION};
