/// Rotation state and the per-vertex model rotation
use nalgebra::{Point3, Rotation3, Vector3};

/// Orientation of the model (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Rotation about the horizontal (x) axis
    pub pitch: f32,
    /// Rotation about the vertical (y) axis
    pub yaw: f32,
}

impl RotationState {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    pub fn zero() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dpitch: f32, dyaw: f32) {
        self.pitch += dpitch;
        self.yaw += dyaw;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

pub struct Transform;

impl Transform {
    /// Yaw about the vertical axis first, then pitch about the horizontal
    /// axis. Swapping the two changes the picture.
    pub fn rotation(rotation: &RotationState) -> Rotation3<f32> {
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.pitch);
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.yaw);

        pitch * yaw
    }

    pub fn apply(rotation: &RotationState, point: &Point3<f32>) -> Point3<f32> {
        Self::rotation(rotation) * point
    }
}
