/// Pointer-driven rotation
use crate::transform::RotationState;

/// Radians of rotation per logical unit of pointer travel
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Drag state machine.
///
/// Horizontal travel turns yaw, vertical travel turns pitch. There is no
/// momentum once the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging { last_x: f32, last_y: f32 },
}

impl Interaction {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Interaction::Dragging { .. })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        *self = Interaction::Dragging {
            last_x: x,
            last_y: y,
        };
    }

    /// Apply the travel since the last recorded position. No-op when idle.
    pub fn pointer_move(&mut self, x: f32, y: f32, rotation: &mut RotationState) {
        if let Interaction::Dragging { last_x, last_y } = self {
            rotation.rotate((y - *last_y) * DRAG_SENSITIVITY, (x - *last_x) * DRAG_SENSITIVITY);
            *last_x = x;
            *last_y = y;
        }
    }

    pub fn pointer_up(&mut self) {
        *self = Interaction::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut interaction = Interaction::default();
        let mut rotation = RotationState::zero();
        interaction.pointer_move(40.0, 40.0, &mut rotation);
        assert_eq!(rotation, RotationState::zero());
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_drag_accumulates_relative_to_last_position() {
        let mut interaction = Interaction::default();
        let mut rotation = RotationState::zero();

        interaction.pointer_down(100.0, 100.0);
        assert!(interaction.is_dragging());
        interaction.pointer_move(120.0, 90.0, &mut rotation);
        interaction.pointer_move(150.0, 110.0, &mut rotation);
        interaction.pointer_up();

        assert_relative_eq!(rotation.yaw, 50.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
        assert_relative_eq!(rotation.pitch, 10.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
        assert!(!interaction.is_dragging());

        interaction.pointer_move(500.0, 500.0, &mut rotation);
        assert_relative_eq!(rotation.yaw, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_pointer_down_restarts_from_new_position() {
        let mut interaction = Interaction::default();
        let mut rotation = RotationState::zero();

        interaction.pointer_down(0.0, 0.0);
        interaction.pointer_up();
        interaction.pointer_down(300.0, 0.0);
        interaction.pointer_move(310.0, 0.0, &mut rotation);

        assert_relative_eq!(rotation.yaw, 10.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
    }
}
