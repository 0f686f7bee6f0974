/// Viewer configuration
use serde::{Deserialize, Serialize};

use crate::color::{Background, Rgb};

/// The only runtime knobs the viewer exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerConfig {
    /// Stroke color for edges
    pub wire_color: Rgb,
    /// Fill behind the wireframe, or transparent
    pub background_color: Background,
    /// Advance yaw every frame while the user is not dragging
    pub auto_rotate: bool,
}

impl ViewerConfig {
    pub const DEFAULT_WIRE_COLOR: Rgb = Rgb::new(0x22, 0x22, 0x22);
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            wire_color: Self::DEFAULT_WIRE_COLOR,
            background_color: Background::Transparent,
            auto_rotate: true,
        }
    }
}
