use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// World axis treated as "up" for ground clamping and heading extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpAxis {
    X,
    Y,
    #[default]
    Z,
}

impl UpAxis {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    #[inline]
    #[must_use]
    pub fn vector(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Where extracted root motion is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RootMotionType {
    /// The rig object's own location/rotation/scale channels.
    Object,
    /// The bone named by [`BakeRequest::root_target`].
    #[default]
    Bone,
}

/// Parameters of one root motion bake. Immutable for the duration of a bake.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust,ignore
/// let req = BakeRequest::from_json(r#"{ "reference_bone": "pelvis", "on_ground": false }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeRequest {
    /// Bone whose motion is split into root + residual (usually the hips).
    pub reference_bone: String,
    /// Bone that receives the extracted root motion; unused in object mode.
    pub root_target: String,
    pub root_motion_type: RootMotionType,
    /// Per-axis translation enable flags (x, y, z).
    pub use_translation: [bool; 3],
    /// Extract heading (rotation about the up axis).
    pub use_rotation: bool,
    /// Never let root motion go below its baseline height.
    pub on_ground: bool,
    /// Measure deltas against the bind pose instead of the start frame pose.
    pub use_rest_pose: bool,
    pub start_frame: i32,
    /// Last frame to bake; defaults to the clip's last keyed frame.
    pub end_frame: Option<i32>,
    pub up_axis: UpAxis,
}

impl Default for BakeRequest {
    fn default() -> Self {
        Self {
            reference_bone: "Hips".to_string(),
            root_target: "Root".to_string(),
            root_motion_type: RootMotionType::Bone,
            use_translation: [true, true, true],
            use_rotation: true,
            on_ground: true,
            use_rest_pose: true,
            start_frame: 1,
            end_frame: None,
            up_axis: UpAxis::Z,
        }
    }
}

impl BakeRequest {
    #[must_use]
    pub fn new(reference_bone: &str, root_target: &str) -> Self {
        Self {
            reference_bone: reference_bone.to_string(),
            root_target: root_target.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_root_motion_type(mut self, root_motion_type: RootMotionType) -> Self {
        self.root_motion_type = root_motion_type;
        self
    }

    #[must_use]
    pub fn with_translation(mut self, x: bool, y: bool, z: bool) -> Self {
        self.use_translation = [x, y, z];
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.use_rotation = enabled;
        self
    }

    #[must_use]
    pub fn with_ground_clamp(mut self, enabled: bool) -> Self {
        self.on_ground = enabled;
        self
    }

    #[must_use]
    pub fn with_rest_pose(mut self, enabled: bool) -> Self {
        self.use_rest_pose = enabled;
        self
    }

    #[must_use]
    pub fn with_frames(mut self, start: i32, end: Option<i32>) -> Self {
        self.start_frame = start;
        self.end_frame = end;
        self
    }

    #[must_use]
    pub fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// True when at least one translation axis or rotation is enabled.
    #[must_use]
    pub fn extracts_anything(&self) -> bool {
        self.use_translation.iter().any(|&on| on) || self.use_rotation
    }
}

/// Toggles for the quaternion continuity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityOptions {
    /// Negate samples whose difference to the previous one is close to 180°.
    pub prevent_flips: bool,
    /// Negate samples that jump to the antipodal encoding.
    pub prevent_inverts: bool,
}

impl Default for ContinuityOptions {
    fn default() -> Self {
        Self {
            prevent_flips: true,
            prevent_inverts: true,
        }
    }
}
