use glam::{Quat, Vec3};

use crate::rootmotion::settings::{BakeRequest, UpAxis};
use crate::scene::Transform;

/// Axis and rotation mask applied to raw deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMask {
    pub translation: [bool; 3],
    pub rotation: bool,
    pub ground_clamp: bool,
    pub up_axis: UpAxis,
}

impl AxisMask {
    #[must_use]
    pub fn from_request(request: &BakeRequest) -> Self {
        Self {
            translation: request.use_translation,
            rotation: request.use_rotation,
            ground_clamp: request.on_ground,
            up_axis: request.up_axis,
        }
    }

    /// Mask with every axis disabled; the root never moves.
    #[must_use]
    pub fn none(up_axis: UpAxis) -> Self {
        Self {
            translation: [false; 3],
            rotation: false,
            ground_clamp: false,
            up_axis,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.rotation && self.translation.iter().all(|on| !on)
    }

    /// Zeroes disabled axes, then clamps a negative up delta to zero when
    /// ground clamping is on.
    #[must_use]
    pub fn mask_translation(&self, delta: Vec3) -> Vec3 {
        let mut out = delta;
        for axis in 0..3 {
            if !self.translation[axis] {
                out[axis] = 0.0;
            }
        }
        let up = self.up_axis.index();
        if self.ground_clamp && self.translation[up] && out[up] < 0.0 {
            out[up] = 0.0;
        }
        out
    }

    /// Keeps only the twist about the up axis, or identity when disabled.
    #[must_use]
    pub fn mask_rotation(&self, delta: Quat) -> Quat {
        if self.rotation {
            twist(delta, self.up_axis.vector())
        } else {
            Quat::IDENTITY
        }
    }

    /// Masks a full delta transform. Scale never carries over.
    #[must_use]
    pub fn apply(&self, delta: &Transform) -> Transform {
        Transform::from_translation_rotation(
            self.mask_translation(delta.position),
            self.mask_rotation(delta.rotation),
        )
    }
}

/// Swing-twist decomposition: the rotation component of `q` about `axis`.
///
/// `axis` must be normalized. A pure 180° swing has no defined twist and
/// yields identity.
#[must_use]
pub fn twist(q: Quat, axis: Vec3) -> Quat {
    let projected = axis * axis.dot(Vec3::new(q.x, q.y, q.z));
    let t = Quat::from_xyzw(projected.x, projected.y, projected.z, q.w);
    if t.length_squared() < 1e-12 {
        Quat::IDENTITY
    } else {
        t.normalize()
    }
}
