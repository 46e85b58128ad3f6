use glam::{Affine3A, Quat, Vec3};

/// Transform value
///
/// Translation, rotation and scale (TRS) of a node. Used both for
/// parent-relative (local) poses and for world-space samples.
///
/// Composition follows the affine convention: `parent.mul_transform(&child)`
/// applies `child` first, then `parent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_translation_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    // ========================================================================
    // Matrix conversion
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decomposes an affine matrix back into TRS.
    ///
    /// Shear cannot be represented and is lost.
    #[must_use]
    pub fn from_affine(mat: Affine3A) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Returns `self ∘ child` (child expressed in this transform's space).
    #[must_use]
    pub fn mul_transform(&self, child: &Transform) -> Self {
        Self::from_affine(self.to_affine() * child.to_affine())
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_affine(self.to_affine().inverse())
    }

    /// Approximate equality; `q` and `-q` are treated as the same rotation.
    #[must_use]
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && (1.0 - self.rotation.dot(other.rotation).abs()) <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
