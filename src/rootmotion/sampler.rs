//! Transform Sampler
//!
//! Evaluates world-space transforms of the rig object and its bones at an
//! arbitrary frame. Sampling is a pure read: the frame is an explicit
//! argument and the clip is only borrowed immutably, so there is no scene
//! cursor to save or restore around a bake.

use glam::{Quat, Vec3};

use crate::animation::{AnimationClip, ChannelKey, ChannelTarget, CurveStore, Property};
use crate::errors::{BakeError, Result};
use crate::scene::{BoneHandle, Rig, Transform};

/// Capability to evaluate a node's world transform at a frame.
pub trait TransformSampler {
    fn world_transform(&self, node: &ChannelTarget, frame: f32) -> Result<Transform>;
}

/// Samples a rig through the curves of one clip.
///
/// Frames outside the clip's keyed range are clamped to the nearest keyed
/// frame; nothing is extrapolated.
#[derive(Debug, Clone, Copy)]
pub struct ClipSampler<'a> {
    rig: &'a Rig,
    clip: &'a AnimationClip,
    range: Option<(f32, f32)>,
}

impl<'a> ClipSampler<'a> {
    #[must_use]
    pub fn new(rig: &'a Rig, clip: &'a AnimationClip) -> Self {
        Self {
            rig,
            clip,
            range: clip.frame_range(),
        }
    }

    #[must_use]
    pub fn rig(&self) -> &'a Rig {
        self.rig
    }

    #[inline]
    fn clamp_frame(&self, frame: f32) -> f32 {
        match self.range {
            Some((start, end)) => frame.clamp(start, end),
            None => frame,
        }
    }

    pub fn bone_handle(&self, name: &str) -> Result<BoneHandle> {
        self.rig
            .skeleton
            .find(name)
            .ok_or_else(|| BakeError::UnknownBone(name.to_string()))
    }

    /// Rig object transform; object channels override the authored values.
    #[must_use]
    pub fn object_world(&self, frame: f32) -> Transform {
        evaluate_trs(
            self.clip,
            &ChannelTarget::Object,
            self.clamp_frame(frame),
            &self.rig.transform,
        )
    }

    /// Parent-relative transform of a bone: `bind ∘ pose(frame)`.
    pub fn bone_local(&self, handle: BoneHandle, frame: f32) -> Result<Transform> {
        let bone = self
            .rig
            .skeleton
            .bone(handle)
            .ok_or_else(|| BakeError::UnknownBone(format!("{handle:?}")))?;
        let pose = evaluate_trs(
            self.clip,
            &ChannelTarget::Bone(bone.name.clone()),
            self.clamp_frame(frame),
            &Transform::IDENTITY,
        );
        Ok(bone.bind.mul_transform(&pose))
    }

    /// World transform of a bone's parent space (the rig object for top-level bones).
    pub fn parent_world(&self, handle: BoneHandle, frame: f32) -> Result<Transform> {
        let chain = self.rig.skeleton.chain(handle)?;
        let mut world = self.object_world(frame);
        for &h in &chain[..chain.len() - 1] {
            world = world.mul_transform(&self.bone_local(h, frame)?);
        }
        Ok(world)
    }

    pub fn bone_world(&self, handle: BoneHandle, frame: f32) -> Result<Transform> {
        let parent = self.parent_world(handle, frame)?;
        Ok(parent.mul_transform(&self.bone_local(handle, frame)?))
    }
}

impl TransformSampler for ClipSampler<'_> {
    fn world_transform(&self, node: &ChannelTarget, frame: f32) -> Result<Transform> {
        match node {
            ChannelTarget::Object => Ok(self.object_world(frame)),
            ChannelTarget::Bone(name) => self.bone_world(self.bone_handle(name)?, frame),
        }
    }
}

/// Reads location/rotation/scale channels of `target`, falling back to
/// `defaults` for every component that has no curve.
pub fn evaluate_trs<S: CurveStore + ?Sized>(
    store: &S,
    target: &ChannelTarget,
    frame: f32,
    defaults: &Transform,
) -> Transform {
    let read = |property, index, fallback: f32| {
        store
            .sample_channel(&ChannelKey::new(target.clone(), property, index), frame)
            .unwrap_or(fallback)
    };

    let d = defaults;
    let position = Vec3::new(
        read(Property::Location, 0, d.position.x),
        read(Property::Location, 1, d.position.y),
        read(Property::Location, 2, d.position.z),
    );
    let scale = Vec3::new(
        read(Property::Scale, 0, d.scale.x),
        read(Property::Scale, 1, d.scale.y),
        read(Property::Scale, 2, d.scale.z),
    );
    // Storage order is w, x, y, z
    let raw = Quat::from_xyzw(
        read(Property::RotationQuaternion, 1, d.rotation.x),
        read(Property::RotationQuaternion, 2, d.rotation.y),
        read(Property::RotationQuaternion, 3, d.rotation.z),
        read(Property::RotationQuaternion, 0, d.rotation.w),
    );
    let rotation = if raw.length_squared() > 1e-12 {
        raw.normalize()
    } else {
        Quat::IDENTITY
    };

    Transform {
        position,
        rotation,
        scale,
    }
}
