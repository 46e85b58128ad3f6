//! Root/Residual Redistribution
//!
//! Splits the reference bone's motion into a root-target sequence and a
//! residual sequence whose composition reproduces the original world
//! transform, then writes each as dense keyframe curves.

use crate::animation::{AnimationClip, ChannelKey, ChannelTarget, CurveStore, Property};
use crate::errors::{BakeError, Result};
use crate::rootmotion::extract::{DeltaSequence, FrameRange, apply_world_delta};
use crate::rootmotion::sampler::ClipSampler;
use crate::scene::{BoneHandle, Rig, Transform};

/// Two synchronized world-space sequences over one frame range.
#[derive(Debug, Clone)]
pub struct Redistribution {
    pub range: FrameRange,
    /// Root target world transform per frame.
    pub root: Vec<Transform>,
    /// `root⁻¹ ∘ original` per frame.
    pub residual: Vec<Transform>,
    /// Reference bone world transform per frame before baking.
    pub original: Vec<Transform>,
}

impl Redistribution {
    /// `root(frame) ∘ residual(frame)`; equals `original(frame)` up to rounding.
    #[must_use]
    pub fn recomposed(&self, offset: usize) -> Option<Transform> {
        Some(self.root.get(offset)?.mul_transform(self.residual.get(offset)?))
    }
}

/// Places the masked deltas on the root baseline and derives the residual.
#[must_use]
pub fn redistribute(deltas: &DeltaSequence, baseline_root: &Transform) -> Redistribution {
    let root: Vec<Transform> = deltas
        .masked
        .iter()
        .map(|delta| apply_world_delta(baseline_root, delta))
        .collect();

    let residual = root
        .iter()
        .zip(&deltas.original)
        .map(|(r, original)| r.inverse().mul_transform(original))
        .collect();

    Redistribution {
        range: deltas.range,
        root,
        residual,
        original: deltas.original.clone(),
    }
}

/// Writes dense location/rotation/scale curves on `bone` so that its world
/// transform at each frame of `range` equals `worlds[frame - start]`.
///
/// Parent spaces are sampled from `clip` itself, so curves already written
/// on ancestors are taken into account. Existing keys of the bone inside the
/// range are replaced.
pub fn write_world_curves(
    rig: &Rig,
    clip: &mut AnimationClip,
    bone: BoneHandle,
    worlds: &[Transform],
    range: FrameRange,
) -> Result<()> {
    let name = rig
        .skeleton
        .bone(bone)
        .map(|b| b.name.clone())
        .ok_or_else(|| BakeError::UnknownBone(format!("{bone:?}")))?;

    // Resolve every pose against the current parent chain before mutating.
    let poses = {
        let sampler = ClipSampler::new(rig, clip);
        let bind = rig.skeleton.bone(bone).map(|b| b.bind).unwrap_or_default();
        range
            .frames()
            .zip(worlds)
            .map(|(frame, world)| {
                let parent = sampler.parent_world(bone, frame as f32)?;
                Ok(parent.mul_transform(&bind).inverse().mul_transform(world))
            })
            .collect::<Result<Vec<Transform>>>()?
    };

    let target = ChannelTarget::Bone(name);
    clear_transform_keys(clip, &target, range);
    for (frame, pose) in range.frames().zip(&poses) {
        write_transform_keys(clip, &target, frame as f32, pose);
    }

    log::debug!(
        "Wrote {} frames of curves on {target:?}",
        poses.len()
    );
    Ok(())
}

/// Writes dense curves on the rig object. Object channels are absolute, so
/// each world transform is keyed as is.
pub fn write_object_curves(clip: &mut AnimationClip, worlds: &[Transform], range: FrameRange) {
    let target = ChannelTarget::Object;
    clear_transform_keys(clip, &target, range);
    for (frame, world) in range.frames().zip(worlds) {
        write_transform_keys(clip, &target, frame as f32, world);
    }
    log::debug!("Wrote {} frames of object curves", worlds.len().min(range.len()));
}

fn clear_transform_keys(clip: &mut AnimationClip, target: &ChannelTarget, range: FrameRange) {
    for property in [Property::Location, Property::RotationQuaternion, Property::Scale] {
        for key in ChannelKey::components(target, property) {
            if let Some(channel) = clip.channel_mut(&key) {
                channel.remove_range(range.start as f32, range.end as f32);
            }
        }
    }
}

/// Writes the ten TRS components of `t` at `frame` (rotation as w, x, y, z).
pub fn write_transform_keys<S: CurveStore + ?Sized>(
    store: &mut S,
    target: &ChannelTarget,
    frame: f32,
    t: &Transform,
) {
    let key = |property, index| ChannelKey::new(target.clone(), property, index);
    for i in 0..3 {
        store.write_keyframe(&key(Property::Location, i), frame, t.position[i]);
        store.write_keyframe(&key(Property::Scale, i), frame, t.scale[i]);
    }
    let q = t.rotation;
    for (i, v) in [q.w, q.x, q.y, q.z].into_iter().enumerate() {
        store.write_keyframe(&key(Property::RotationQuaternion, i), frame, v);
    }
}
