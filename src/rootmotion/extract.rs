use crate::animation::{AnimationClip, ChannelTarget};
use crate::errors::{BakeError, Result};
use crate::rootmotion::mask::AxisMask;
use crate::rootmotion::sampler::TransformSampler;
use crate::rootmotion::settings::BakeRequest;
use crate::scene::Transform;

/// Widest window a single bake accepts.
pub const MAX_BAKE_FRAMES: i64 = 1 << 20;

/// Inclusive integer frame window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    /// Returns `None` when `end < start`.
    #[must_use]
    pub fn new(start: i32, end: i32) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Bake window for `clip`: the request's start frame up to its end frame,
    /// or to the clip's last keyed frame when no end is given.
    ///
    /// Windows wider than [`MAX_BAKE_FRAMES`] are rejected.
    pub fn resolve(clip: &AnimationClip, request: &BakeRequest) -> Result<Self> {
        let start = request.start_frame;
        let empty = |end| BakeError::EmptyFrameRange {
            clip: clip.name.clone(),
            start,
            end,
        };
        let (_, clip_end) = clip
            .frame_range()
            .ok_or_else(|| empty(start.saturating_sub(1)))?;
        let end = request.end_frame.unwrap_or(clip_end.floor() as i32);
        let range = Self::new(start, end).ok_or_else(|| empty(end))?;

        if range.width() > MAX_BAKE_FRAMES {
            return Err(BakeError::FrameRangeTooLarge {
                clip: clip.name.clone(),
                start,
                end,
            });
        }
        Ok(range)
    }

    /// Frame count as `i64`; cannot overflow for any pair of `i32` bounds.
    #[inline]
    fn width(&self) -> i64 {
        (i64::from(self.end) - i64::from(self.start) + 1).max(0)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.width()).unwrap_or(usize::MAX)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn frames(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Reference transform that per-frame deltas are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// Fixed transform, typically the reference bone's bind pose in world space.
    RestPose(Transform),
    /// The reference bone's sampled transform at the first frame of the range.
    StartFrame,
}

/// Per-frame output of the extractor, indexed from `range.start`.
#[derive(Debug, Clone)]
pub struct DeltaSequence {
    pub range: FrameRange,
    pub baseline: Transform,
    /// World transform of the reference bone before baking.
    pub original: Vec<Transform>,
    /// Masked and clamped delta of the reference bone against `baseline`.
    pub masked: Vec<Transform>,
}

/// Delta from `baseline` to `sample`, expressed along world axes.
#[must_use]
pub fn world_delta(baseline: &Transform, sample: &Transform) -> Transform {
    Transform::from_translation_rotation(
        sample.position - baseline.position,
        (sample.rotation * baseline.rotation.inverse()).normalize(),
    )
}

/// Applies a world-axis delta on top of `base`; inverse of [`world_delta`].
#[must_use]
pub fn apply_world_delta(base: &Transform, delta: &Transform) -> Transform {
    Transform {
        position: base.position + delta.position,
        rotation: (delta.rotation * base.rotation).normalize(),
        scale: base.scale,
    }
}

/// Walks `range` and emits the masked delta of `reference` at every frame.
///
/// A motionless reference still yields a full sequence of identity deltas.
pub fn extract_deltas<S: TransformSampler + ?Sized>(
    sampler: &S,
    reference: &ChannelTarget,
    baseline: Baseline,
    mask: &AxisMask,
    range: FrameRange,
) -> Result<DeltaSequence> {
    let baseline = match baseline {
        Baseline::RestPose(t) => t,
        Baseline::StartFrame => sampler.world_transform(reference, range.start as f32)?,
    };

    let mut original = Vec::with_capacity(range.len());
    let mut masked = Vec::with_capacity(range.len());
    for frame in range.frames() {
        let sample = sampler.world_transform(reference, frame as f32)?;
        masked.push(mask.apply(&world_delta(&baseline, &sample)));
        original.push(sample);
    }

    log::debug!(
        "Extracted {} deltas for {reference:?} over [{}, {}]",
        masked.len(),
        range.start,
        range.end
    );

    Ok(DeltaSequence {
        range,
        baseline,
        original,
        masked,
    })
}
