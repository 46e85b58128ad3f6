//! Bake Orchestrator
//!
//! Runs extraction, redistribution and continuity correction for one clip,
//! as a small state machine:
//!
//! ```text
//! Unprocessed ──(already baked / not eligible)──▶ Skipped
//!      │
//!      ├──(any step fails)──▶ Failed   (clip untouched)
//!      │
//!      └──(all steps succeed, commit)──▶ Baked
//! ```
//!
//! All curves are staged in a private copy of the clip and committed in one
//! swap, so a clip never ends up with only one of the two target curve sets.

use crate::animation::{AnimationClip, ChannelTarget};
use crate::errors::{BakeError, Result};
use crate::rootmotion::continuity::{ContinuityReport, correct_rotation_curves};
use crate::rootmotion::extract::{Baseline, FrameRange, extract_deltas};
use crate::rootmotion::mask::AxisMask;
use crate::rootmotion::redistribute::{
    Redistribution, redistribute, write_object_curves, write_world_curves,
};
use crate::rootmotion::sampler::ClipSampler;
use crate::rootmotion::settings::{BakeRequest, ContinuityOptions, RootMotionType};
use crate::rootmotion::staging::StagedClip;
use crate::scene::{BoneHandle, Rig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeState {
    Unprocessed,
    Baked,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The clip already carries the `root_motion_applied` marker.
    AlreadyBaked,
    /// The clip is not marked `eligible_for_root_motion`.
    NotEligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakeSummary {
    pub range: FrameRange,
    pub root_corrections: ContinuityReport,
    pub reference_corrections: ContinuityReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeOutcome {
    Baked(BakeSummary),
    Skipped(SkipReason),
}

/// Node that receives root motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootNode {
    Object,
    Bone(BoneHandle),
}

/// Result of one clip inside a batch.
#[derive(Debug)]
pub struct ClipReport {
    pub clip: String,
    pub result: Result<BakeOutcome>,
}

impl ClipReport {
    #[must_use]
    pub fn state(&self) -> BakeState {
        match &self.result {
            Ok(BakeOutcome::Baked(_)) => BakeState::Baked,
            Ok(BakeOutcome::Skipped(_)) => BakeState::Skipped,
            Err(_) => BakeState::Failed,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub clips: Vec<ClipReport>,
}

impl BatchReport {
    fn names_in(&self, state: BakeState) -> Vec<&str> {
        self.clips
            .iter()
            .filter(|r| r.state() == state)
            .map(|r| r.clip.as_str())
            .collect()
    }

    #[must_use]
    pub fn baked(&self) -> Vec<&str> {
        self.names_in(BakeState::Baked)
    }

    #[must_use]
    pub fn skipped(&self) -> Vec<&str> {
        self.names_in(BakeState::Skipped)
    }

    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.names_in(BakeState::Failed)
    }

    /// Every per-clip error, paired with its clip name.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &BakeError)> {
        self.clips.iter().filter_map(|r| match &r.result {
            Err(e) => Some((r.clip.as_str(), e)),
            Ok(_) => None,
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.clips.iter().all(|r| r.result.is_ok())
    }
}

/// Bakes root motion for clips played on one rig.
///
/// The rig is only read; every write goes to the clip being baked.
#[derive(Debug, Clone)]
pub struct RootMotionBaker<'a> {
    rig: &'a Rig,
    request: BakeRequest,
    continuity: ContinuityOptions,
}

impl<'a> RootMotionBaker<'a> {
    #[must_use]
    pub fn new(rig: &'a Rig, request: BakeRequest) -> Self {
        Self {
            rig,
            request,
            continuity: ContinuityOptions::default(),
        }
    }

    #[must_use]
    pub fn with_continuity(mut self, options: ContinuityOptions) -> Self {
        self.continuity = options;
        self
    }

    #[must_use]
    pub fn request(&self) -> &BakeRequest {
        &self.request
    }

    fn resolve_targets(&self) -> Result<(BoneHandle, RootNode)> {
        let skeleton = &self.rig.skeleton;
        let reference = skeleton
            .find(&self.request.reference_bone)
            .ok_or_else(|| BakeError::MissingReferenceBone(self.request.reference_bone.clone()))?;
        if self.request.root_motion_type == RootMotionType::Object {
            return Ok((reference, RootNode::Object));
        }

        let root = skeleton
            .find(&self.request.root_target)
            .ok_or_else(|| BakeError::MissingRootTarget(self.request.root_target.clone()))?;
        if !skeleton.is_ancestor(root, reference) {
            log::warn!(
                "Root target '{}' is not an ancestor of '{}'; root motion will not move it",
                self.request.root_target,
                self.request.reference_bone
            );
        }
        Ok((reference, RootNode::Bone(root)))
    }

    fn root_channel_target(&self, root: RootNode) -> ChannelTarget {
        match root {
            RootNode::Object => ChannelTarget::Object,
            RootNode::Bone(_) => ChannelTarget::Bone(self.request.root_target.clone()),
        }
    }

    /// Computes the root and residual sequences without touching the clip.
    pub fn plan(&self, clip: &AnimationClip) -> Result<Redistribution> {
        let (reference, root) = self.resolve_targets()?;
        let range = FrameRange::resolve(clip, &self.request)?;
        self.plan_with(clip, reference, root, range)
    }

    fn plan_with(
        &self,
        clip: &AnimationClip,
        reference: BoneHandle,
        root: RootNode,
        range: FrameRange,
    ) -> Result<Redistribution> {
        let sampler = ClipSampler::new(self.rig, clip);
        let start = range.start as f32;

        let baseline = if self.request.use_rest_pose {
            let rest = self.rig.skeleton.bind_world(reference)?;
            Baseline::RestPose(sampler.object_world(start).mul_transform(&rest))
        } else {
            Baseline::StartFrame
        };

        let deltas = extract_deltas(
            &sampler,
            &ChannelTarget::Bone(self.request.reference_bone.clone()),
            baseline,
            &AxisMask::from_request(&self.request),
            range,
        )?;
        let baseline_root = match root {
            RootNode::Object => sampler.object_world(start),
            RootNode::Bone(handle) => sampler.bone_world(handle, start)?,
        };

        Ok(redistribute(&deltas, &baseline_root))
    }

    /// Runs the bake state machine for one clip.
    pub fn bake_clip(&self, clip: &mut AnimationClip) -> Result<BakeOutcome> {
        if clip.flags.root_motion_applied {
            log::info!("Skipping clip '{}': root motion already applied", clip.name);
            return Ok(BakeOutcome::Skipped(SkipReason::AlreadyBaked));
        }
        if !clip.flags.eligible_for_root_motion {
            log::info!("Skipping clip '{}': not eligible", clip.name);
            return Ok(BakeOutcome::Skipped(SkipReason::NotEligible));
        }
        if !self.request.extracts_anything() {
            return Err(BakeError::InvalidAxisConfiguration);
        }

        let (reference, root) = self.resolve_targets()?;
        let range = FrameRange::resolve(clip, &self.request)?;
        log::info!(
            "Baking root motion for clip '{}' over [{}, {}]",
            clip.name,
            range.start,
            range.end
        );

        let plan = self.plan_with(clip, reference, root, range)?;

        let mut stage = StagedClip::new(clip);
        let root_target = self.root_channel_target(root);
        let reference_target = ChannelTarget::Bone(self.request.reference_bone.clone());

        // Root first: the residual is resolved through the root's new curves.
        match root {
            RootNode::Object => write_object_curves(stage.staged_mut(), &plan.root, range),
            RootNode::Bone(handle) => {
                write_world_curves(self.rig, stage.staged_mut(), handle, &plan.root, range)?;
            }
        }
        let root_corrections =
            correct_rotation_curves(stage.staged_mut(), &root_target, self.continuity);

        write_world_curves(self.rig, stage.staged_mut(), reference, &plan.original, range)?;
        let reference_corrections =
            correct_rotation_curves(stage.staged_mut(), &reference_target, self.continuity);

        stage.staged_mut().flags.root_motion_applied = true;
        stage.commit();

        log::info!("Baked root motion for clip '{}'", clip.name);
        Ok(BakeOutcome::Baked(BakeSummary {
            range,
            root_corrections,
            reference_corrections,
        }))
    }

    fn report(&self, clip: &mut AnimationClip) -> ClipReport {
        let result = self.bake_clip(clip);
        if let Err(e) = &result {
            log::warn!("Root motion bake failed for clip '{}': {e}", clip.name);
        }
        ClipReport {
            clip: clip.name.clone(),
            result,
        }
    }

    /// Bakes every clip in order. A failing clip does not stop the others.
    pub fn bake_all(&self, clips: &mut [AnimationClip]) -> BatchReport {
        BatchReport {
            clips: clips.iter_mut().map(|clip| self.report(clip)).collect(),
        }
    }

    /// Parallel variant of [`Self::bake_all`]; clips own their curves and the
    /// rig is shared read-only.
    #[cfg(feature = "parallel")]
    pub fn bake_all_parallel(&self, clips: &mut [AnimationClip]) -> BatchReport {
        use rayon::prelude::*;

        BatchReport {
            clips: clips.par_iter_mut().map(|clip| self.report(clip)).collect(),
        }
    }
}
