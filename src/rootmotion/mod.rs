//! Root Motion
//!
//! Extracts the locomotion implicit in a reference bone (usually the hips)
//! and re-expresses it on a dedicated root bone, keeping the reference
//! bone's world motion unchanged.
//!
//! Pipeline, leaves first:
//! - [`sampler`]: world transform of any node at any frame
//! - [`mask`]: per-axis translation, ground clamp and heading masks
//! - [`extract`]: masked per-frame deltas against a baseline
//! - [`redistribute`]: root and residual sequences, written as dense curves
//! - [`continuity`]: quaternion sign-flip repair
//! - [`orchestrator`]: per-clip state machine and batch driver

pub mod continuity;
pub mod extract;
pub mod mask;
pub mod orchestrator;
pub mod redistribute;
pub mod sampler;
pub mod settings;
pub mod staging;

pub use continuity::{ContinuityReport, correct_clip, correct_rotation_curves, correct_sequence};
pub use extract::{Baseline, DeltaSequence, FrameRange, MAX_BAKE_FRAMES, extract_deltas};
pub use mask::{AxisMask, twist};
pub use orchestrator::{
    BakeOutcome, BakeState, BakeSummary, BatchReport, ClipReport, RootMotionBaker, SkipReason,
};
pub use redistribute::{Redistribution, redistribute, write_object_curves, write_world_curves};
pub use sampler::{ClipSampler, TransformSampler};
pub use settings::{BakeRequest, ContinuityOptions, RootMotionType, UpAxis};
pub use staging::StagedClip;
