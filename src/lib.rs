#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod errors;
pub mod rootmotion;
pub mod scene;

pub use animation::{AnimationClip, Channel, ChannelKey, ChannelTarget, ClipFlags, Property};
pub use errors::{BakeError, Result};
pub use rootmotion::{BakeOutcome, BakeRequest, RootMotionBaker, SkipReason};
pub use scene::{Rig, Skeleton, Transform};
