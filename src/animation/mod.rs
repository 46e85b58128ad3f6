pub mod binding;
pub mod clip;
pub mod tracks;

pub use binding::{ChannelKey, ChannelTarget, Property};
pub use clip::{AnimationClip, ClipFlags, CurveStore};
pub use tracks::{Channel, Interpolation, Keyframe, KeyframeCursor};
