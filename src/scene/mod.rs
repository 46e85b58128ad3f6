//! Scene Module
//!
//! Static rig data the baker reads:
//! - Transform: TRS value (position, rotation, scale)
//! - Skeleton: bone forest (parent links + bind poses)
//! - Rig: armature object (object transform + skeleton)

pub mod rig;
pub mod skeleton;
pub mod transform;

pub use rig::Rig;
pub use skeleton::{Bone, Skeleton};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct BoneHandle;
}
