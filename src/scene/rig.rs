use crate::scene::skeleton::Skeleton;
use crate::scene::transform::Transform;

/// An armature object: its authored object transform plus the skeleton it
/// carries.
///
/// Object-level animation channels replace components of `transform`
/// absolutely; bone channels are pose offsets on top of each bone's bind.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    pub name: String,
    pub transform: Transform,
    pub skeleton: Skeleton,
}

impl Rig {
    #[must_use]
    pub fn new(name: &str, skeleton: Skeleton) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            skeleton,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}
