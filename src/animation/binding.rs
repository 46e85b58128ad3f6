use serde::{Deserialize, Serialize};

/// What a channel animates: the rig object itself or one of its bones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelTarget {
    Object,
    Bone(String),
}

impl ChannelTarget {
    #[must_use]
    pub fn bone(name: &str) -> Self {
        Self::Bone(name.to_string())
    }
}

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Location,           // 3 components: x, y, z
    RotationQuaternion, // 4 components: w, x, y, z
    Scale,              // 3 components: x, y, z
}

impl Property {
    #[must_use]
    pub fn components(self) -> usize {
        match self {
            Self::Location | Self::Scale => 3,
            Self::RotationQuaternion => 4,
        }
    }
}

/// Identifies one scalar curve: (target, property, component index).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelKey {
    pub target: ChannelTarget,
    pub property: Property,
    pub index: usize,
}

impl ChannelKey {
    #[must_use]
    pub fn new(target: ChannelTarget, property: Property, index: usize) -> Self {
        Self {
            target,
            property,
            index,
        }
    }

    /// All component keys of `property` on `target`, in storage order.
    #[must_use]
    pub fn components(target: &ChannelTarget, property: Property) -> Vec<ChannelKey> {
        (0..property.components())
            .map(|i| Self::new(target.clone(), property, i))
            .collect()
    }
}
