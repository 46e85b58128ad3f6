use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::animation::binding::{ChannelKey, ChannelTarget, Property};
use crate::animation::tracks::{Channel, Interpolation};

/// Marker flags persisted on a clip.
///
/// Set and cleared by external tooling (import pipeline, UI); the bake
/// orchestrator reads both and sets `root_motion_applied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFlags {
    pub eligible_for_root_motion: bool,
    pub root_motion_applied: bool,
}

/// Host curve storage boundary: evaluate and insert, never restructure.
pub trait CurveStore {
    /// Evaluates a channel at `frame`; `None` when the channel has no keys.
    fn sample_channel(&self, key: &ChannelKey, frame: f32) -> Option<f32>;

    /// Inserts (or replaces) a linear keyframe, creating the channel if needed.
    fn write_keyframe(&mut self, key: &ChannelKey, frame: f32, value: f32);
}

/// A named collection of scalar channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub flags: ClipFlags,
    channels: Vec<Channel>,
    #[serde(skip)]
    index: FxHashMap<ChannelKey, usize>,
}

impl PartialEq for AnimationClip {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.flags == other.flags && self.channels == other.channels
    }
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: ClipFlags::default(),
            channels: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Builds a clip marked eligible for root motion processing.
    #[must_use]
    pub fn eligible(name: &str) -> Self {
        let mut clip = Self::new(name);
        clip.flags.eligible_for_root_motion = true;
        clip
    }

    /// Adds or replaces a whole channel.
    pub fn add_channel(&mut self, channel: Channel) {
        if let Some(i) = self.lookup(&channel.key) {
            self.channels[i] = channel;
        } else {
            self.index.insert(channel.key.clone(), self.channels.len());
            self.channels.push(channel);
        }
    }

    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    #[must_use]
    pub fn channel(&self, key: &ChannelKey) -> Option<&Channel> {
        self.lookup(key).map(|i| &self.channels[i])
    }

    pub fn channel_mut(&mut self, key: &ChannelKey) -> Option<&mut Channel> {
        self.lookup(key).map(|i| &mut self.channels[i])
    }

    pub fn ensure_channel(&mut self, key: &ChannelKey) -> &mut Channel {
        let i = match self.lookup(key) {
            Some(i) => i,
            None => {
                self.add_channel(Channel::new(key.clone()));
                self.channels.len() - 1
            }
        };
        &mut self.channels[i]
    }

    /// `[min, max]` over every channel's keyframes; `None` for an unkeyed clip.
    #[must_use]
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        self.channels
            .iter()
            .filter_map(Channel::frame_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    /// Targets that carry at least one rotation quaternion channel.
    #[must_use]
    pub fn rotation_targets(&self) -> Vec<ChannelTarget> {
        let mut targets: Vec<ChannelTarget> = Vec::new();
        for c in &self.channels {
            if c.key.property == Property::RotationQuaternion && !targets.contains(&c.key.target) {
                targets.push(c.key.target.clone());
            }
        }
        targets
    }

    /// Drops keys outside `[from, to]` and shifts the rest so the clip
    /// starts at frame 0.
    pub fn trim(&mut self, from: f32, to: f32) {
        for c in &mut self.channels {
            c.retain_range(from, to);
        }
        if let Some((start, _)) = self.frame_range() {
            for c in &mut self.channels {
                c.shift(-start);
            }
        }
        log::debug!("Trimmed clip '{}' to [{from}, {to}]", self.name);
    }

    /// Rebuilds the key lookup (needed after deserialization).
    pub fn reindex(&mut self) {
        self.index = self
            .channels
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.clone(), i))
            .collect();
    }

    fn lookup(&self, key: &ChannelKey) -> Option<usize> {
        if self.index.len() == self.channels.len() {
            self.index.get(key).copied()
        } else {
            // Index is stale (deserialized clip)
            self.channels.iter().position(|c| &c.key == key)
        }
    }
}

impl CurveStore for AnimationClip {
    fn sample_channel(&self, key: &ChannelKey, frame: f32) -> Option<f32> {
        self.channel(key)?.sample(frame)
    }

    fn write_keyframe(&mut self, key: &ChannelKey, frame: f32, value: f32) {
        self.ensure_channel(key)
            .insert(frame, value, Interpolation::Linear);
    }
}
