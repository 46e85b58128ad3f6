// src/animation/tracks.rs
use serde::{Deserialize, Serialize};

use crate::animation::binding::ChannelKey;

/// Interpolation used for the segment that starts at a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    Constant,
    #[default]
    Linear,
    /// Hermite spline with Catmull-Rom tangents derived from neighbouring keys.
    Cubic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
    pub interpolation: Interpolation,
}

impl Keyframe {
    #[must_use]
    pub fn new(frame: f32, value: f32) -> Self {
        Self {
            frame,
            value,
            interpolation: Interpolation::Linear,
        }
    }
}

const MAX_SCAN_OFFSET: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// A scalar animation curve.
///
/// Keyframe frames are strictly increasing. Sampling outside the keyed range
/// clamps to the boundary keyframe value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub key: ChannelKey,
    keyframes: Vec<Keyframe>,
}

impl Channel {
    #[must_use]
    pub fn new(key: ChannelKey) -> Self {
        Self {
            key,
            keyframes: Vec::new(),
        }
    }

    /// Builds a channel from `(frame, value)` pairs with linear interpolation.
    #[must_use]
    pub fn from_points(key: ChannelKey, points: &[(f32, f32)]) -> Self {
        let mut channel = Self::new(key);
        for &(frame, value) in points {
            channel.insert(frame, value, Interpolation::Linear);
        }
        channel
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// First and last keyed frame.
    #[must_use]
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.frame, self.keyframes.last()?.frame))
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Inserts a keyframe, replacing any key already at `frame`.
    pub fn insert(&mut self, frame: f32, value: f32, interpolation: Interpolation) {
        let key = Keyframe {
            frame,
            value,
            interpolation,
        };
        let idx = self.keyframes.partition_point(|k| k.frame < frame);
        match self.keyframes.get_mut(idx) {
            Some(existing) if existing.frame == frame => *existing = key,
            _ => self.keyframes.insert(idx, key),
        }
    }

    /// Overwrites the value of the key at `index`, keeping its frame.
    pub fn set_value(&mut self, index: usize, value: f32) {
        if let Some(k) = self.keyframes.get_mut(index) {
            k.value = value;
        }
    }

    /// Removes every keyframe with `from <= frame <= to`.
    pub fn remove_range(&mut self, from: f32, to: f32) {
        self.keyframes.retain(|k| k.frame < from || k.frame > to);
    }

    /// Keeps only keyframes inside `[from, to]`.
    pub fn retain_range(&mut self, from: f32, to: f32) {
        self.keyframes.retain(|k| k.frame >= from && k.frame <= to);
    }

    /// Shifts every keyframe by `offset` frames.
    pub fn shift(&mut self, offset: f32) {
        for k in &mut self.keyframes {
            k.frame += offset;
        }
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    #[must_use]
    pub fn sample(&self, frame: f32) -> Option<f32> {
        if self.keyframes.is_empty() {
            return None;
        }
        // partition_point finds the first index where k.frame > frame, i.e. next_index
        let next_idx = self.keyframes.partition_point(|k| k.frame <= frame);
        Some(self.sample_at_index(next_idx.saturating_sub(1), frame))
    }

    /// Sampling with a cursor, cheap for monotonic frame sweeps.
    pub fn sample_with_cursor(&self, frame: f32, cursor: &mut KeyframeCursor) -> Option<f32> {
        let len = self.keyframes.len();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(self.keyframes[0].value);
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.keyframes[i].frame;

        let found = if frame >= t_curr {
            // Forward scan (normal playback)
            (0..=MAX_SCAN_OFFSET)
                .map(|offset| i + offset)
                .take_while(|&idx| idx < len)
                .find(|&idx| idx == len - 1 || frame < self.keyframes[idx + 1].frame)
        } else {
            // Backward scan
            (0..=MAX_SCAN_OFFSET)
                .take_while(|&offset| offset <= i)
                .map(|offset| i - offset)
                .find(|&idx| frame >= self.keyframes[idx].frame)
        };

        // Large jump: fall back to binary search
        let idx = found.unwrap_or_else(|| {
            self.keyframes
                .partition_point(|k| k.frame <= frame)
                .saturating_sub(1)
        });
        cursor.last_index = idx;
        Some(self.sample_at_index(idx, frame))
    }

    fn sample_at_index(&self, index: usize, frame: f32) -> f32 {
        let len = self.keyframes.len();

        // Boundary case: no next key available
        if index >= len - 1 {
            return self.keyframes[len - 1].value;
        }

        let k0 = &self.keyframes[index];
        let k1 = &self.keyframes[index + 1];
        let dt = k1.frame - k0.frame;

        // Prevent division by zero
        let t = if dt > 1e-6 { (frame - k0.frame) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match k0.interpolation {
            Interpolation::Constant => k0.value,
            Interpolation::Linear => k0.value + (k1.value - k0.value) * t,
            Interpolation::Cubic => {
                let m0 = self.tangent(index);
                let m1 = self.tangent(index + 1);
                hermite(k0.value, m0, m1, k1.value, t, dt)
            }
        }
    }

    /// Catmull-Rom slope (value per frame) at a keyframe.
    fn tangent(&self, index: usize) -> f32 {
        let prev = &self.keyframes[index.saturating_sub(1)];
        let next = &self.keyframes[(index + 1).min(self.keyframes.len() - 1)];
        let span = next.frame - prev.frame;
        if span > 1e-6 {
            (next.value - prev.value) / span
        } else {
            0.0
        }
    }
}

fn hermite(v0: f32, out_tangent0: f32, in_tangent1: f32, v1: f32, t: f32, dt: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;

    let m0 = out_tangent0 * dt;
    let m1 = in_tangent1 * dt;

    s0 * v0 + s1 * m0 + s2 * v1 + s3 * m1
}
