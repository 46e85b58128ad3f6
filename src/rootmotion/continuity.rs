//! Quaternion Continuity Correction
//!
//! `q` and `-q` encode the same rotation, but an interpolator fed a sign
//! change between two neighbouring keys spins the long way around. This pass
//! densifies a target's four rotation curves and walks them left to right,
//! negating samples so every consecutive pair lies on the shorter arc.
//!
//! Corrections compound: a negation at frame `i` becomes the reference for
//! the check at frame `i + 1`.

use std::f32::consts::PI;

use glam::Quat;

use crate::animation::{
    AnimationClip, ChannelKey, ChannelTarget, Interpolation, KeyframeCursor, Property,
};
use crate::rootmotion::settings::ContinuityOptions;

/// Half-width (radians) of the window around π that counts as a flip.
pub const FLIP_WINDOW: f32 = 0.5;

/// L1 component difference above which a jump is treated as an inversion.
pub const INVERT_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuityReport {
    /// Keyframes inserted while densifying.
    pub inserted: usize,
    pub flips: usize,
    pub inverts: usize,
}

impl ContinuityReport {
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            inserted: self.inserted + other.inserted,
            flips: self.flips + other.flips,
            inverts: self.inverts + other.inverts,
        }
    }
}

/// Raw rotation difference angle in `[0, 2π]` (no shortest-path folding).
fn difference_angle(prev: Quat, cur: Quat) -> f32 {
    let diff = prev.normalize().conjugate() * cur.normalize();
    2.0 * diff.w.clamp(-1.0, 1.0).acos()
}

fn l1_distance(a: Quat, b: Quat) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs() + (a.w - b.w).abs()
}

/// Corrects a sequence in place; returns `(flips, inverts)`.
///
/// Only sign changes that survive both checks are counted.
pub fn correct_sequence(quats: &mut [Quat], options: ContinuityOptions) -> (usize, usize) {
    let mut flips = 0;
    let mut inverts = 0;

    for i in 1..quats.len() {
        let prev = quats[i - 1];
        let mut cur = quats[i];

        let flipped =
            options.prevent_flips && (difference_angle(prev, cur) - PI).abs() < FLIP_WINDOW;
        if flipped {
            cur = -cur;
        }

        // Only an antipodal jump is an artifact; a genuine fast rotation keeps its sign.
        let inverted = options.prevent_inverts
            && l1_distance(prev, cur) > INVERT_THRESHOLD
            && prev.dot(cur) < 0.0;
        if inverted {
            cur = -cur;
        }

        // An invert that undoes a flip leaves the sample as it was.
        match (flipped, inverted) {
            (true, false) => flips += 1,
            (false, true) => inverts += 1,
            _ => {}
        }

        quats[i] = cur;
    }

    (flips, inverts)
}

/// Densifies and corrects the rotation curves of one target.
///
/// Targets missing any of the four quaternion channels are left alone.
pub fn correct_rotation_curves(
    clip: &mut AnimationClip,
    target: &ChannelTarget,
    options: ContinuityOptions,
) -> ContinuityReport {
    let keys = ChannelKey::components(target, Property::RotationQuaternion);
    let mut ranges = Vec::with_capacity(4);
    for key in &keys {
        match clip.channel(key).and_then(|c| c.frame_range()) {
            Some(r) => ranges.push(r),
            None => {
                log::debug!("Skipping continuity pass for {target:?}: incomplete rotation");
                return ContinuityReport::default();
            }
        }
    }

    let mut report = ContinuityReport::default();

    // 1. Key every integer frame of the covered range.
    let start = ranges.iter().map(|r| r.0).fold(f32::INFINITY, f32::min).ceil() as i32;
    let end = ranges.iter().map(|r| r.1).fold(f32::NEG_INFINITY, f32::max).floor() as i32;
    let integer_frames: Vec<f32> = (start..=end).map(|f| f as f32).collect();
    for key in &keys {
        report.inserted += densify(clip, key, &integer_frames);
    }

    // 2. Align fractional keys so all four curves share one frame list.
    let mut union: Vec<f32> = keys
        .iter()
        .filter_map(|k| clip.channel(k))
        .flat_map(|c| c.keyframes().iter().map(|k| k.frame))
        .collect();
    union.sort_by(f32::total_cmp);
    union.dedup();
    for key in &keys {
        report.inserted += densify(clip, key, &union);
    }

    // 3. Single left-to-right pass.
    let components: Vec<Vec<f32>> = keys
        .iter()
        .map(|k| {
            clip.channel(k)
                .map(|c| c.keyframes().iter().map(|kf| kf.value).collect())
                .unwrap_or_default()
        })
        .collect();
    let mut quats: Vec<Quat> = (0..union.len())
        .map(|i| {
            Quat::from_xyzw(
                components[1][i],
                components[2][i],
                components[3][i],
                components[0][i],
            )
        })
        .collect();

    let (flips, inverts) = correct_sequence(&mut quats, options);
    report.flips = flips;
    report.inverts = inverts;

    for (c, key) in keys.iter().enumerate() {
        if let Some(channel) = clip.channel_mut(key) {
            for (i, q) in quats.iter().enumerate() {
                let value = match c {
                    0 => q.w,
                    1 => q.x,
                    2 => q.y,
                    _ => q.z,
                };
                channel.set_value(i, value);
            }
        }
    }

    if flips + inverts > 0 {
        log::debug!("Corrected {target:?}: {flips} flips, {inverts} inverts");
    }
    report
}

/// Runs the continuity pass over every rotation target in the clip.
pub fn correct_clip(clip: &mut AnimationClip, options: ContinuityOptions) -> ContinuityReport {
    clip.rotation_targets()
        .iter()
        .map(|target| correct_rotation_curves(clip, target, options))
        .fold(ContinuityReport::default(), ContinuityReport::merge)
}

/// Inserts evaluated linear keys at `frames`; existing keys there become linear.
fn densify(clip: &mut AnimationClip, key: &ChannelKey, frames: &[f32]) -> usize {
    let Some(channel) = clip.channel_mut(key) else {
        return 0;
    };
    // Evaluate against the untouched curve before inserting anything.
    // `frames` is ascending, so the cursor only ever steps forward.
    let mut cursor = KeyframeCursor::default();
    let values: Vec<(f32, f32, bool)> = frames
        .iter()
        .filter_map(|&f| {
            let exists = channel
                .keyframes()
                .binary_search_by(|k| k.frame.total_cmp(&f))
                .is_ok();
            channel
                .sample_with_cursor(f, &mut cursor)
                .map(|v| (f, v, exists))
        })
        .collect();

    let mut inserted = 0;
    for (frame, value, exists) in values {
        if !exists {
            inserted += 1;
        }
        channel.insert(frame, value, Interpolation::Linear);
    }
    inserted
}
