//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`BakeError`] covers all failure modes including:
//! - Missing bones or root targets referenced by a bake request
//! - Clips with nothing to bake
//! - Hierarchy edits that would break the skeleton's forest invariant
//! - Malformed settings documents
//!
//! Skipping an already-baked clip is not an error; the orchestrator reports
//! it as [`SkipReason`](crate::rootmotion::SkipReason).
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, BakeError>`.
//!
//! ```rust,ignore
//! use rootbake::errors::{BakeError, Result};
//!
//! fn validate() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for root motion baking.
///
/// Every variant is detected before any keyframe is committed to a clip, so
/// receiving one of these from the orchestrator means the clip is untouched.
#[derive(Error, Debug)]
pub enum BakeError {
    // ========================================================================
    // Bake Request Errors
    // ========================================================================
    /// The reference (hip) bone named by the request does not exist.
    #[error("Reference bone not found: {0}")]
    MissingReferenceBone(String),

    /// The root target named by the request does not exist.
    #[error("Root target not found: {0}")]
    MissingRootTarget(String),

    /// The clip has no keyframes, or the requested window is empty.
    #[error("Empty frame range in clip '{clip}': [{start}, {end}]")]
    EmptyFrameRange {
        /// Clip being baked
        clip: String,
        /// First frame of the requested window
        start: i32,
        /// Last frame of the requested window
        end: i32,
    },

    /// The requested window spans more frames than a bake accepts.
    #[error("Frame range too large in clip '{clip}': [{start}, {end}]")]
    FrameRangeTooLarge {
        /// Clip being baked
        clip: String,
        /// First frame of the requested window
        start: i32,
        /// Last frame of the requested window
        end: i32,
    },

    /// All translation axes and the rotation flag are disabled.
    #[error("Invalid axis configuration: translation and rotation are all disabled")]
    InvalidAxisConfiguration,

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A bone handle or name does not belong to this skeleton.
    #[error("Unknown bone: {0}")]
    UnknownBone(String),

    /// A bone with this name already exists.
    #[error("Duplicate bone name: {0}")]
    DuplicateBone(String),

    /// Reparenting would make a bone its own ancestor.
    #[error("Reparenting '{bone}' under '{parent}' would create a cycle")]
    HierarchyCycle {
        /// Bone being reparented
        bone: String,
        /// Requested new parent
        parent: String,
    },

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// Settings document could not be parsed.
    #[error("Invalid bake settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// Alias for `Result<T, BakeError>`.
pub type Result<T> = std::result::Result<T, BakeError>;
