use crate::animation::AnimationClip;

/// Scoped staging area for one clip bake.
///
/// All intermediate curves are written to a private copy of the clip. The
/// copy only replaces the real clip on [`StagedClip::commit`]; dropping the
/// stage on any other path (error, early return, panic unwind) discards it
/// and leaves the real clip untouched.
pub struct StagedClip<'a> {
    target: &'a mut AnimationClip,
    staged: AnimationClip,
    committed: bool,
}

impl<'a> StagedClip<'a> {
    pub fn new(target: &'a mut AnimationClip) -> Self {
        let staged = target.clone();
        Self {
            target,
            staged,
            committed: false,
        }
    }

    /// The clip as it was before staging.
    #[must_use]
    pub fn original(&self) -> &AnimationClip {
        &*self.target
    }

    #[must_use]
    pub fn staged(&self) -> &AnimationClip {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut AnimationClip {
        &mut self.staged
    }

    /// Swaps the staged curves and flags into the real clip.
    pub fn commit(mut self) {
        std::mem::swap(&mut *self.target, &mut self.staged);
        self.committed = true;
        log::debug!("Committed staged curves for clip '{}'", self.target.name);
    }
}

impl Drop for StagedClip<'_> {
    fn drop(&mut self) {
        if !self.committed {
            log::debug!("Discarding staged curves for clip '{}'", self.target.name);
        }
    }
}
