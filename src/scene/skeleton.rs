use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{BakeError, Result};
use crate::scene::BoneHandle;
use crate::scene::transform::Transform;

/// Names tried, in order, when looking for a pelvis/hip bone.
pub const HIP_BONE_CANDIDATES: [&str; 6] = [
    "hips",
    "Hips",
    "mixamorig:Hips",
    "mixamorig_Hips",
    "pelvis",
    "Pelvis",
];

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub(crate) parent: Option<BoneHandle>,
    pub(crate) children: SmallVec<[BoneHandle; 4]>,
    /// Bind (rest) pose relative to the parent bone, or to the rig for roots.
    pub bind: Transform,
}

impl Bone {
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BoneHandle] {
        &self.children
    }
}

/// An ordered forest of bones.
///
/// The skeleton owns every bone; parent links are plain handles into the
/// same storage. Bones can only be attached to parents that already exist
/// and [`Skeleton::set_parent`] rejects cycles, so the forest invariant
/// always holds.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: SlotMap<BoneHandle, Bone>,
    // Insertion order, used for deterministic iteration
    order: Vec<BoneHandle>,
    by_name: FxHashMap<String, BoneHandle>,
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    pub fn add_bone(
        &mut self,
        name: &str,
        parent: Option<BoneHandle>,
        bind: Transform,
    ) -> Result<BoneHandle> {
        if self.by_name.contains_key(name) {
            return Err(BakeError::DuplicateBone(name.to_string()));
        }
        if let Some(p) = parent {
            if !self.bones.contains_key(p) {
                return Err(BakeError::UnknownBone(format!("{p:?}")));
            }
        }

        let handle = self.bones.insert(Bone {
            name: name.to_string(),
            parent,
            children: SmallVec::new(),
            bind,
        });
        if let Some(p) = parent {
            self.bones[p].children.push(handle);
        }
        self.order.push(handle);
        self.by_name.insert(name.to_string(), handle);
        Ok(handle)
    }

    /// Moves `bone` under `parent` (or to the top level for `None`).
    ///
    /// The bind transform is left untouched, so it is reinterpreted relative
    /// to the new parent.
    pub fn set_parent(&mut self, bone: BoneHandle, parent: Option<BoneHandle>) -> Result<()> {
        let bone_name = self.name_of(bone)?.to_string();
        if let Some(p) = parent {
            let parent_name = self.name_of(p)?.to_string();
            if p == bone || self.is_ancestor(bone, p) {
                return Err(BakeError::HierarchyCycle {
                    bone: bone_name,
                    parent: parent_name,
                });
            }
        }

        if let Some(old) = self.bones[bone].parent {
            self.bones[old].children.retain(|c| *c != bone);
        }
        self.bones[bone].parent = parent;
        if let Some(p) = parent {
            self.bones[p].children.push(bone);
        }
        Ok(())
    }

    /// Adds a root bone at the rig origin and moves `hip` under it.
    ///
    /// Returns the existing handle unchanged when `root_name` is already
    /// present. The hip's world bind pose is preserved because the new root
    /// sits at identity.
    pub fn add_root_bone(&mut self, root_name: &str, hip_name: &str) -> Result<BoneHandle> {
        if let Some(existing) = self.find(root_name) {
            log::info!("Root bone '{root_name}' already exists");
            return Ok(existing);
        }
        let hip = self
            .find(hip_name)
            .ok_or_else(|| BakeError::MissingReferenceBone(hip_name.to_string()))?;

        // The hip keeps its world placement only if its old parent chain is
        // folded into the bind transform.
        let hip_world = self.bind_world(hip)?;
        let root = self.add_bone(root_name, None, Transform::IDENTITY)?;
        self.set_parent(hip, Some(root))?;
        self.bones[hip].bind = hip_world;

        log::info!("Added root bone '{root_name}' above '{hip_name}'");
        Ok(root)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn find(&self, name: &str) -> Option<BoneHandle> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn bone(&self, handle: BoneHandle) -> Option<&Bone> {
        self.bones.get(handle)
    }

    pub fn bone_mut(&mut self, handle: BoneHandle) -> Option<&mut Bone> {
        self.bones.get_mut(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bones in insertion order.
    pub fn bones(&self) -> impl Iterator<Item = (BoneHandle, &Bone)> {
        self.order.iter().map(|&h| (h, &self.bones[h]))
    }

    /// Top-level bones (no parent).
    pub fn roots(&self) -> impl Iterator<Item = BoneHandle> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|&h| self.bones[h].parent.is_none())
    }

    /// Looks up the first bone whose name matches a common hip naming scheme.
    #[must_use]
    pub fn find_hip_bone(&self) -> Option<&str> {
        HIP_BONE_CANDIDATES
            .iter()
            .find(|name| self.by_name.contains_key(**name))
            .copied()
    }

    /// Ancestor chain from the top-level bone down to `handle` (inclusive).
    pub fn chain(&self, handle: BoneHandle) -> Result<SmallVec<[BoneHandle; 16]>> {
        let mut chain = SmallVec::new();
        let mut current = Some(handle);
        while let Some(h) = current {
            let bone = self
                .bones
                .get(h)
                .ok_or_else(|| BakeError::UnknownBone(format!("{h:?}")))?;
            chain.push(h);
            current = bone.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Returns true if `ancestor` is a strict ancestor of `bone`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: BoneHandle, bone: BoneHandle) -> bool {
        let mut current = self.bones.get(bone).and_then(|b| b.parent);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.bones.get(h).and_then(|b| b.parent);
        }
        false
    }

    /// Bind pose in rig space (all ancestor binds composed).
    pub fn bind_world(&self, handle: BoneHandle) -> Result<Transform> {
        let chain = self.chain(handle)?;
        Ok(chain.iter().fold(Transform::IDENTITY, |acc, &h| {
            acc.mul_transform(&self.bones[h].bind)
        }))
    }

    fn name_of(&self, handle: BoneHandle) -> Result<&str> {
        self.bones
            .get(handle)
            .map(|b| b.name.as_str())
            .ok_or_else(|| BakeError::UnknownBone(format!("{handle:?}")))
    }
}
