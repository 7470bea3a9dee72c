//! Structural edit scope.
//!
//! Bone creation, geometry, parenting, deform flags and renames are only
//! reachable through [`EditScope`]. Entering the scope switches the skeleton
//! to [`SkeletonMode::Edit`]; dropping it restores the mode captured on entry,
//! including when an operation inside the scope fails and returns early.

use std::ops::Deref;

use crate::bone::Bone;
use crate::error::{RigError, RigResult};
use crate::skeleton::{Skeleton, SkeletonMode};
use crate::Vec3;

/// Exclusive structural edit access to a skeleton.
#[derive(Debug)]
pub struct EditScope<'a> {
    skeleton: &'a mut Skeleton,
    previous: SkeletonMode,
}

impl<'a> EditScope<'a> {
    pub(crate) fn enter(skeleton: &'a mut Skeleton) -> Self {
        let previous = skeleton.set_mode(SkeletonMode::Edit);
        tracing::trace!(?previous, "entered edit scope");
        Self { skeleton, previous }
    }

    /// Mode restored when the scope closes.
    pub fn previous_mode(&self) -> SkeletonMode {
        self.previous
    }

    fn check_parent(&self, bone: &str, parent: Option<&str>) -> RigResult<()> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if !self.skeleton.contains(parent) {
            return Err(RigError::UnknownParent {
                bone: bone.to_string(),
                parent: parent.to_string(),
            });
        }
        if self.skeleton.is_self_or_ancestor(parent, bone) {
            return Err(RigError::ParentCycle {
                bone: bone.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    fn bone_entry(&mut self, name: &str) -> RigResult<&mut Bone> {
        self.skeleton
            .bones
            .get_mut(name)
            .ok_or_else(|| RigError::missing(name))
    }

    /// Creates a deforming bone. Fails if the name is taken.
    pub fn add_bone(
        &mut self,
        name: &str,
        head: Vec3,
        tail: Vec3,
        parent: Option<&str>,
    ) -> RigResult<&mut Bone> {
        if self.skeleton.contains(name) {
            return Err(RigError::DuplicateBone {
                name: name.to_string(),
            });
        }
        self.check_parent(name, parent)?;
        let bone = Bone::new(head, tail, parent.map(str::to_string), true);
        Ok(self.skeleton.bones.entry(name.to_string()).or_insert(bone))
    }

    /// Returns the bone named `name`, creating a non-deforming bone at the
    /// origin if it does not exist, and parents it to `parent`.
    ///
    /// The boolean is true when the bone was created.
    pub fn ensure_bone(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> RigResult<(&mut Bone, bool)> {
        self.check_parent(name, parent)?;
        let created = !self.skeleton.contains(name);
        let bone = self
            .skeleton
            .bones
            .entry(name.to_string())
            .or_insert_with(|| Bone::new(Vec3::zeros(), Vec3::zeros(), None, false));
        bone.set_parent(parent.map(str::to_string));
        Ok((bone, created))
    }

    /// Creates or reuses `name` and sets its full placement.
    pub fn place_bone(
        &mut self,
        name: &str,
        head: Vec3,
        tail: Vec3,
        parent: Option<&str>,
    ) -> RigResult<&mut Bone> {
        let (bone, created) = self.ensure_bone(name, parent)?;
        bone.set_head(head);
        bone.set_tail(tail);
        tracing::debug!(bone = name, created, ?head, ?tail, "placed bone");
        Ok(bone)
    }

    pub fn set_head(&mut self, name: &str, head: Vec3) -> RigResult<()> {
        self.bone_entry(name)?.set_head(head);
        Ok(())
    }

    pub fn set_tail(&mut self, name: &str, tail: Vec3) -> RigResult<()> {
        self.bone_entry(name)?.set_tail(tail);
        Ok(())
    }

    /// Re-parents a bone. Rejects unknown parents and cycles.
    pub fn set_parent(&mut self, name: &str, parent: Option<&str>) -> RigResult<()> {
        if !self.skeleton.contains(name) {
            return Err(RigError::missing(name));
        }
        self.check_parent(name, parent)?;
        self.bone_entry(name)?.set_parent(parent.map(str::to_string));
        Ok(())
    }

    pub fn set_deform(&mut self, name: &str, deform: bool) -> RigResult<()> {
        self.bone_entry(name)?.set_deform(deform);
        Ok(())
    }

    /// Renames a bone and rewrites every reference to it.
    ///
    /// Parent links, constraint targets and driver variable sources that
    /// name `from` are updated to `to`. Renaming onto an existing bone is a
    /// name collision.
    pub fn rename(&mut self, from: &str, to: &str) -> RigResult<()> {
        if from == to {
            return Ok(());
        }
        if self.skeleton.contains(to) {
            return Err(RigError::NameCollision {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let bone = self
            .skeleton
            .bones
            .remove(from)
            .ok_or_else(|| RigError::missing(from))?;
        self.skeleton.bones.insert(to.to_string(), bone);

        for bone in self.skeleton.bones.values_mut() {
            if bone.parent() == Some(from) {
                bone.set_parent(Some(to.to_string()));
            }
            for constraint in bone.constraints_mut() {
                constraint.retarget(from, to);
            }
            for driver in bone.drivers_mut() {
                driver.retarget(from, to);
            }
        }
        Ok(())
    }
}

impl Deref for EditScope<'_> {
    type Target = Skeleton;

    fn deref(&self) -> &Skeleton {
        self.skeleton
    }
}

impl Drop for EditScope<'_> {
    fn drop(&mut self) {
        self.skeleton.set_mode(self.previous);
        tracing::trace!(mode = ?self.previous, "left edit scope");
    }
}
