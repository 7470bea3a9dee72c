//! The skeleton graph: a name-keyed forest of bones.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bone::{Bone, LAYER_COUNT};
use crate::edit::EditScope;
use crate::error::{RigError, RigResult};

/// Interaction mode of a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SkeletonMode {
    /// Neither structure nor pose is being edited.
    #[default]
    Object,
    /// Behavior (constraints, drivers, pose) is being edited.
    Pose,
    /// Structure (head, tail, parent, names) is being edited.
    Edit,
}

/// A skeleton owning every bone by name.
///
/// Bones refer to each other by name only. The map is ordered so iteration
/// and serialization are deterministic. Equality compares bones only; the
/// interaction mode is not part of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skeleton {
    #[serde(skip)]
    mode: SkeletonMode,
    #[serde(default)]
    pub(crate) bones: BTreeMap<String, Bone>,
}

impl PartialEq for Skeleton {
    fn eq(&self, other: &Self) -> bool {
        self.bones == other.bones
    }
}

impl Skeleton {
    /// Creates an empty skeleton in object mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SkeletonMode {
        self.mode
    }

    /// Switches the interaction mode, returning the previous one.
    pub fn set_mode(&mut self, mode: SkeletonMode) -> SkeletonMode {
        std::mem::replace(&mut self.mode, mode)
    }

    /// Opens a structural edit scope.
    ///
    /// The previous mode is restored when the returned guard is dropped.
    pub fn edit(&mut self) -> EditScope<'_> {
        EditScope::enter(self)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.get(name)
    }

    /// Returns the bone or a missing bone error.
    pub fn require(&self, name: &str) -> RigResult<&Bone> {
        self.bones.get(name).ok_or_else(|| RigError::missing(name))
    }

    /// Mutable access to a bone's behavior attributes.
    ///
    /// Switches the skeleton to [`SkeletonMode::Pose`]; an edit scope opened
    /// afterwards restores pose mode when it closes.
    pub fn bone_mut(&mut self, name: &str) -> RigResult<&mut Bone> {
        let bone = self.bones.get_mut(name).ok_or_else(|| RigError::missing(name))?;
        if self.mode != SkeletonMode::Pose {
            tracing::trace!(previous = ?self.mode, "entered pose mode");
            self.mode = SkeletonMode::Pose;
        }
        Ok(bone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Bone names in sorted order.
    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.keys().map(String::as_str)
    }

    pub fn bones(&self) -> impl Iterator<Item = (&str, &Bone)> {
        self.bones.iter().map(|(name, bone)| (name.as_str(), bone))
    }

    /// Names of the bones directly parented to `name`.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.bones()
            .filter(|(_, bone)| bone.parent() == Some(name))
            .map(|(child, _)| child)
            .collect()
    }

    /// Ancestors of `name`, nearest first.
    pub fn ancestors(&self, name: &str) -> RigResult<Vec<&str>> {
        let mut chain = Vec::new();
        let mut current = self.require(name)?;
        while let Some(parent) = current.parent() {
            if parent == name || chain.contains(&parent) {
                return Err(RigError::ParentCycle {
                    bone: name.to_string(),
                    parent: parent.to_string(),
                });
            }
            chain.push(parent);
            current = self.bones.get(parent).ok_or_else(|| RigError::UnknownParent {
                bone: name.to_string(),
                parent: parent.to_string(),
            })?;
        }
        Ok(chain)
    }

    /// Returns true if `ancestor` is `name` or one of its ancestors.
    pub(crate) fn is_self_or_ancestor(&self, name: &str, ancestor: &str) -> bool {
        let mut current = Some(name);
        let mut steps = 0;
        while let Some(bone) = current {
            if bone == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.bones.len() {
                return false;
            }
            current = self.bones.get(bone).and_then(Bone::parent);
        }
        false
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks graph invariants: parents exist, parent links are acyclic,
    /// layers and influences are in range, and each bone has unique
    /// constraint names and driver channels.
    pub fn validate(&self) -> RigResult<()> {
        for (name, bone) in self.bones() {
            if bone.layer >= LAYER_COUNT {
                return Err(RigError::OutOfRange {
                    bone: name.to_string(),
                    field: "layer".to_string(),
                    message: format!("{} is outside 0..{}", bone.layer, LAYER_COUNT),
                });
            }
            if let Some(parent) = bone.parent() {
                if !self.contains(parent) {
                    return Err(RigError::UnknownParent {
                        bone: name.to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
            self.ancestors(name)?;

            let mut constraint_names = HashSet::new();
            for constraint in bone.constraints() {
                if !(0.0..=1.0).contains(&constraint.influence) {
                    return Err(RigError::OutOfRange {
                        bone: name.to_string(),
                        field: format!("constraints.{}.influence", constraint.name),
                        message: format!("{} is outside [0, 1]", constraint.influence),
                    });
                }
                if !constraint_names.insert(constraint.name.as_str()) {
                    return Err(RigError::DuplicateBinding {
                        bone: name.to_string(),
                        key: constraint.name.clone(),
                    });
                }
            }

            let mut channels = HashSet::new();
            for driver in bone.drivers() {
                if !channels.insert(driver.channel) {
                    return Err(RigError::DuplicateBinding {
                        bone: name.to_string(),
                        key: format!("rotation_quaternion[{}]", driver.channel.index()),
                    });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Parses and validates a skeleton document.
    pub fn from_json(json: &str) -> RigResult<Self> {
        let skeleton: Skeleton = serde_json::from_str(json)?;
        skeleton.validate()?;
        Ok(skeleton)
    }

    pub fn to_json(&self) -> RigResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> RigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a skeleton document from disk.
    pub fn load(path: impl AsRef<Path>) -> RigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Writes the skeleton as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> RigResult<()> {
        let path = path.as_ref();
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json).map_err(|source| RigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, CopyRotation};
    use crate::Vec3;
    use pretty_assertions::assert_eq;

    fn chain() -> Skeleton {
        let mut skeleton = Skeleton::new();
        {
            let mut edit = skeleton.edit();
            edit.add_bone("Root", Vec3::zeros(), Vec3::z(), None).unwrap();
            edit.add_bone("Hips", Vec3::z(), Vec3::z() * 2.0, Some("Root"))
                .unwrap();
            edit.add_bone("Spine", Vec3::z() * 2.0, Vec3::z() * 3.0, Some("Hips"))
                .unwrap();
        }
        skeleton
    }

    #[test]
    fn test_queries() {
        let skeleton = chain();
        assert_eq!(skeleton.len(), 3);
        assert_eq!(skeleton.children("Root"), vec!["Hips"]);
        assert_eq!(skeleton.ancestors("Spine").unwrap(), vec!["Hips", "Root"]);
        assert_eq!(
            skeleton.bone_names().collect::<Vec<_>>(),
            vec!["Hips", "Root", "Spine"]
        );
        assert!(matches!(
            skeleton.require("Head"),
            Err(RigError::MissingBone { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_parent() {
        let json = r#"{"bones":{"Hand_L":{"head":[0,0,0],"tail":[0,1,0],"parent":"Arm_L"}}}"#;
        let err = Skeleton::from_json(json).unwrap_err();
        assert_eq!(err.code(), "RIG_003");
    }

    #[test]
    fn test_from_json_rejects_cycle() {
        let json = r#"{"bones":{
            "A":{"head":[0,0,0],"tail":[0,1,0],"parent":"B"},
            "B":{"head":[0,0,0],"tail":[0,1,0],"parent":"A"}}}"#;
        assert!(matches!(
            Skeleton::from_json(json),
            Err(RigError::ParentCycle { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_constraint() {
        let mut skeleton = chain();
        let bone = skeleton.bone_mut("Spine").unwrap();
        bone.constraint_entry("Follow", || Constraint::new::<CopyRotation>("Follow"));
        assert!(skeleton.validate().is_ok());

        let mut json: serde_json::Value =
            serde_json::from_str(&skeleton.to_json().unwrap()).unwrap();
        let constraints = json["bones"]["Spine"]["constraints"].as_array_mut().unwrap();
        let copy = constraints[0].clone();
        constraints.push(copy);
        let err = Skeleton::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, RigError::DuplicateBinding { .. }));
    }

    #[test]
    fn test_validate_ranges() {
        let mut skeleton = chain();
        skeleton
            .bone_mut("Spine")
            .unwrap()
            .constraint_entry("Follow", || Constraint::new::<CopyRotation>("Follow"));
        let mut json: serde_json::Value =
            serde_json::from_str(&skeleton.to_json().unwrap()).unwrap();

        let mut bad_influence = json.clone();
        bad_influence["bones"]["Spine"]["constraints"][0]["influence"] = 5.0.into();
        let err = Skeleton::from_json(&bad_influence.to_string()).unwrap_err();
        assert_eq!(err.code(), "RIG_009");
        assert_eq!(
            err.to_string(),
            "bone 'Spine' has out-of-range constraints.Follow.influence: 5 is outside [0, 1]"
        );

        json["bones"]["Hips"]["layer"] = LAYER_COUNT.into();
        let err = Skeleton::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, RigError::OutOfRange { ref field, .. } if field == "layer"));

        json["bones"]["Hips"]["layer"] = (LAYER_COUNT - 1).into();
        assert!(Skeleton::from_json(&json.to_string()).is_ok());
    }

    #[test]
    fn test_behavior_access_enters_pose_mode() {
        let mut skeleton = chain();
        assert_eq!(skeleton.mode(), SkeletonMode::Object);
        assert!(skeleton.bone_mut("Head").is_err());
        assert_eq!(skeleton.mode(), SkeletonMode::Object);

        skeleton.bone_mut("Spine").unwrap().layer = 3;
        assert_eq!(skeleton.mode(), SkeletonMode::Pose);
        {
            let edit = skeleton.edit();
            assert_eq!(edit.previous_mode(), SkeletonMode::Pose);
        }
        assert_eq!(skeleton.mode(), SkeletonMode::Pose);

        let reloaded = Skeleton::from_json(&skeleton.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.mode(), SkeletonMode::Object);
        assert_eq!(reloaded, skeleton);
    }

    #[test]
    fn test_document_defaults() {
        let json = r#"{"bones":{"Root":{"head":[0,0,0],"tail":[0,0,1]}}}"#;
        let skeleton = Skeleton::from_json(json).unwrap();
        let root = skeleton.bone("Root").unwrap();
        assert!(root.deform());
        assert_eq!(root.layer, 0);
        assert_eq!(root.parent(), None);
        assert_eq!(skeleton.mode(), SkeletonMode::Object);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skeleton.json");
        let skeleton = chain();
        skeleton.save(&path).unwrap();
        let loaded = Skeleton::load(&path).unwrap();
        assert_eq!(loaded, skeleton);

        let missing = Skeleton::load(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.code(), "RIG_041");
    }
}
