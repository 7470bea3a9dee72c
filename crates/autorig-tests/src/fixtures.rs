//! Humanoid skeleton fixtures.
//!
//! Geometry follows the host frame: Z up, the character faces -Y and its
//! left side is +X. Arms and legs are slightly bent so limb IK has a bend
//! plane.

use autorig_skeleton::{Finger, Side, Skeleton, Vec3, ROOT_BONE};

/// Bone naming scheme of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `{Part}{Index}_{Side}`, as produced by the symmetrizer.
    Canonical,
    /// Vendor prefixes such as `J_Bip_L_Hand` and `J_Sec_Hair1_01`.
    Vrm,
}

/// Builder for a humanoid skeleton.
#[derive(Debug, Clone)]
pub struct HumanoidFixture {
    naming: Naming,
    fingers: bool,
    springs: bool,
}

impl Default for HumanoidFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanoidFixture {
    /// Canonical names with fingers and spring bones.
    pub fn new() -> Self {
        Self {
            naming: Naming::Canonical,
            fingers: true,
            springs: true,
        }
    }

    /// Use vendor-prefixed names.
    pub fn vrm(mut self) -> Self {
        self.naming = Naming::Vrm;
        self
    }

    /// Leave out every finger bone.
    pub fn without_fingers(mut self) -> Self {
        self.fingers = false;
        self
    }

    /// Leave out hair, bust and skirt bones.
    pub fn without_springs(mut self) -> Self {
        self.springs = false;
        self
    }

    fn body(&self, part: &str) -> String {
        match self.naming {
            Naming::Canonical => part.to_string(),
            Naming::Vrm => format!("J_Bip_C_{}", part),
        }
    }

    fn sided(&self, part: &str, side: Side) -> String {
        match self.naming {
            Naming::Canonical => format!("{}_{}", part, side.letter()),
            Naming::Vrm => format!("J_Bip_{}_{}", side.letter(), part),
        }
    }

    fn secondary(&self, part: &str, side: Option<Side>) -> String {
        match (self.naming, side) {
            (Naming::Canonical, Some(side)) => format!("{}_{}", part, side.letter()),
            (Naming::Canonical, None) => part.to_string(),
            (Naming::Vrm, Some(side)) => format!("J_Sec_{}_{}", side.letter(), part),
            (Naming::Vrm, None) => format!("J_Sec_{}", part),
        }
    }

    /// Builds the skeleton.
    pub fn build(&self) -> Skeleton {
        let mut skeleton = Skeleton::new();
        {
            let mut edit = skeleton.edit();
            edit.add_bone(ROOT_BONE, Vec3::zeros(), Vec3::new(0.0, 0.0, 0.1), None)
                .expect("Failed to add root bone");
            let mut add = |name: &str, head: Vec3, tail: Vec3, parent: &str| {
                edit.add_bone(name, head, tail, Some(parent))
                    .unwrap_or_else(|err| panic!("fixture bone '{}': {}", name, err));
            };

            let hips = self.body("Hips");
            let spine = self.body("Spine");
            let chest = self.body("Chest");
            let neck = self.body("Neck");
            let head = self.body("Head");
            add(&hips, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.1), ROOT_BONE);
            add(&spine, Vec3::new(0.0, 0.0, 1.1), Vec3::new(0.0, 0.0, 1.25), &hips);
            add(&chest, Vec3::new(0.0, 0.0, 1.25), Vec3::new(0.0, 0.0, 1.4), &spine);
            add(&neck, Vec3::new(0.0, 0.0, 1.4), Vec3::new(0.0, 0.0, 1.5), &chest);
            add(&head, Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.0, 0.0, 1.7), &neck);

            for side in Side::ALL {
                let s = match side {
                    Side::Left => 1.0,
                    Side::Right => -1.0,
                };
                let at = |x: f64, y: f64, z: f64| Vec3::new(x * s, y, z);

                let shoulder = self.sided("Shoulder", side);
                let upper_arm = self.sided("UpperArm", side);
                let lower_arm = self.sided("LowerArm", side);
                let hand = self.sided("Hand", side);
                add(&shoulder, at(0.02, 0.0, 1.4), at(0.12, 0.0, 1.4), &chest);
                add(&upper_arm, at(0.15, 0.0, 1.4), at(0.42, 0.01, 1.4), &shoulder);
                add(&lower_arm, at(0.42, 0.01, 1.4), at(0.66, 0.0, 1.4), &upper_arm);
                add(&hand, at(0.66, 0.0, 1.4), at(0.74, 0.0, 1.4), &lower_arm);

                if self.fingers {
                    for finger in Finger::ALL {
                        let (base, step) = match finger {
                            Finger::Thumb => (at(0.68, -0.03, 1.39), at(0.018, -0.018, 0.0)),
                            Finger::Index => (at(0.74, -0.02, 1.4), at(0.025, 0.0, 0.0)),
                            Finger::Middle => (at(0.745, 0.0, 1.4), at(0.027, 0.0, 0.0)),
                            Finger::Ring => (at(0.74, 0.02, 1.4), at(0.025, 0.0, 0.0)),
                            Finger::Little => (at(0.73, 0.035, 1.4), at(0.02, 0.0, 0.0)),
                        };
                        let mut parent = hand.clone();
                        for segment in 1..=3usize {
                            let name = self.sided(&format!("{}{}", finger.part(), segment), side);
                            let joint = base + step * (segment - 1) as f64;
                            add(&name, joint, joint + step, &parent);
                            parent = name;
                        }
                    }
                }

                let upper_leg = self.sided("UpperLeg", side);
                let lower_leg = self.sided("LowerLeg", side);
                let foot = self.sided("Foot", side);
                add(&upper_leg, at(0.09, 0.0, 0.95), at(0.09, -0.01, 0.5), &hips);
                add(&lower_leg, at(0.09, -0.01, 0.5), at(0.09, 0.0, 0.08), &upper_leg);
                add(&foot, at(0.09, 0.0, 0.08), at(0.09, -0.12, 0.02), &lower_leg);

                if self.springs {
                    let bust = self.secondary("Bust1", Some(side));
                    add(&bust, at(0.08, -0.08, 1.3), at(0.08, -0.12, 1.3), &chest);
                }
            }

            if self.springs {
                let mut parent = head.clone();
                for index in 1..=3 {
                    let name = self.secondary(&format!("Hair1_{:02}", index), None);
                    let top = 1.75 - 0.05 * (index - 1) as f64;
                    let tip = Vec3::new(0.0, 0.1, top - 0.05);
                    add(&name, Vec3::new(0.0, 0.08, top), tip, &parent);
                    parent = name;
                }
            }
        }
        skeleton
    }
}

/// Canonically named humanoid with fingers and spring bones.
pub fn humanoid() -> Skeleton {
    HumanoidFixture::new().build()
}

/// Vendor-named humanoid with fingers and spring bones.
pub fn vrm_humanoid() -> Skeleton {
    HumanoidFixture::new().vrm().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_fixture() {
        let skeleton = humanoid();
        skeleton.validate().unwrap();
        for name in ["Root", "Hand_L", "Thumb3_R", "LowerLeg_L", "Hair1_03", "Bust1_R"] {
            assert!(skeleton.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_vrm_fixture() {
        let skeleton = vrm_humanoid();
        skeleton.validate().unwrap();
        assert!(skeleton.contains("J_Bip_L_Hand"));
        assert!(skeleton.contains("J_Bip_C_Hips"));
        assert!(skeleton.contains("J_Sec_Hair1_01"));
        assert!(skeleton.contains("J_Sec_R_Bust1"));
        assert_eq!(skeleton.len(), humanoid().len());
    }

    #[test]
    fn test_without_parts() {
        let skeleton = HumanoidFixture::new()
            .without_fingers()
            .without_springs()
            .build();
        assert!(!skeleton.contains("Index1_L"));
        assert!(!skeleton.contains("Hair1_01"));
        assert!(skeleton.contains("Hand_R"));
    }
}
