//! Spring bone tagging.
//!
//! Only flags bones for the host's physics engine; nothing is simulated here.

use autorig_skeleton::{RigConfig, RigResult, Skeleton, SpringParams, SpringSettings};
use regex::Regex;

/// Tags bones matching the default hair, bust and skirt pattern.
pub fn enable_spring_bones(skeleton: &mut Skeleton) -> RigResult<Vec<String>> {
    enable_spring_bones_with(skeleton, &RigConfig::default().spring)
}

/// Tags every bone whose name matches `settings.pattern` with spring
/// parameters and returns the tagged names in order.
pub fn enable_spring_bones_with(
    skeleton: &mut Skeleton,
    settings: &SpringSettings,
) -> RigResult<Vec<String>> {
    let pattern = Regex::new(&settings.pattern)?;
    let matched: Vec<String> = skeleton
        .bone_names()
        .filter(|name| pattern.is_match(name))
        .map(str::to_string)
        .collect();

    let params = SpringParams {
        enabled: true,
        rotation: true,
        stiffness: settings.stiffness,
        damping: settings.damping,
        gravity: settings.gravity,
    };
    for name in &matched {
        skeleton.bone_mut(name)?.spring = Some(params.clone());
    }

    tracing::info!(pattern = %settings.pattern, tagged = matched.len(), "enabled spring bones");
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorig_skeleton::Vec3;
    use pretty_assertions::assert_eq;

    fn skeleton(names: &[&str]) -> Skeleton {
        let mut skeleton = Skeleton::new();
        {
            let mut edit = skeleton.edit();
            for name in names {
                edit.add_bone(name, Vec3::zeros(), Vec3::z(), None).unwrap();
            }
        }
        skeleton
    }

    #[test]
    fn test_default_pattern() {
        let mut skeleton = skeleton(&[
            "Hair1_03",
            "Bust1_L",
            "SkirtFront_end_01_L",
            "SkirtSide_2_R",
            "Hand_L",
            "HairBand_L",
        ]);
        let tagged = enable_spring_bones(&mut skeleton).unwrap();
        assert_eq!(
            tagged,
            vec!["Bust1_L", "Hair1_03", "SkirtFront_end_01_L", "SkirtSide_2_R"]
        );
        let spring = skeleton.bone("Hair1_03").unwrap().spring.clone().unwrap();
        assert!(spring.enabled && spring.rotation);
        assert_eq!(spring.stiffness, 0.3);
        assert_eq!(spring.damping, 0.5);
        assert_eq!(spring.gravity, 0.0);
        assert!(skeleton.bone("Hand_L").unwrap().spring.is_none());
    }

    #[test]
    fn test_custom_settings() {
        let mut skeleton = skeleton(&["Tail1", "Tail2", "Hips"]);
        let settings = SpringSettings {
            pattern: r"^Tail\d+$".into(),
            stiffness: 0.8,
            ..SpringSettings::default()
        };
        let tagged = enable_spring_bones_with(&mut skeleton, &settings).unwrap();
        assert_eq!(tagged, vec!["Tail1", "Tail2"]);
        assert_eq!(skeleton.bone("Tail2").unwrap().spring.as_ref().unwrap().stiffness, 0.8);
    }

    #[test]
    fn test_invalid_pattern() {
        let mut skeleton = skeleton(&["Hair1_01"]);
        let settings = SpringSettings {
            pattern: "(".into(),
            ..SpringSettings::default()
        };
        let err = enable_spring_bones_with(&mut skeleton, &settings).unwrap_err();
        assert_eq!(err.code(), "RIG_006");
        assert!(skeleton.bone("Hair1_01").unwrap().spring.is_none());
    }
}
