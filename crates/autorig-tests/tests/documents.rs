//! Skeleton and config documents on disk.

use autorig_skeleton::{RigConfig, RigError, Skeleton};
use autorig_synth::RecordedWeights;
use autorig_tests::{rig_humanoid, vrm_humanoid};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_rigged_skeleton_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("rig.json");

    let mut skeleton = vrm_humanoid();
    rig_humanoid(&mut skeleton, &mut RecordedWeights::new(), &RigConfig::default()).unwrap();
    skeleton.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));
    let loaded = Skeleton::load(&path).unwrap();
    assert_eq!(loaded, skeleton);
    assert_eq!(loaded.to_json_pretty().unwrap(), skeleton.to_json_pretty().unwrap());
}

#[test]
fn test_document_shape() {
    let mut skeleton = vrm_humanoid();
    rig_humanoid(&mut skeleton, &mut RecordedWeights::new(), &RigConfig::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&skeleton.to_json().unwrap()).unwrap();

    let thumb = &value["bones"]["Thumb2_L"];
    assert_eq!(thumb["drivers"][0]["channel"], "z");
    assert_eq!(thumb["drivers"][0]["expression"], "-(var - 1) * 2");
    let lower = &value["bones"]["LowerArm_L"];
    assert_eq!(lower["deform"], false);
    assert_eq!(lower["constraints"][0]["name"], "AUTORIG_LimbIK");
    assert_eq!(lower["constraints"][0]["kind"]["type"], "ik");
    assert!(value["bones"]["Root"].get("parent").is_none());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = Skeleton::load(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.code(), "RIG_041");
    assert!(matches!(err, RigError::Io { .. }));
}

#[test]
fn test_load_rejects_unknown_parent() {
    let json = r#"{
        "bones": {
            "Hand_L": { "head": [0.0, 0.0, 0.0], "tail": [0.1, 0.0, 0.0], "parent": "Arm" }
        }
    }"#;
    let err = Skeleton::from_json(json).unwrap_err();
    assert_eq!(err.code(), "RIG_003");
}

#[test]
fn test_load_rejects_unknown_fields() {
    let json = r#"{ "bones": {}, "armature": "Body" }"#;
    let err = Skeleton::from_json(json).unwrap_err();
    assert_eq!(err.code(), "RIG_040");
}

#[test]
fn test_config_overrides() {
    let json = r#"{
        "twist": { "segments": 4 },
        "spring": { "pattern": "^Tail\\d+$", "stiffness": 0.7 }
    }"#;
    let config = RigConfig::from_json(json).unwrap();
    assert_eq!(config.twist.segments, 4);
    assert_eq!(config.twist.max_influence, 0.9);
    assert_eq!(config.spring.pattern, r"^Tail\d+$");
    assert_eq!(config.spring.damping, 0.5);
    assert_eq!(config.finger, RigConfig::default().finger);

    let round_trip = RigConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
    assert_eq!(round_trip, config);
}

#[test]
fn test_config_rejects_invalid_values() {
    let err = RigConfig::from_json(r#"{ "twist": { "segments": 0 } }"#).unwrap_err();
    assert_eq!(err.code(), "RIG_007");
    assert_eq!(err.to_string(), "invalid config field 'twist.segments': must be at least 1");

    let err = RigConfig::from_json(r#"{ "limb": { "pole_lenght": 0.2 } }"#).unwrap_err();
    assert_eq!(err.code(), "RIG_040");
}

#[test]
fn test_rig_with_custom_config() {
    let config = RigConfig::from_json(r#"{ "twist": { "segments": 2 } }"#).unwrap();
    let mut skeleton = vrm_humanoid();
    rig_humanoid(&mut skeleton, &mut RecordedWeights::new(), &config).unwrap();
    assert!(skeleton.contains("LowerArm2_L"));
    assert!(!skeleton.contains("LowerArm3_L"));
    let last = skeleton.bone("LowerArm2_L").unwrap().constraints()[0].influence;
    assert_eq!(last, 0.9);
}
