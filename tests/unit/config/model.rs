use super::*;

#[test]
fn defaults_match_the_capture_tool() {
    let cfg = CaptureConfig::default();
    assert_eq!(cfg.folder_location, "CapturedMaps");
    assert_eq!((cfg.resolution_width, cfg.resolution_height), (1920, 1080));
    assert_eq!(cfg.gamma, 2.2);
    assert_eq!(cfg.import, ImportSettings::default());
    cfg.validate().unwrap();
}

#[test]
fn json_fills_in_defaults() {
    let json = r#"{
        "capture_camera": "main_cam",
        "maps": [
            { "map": "harbor", "custom_name": "Harbor" },
            { "map": null },
            { "map": "docks", "additional_cameras": [ { "camera": "overhead" }, { "camera": null } ] }
        ],
        "resolution_width": 100,
        "resolution_height": 100
    }"#;
    let cfg = CaptureConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.capture_camera, Some(ViewpointId::new("main_cam")));
    assert_eq!(cfg.maps.len(), 3);
    assert_eq!(cfg.maps[0].custom_name(), Some("Harbor"));
    assert!(cfg.maps[1].map.is_none());
    assert_eq!(cfg.maps[2].additional_cameras.len(), 2);
    assert_eq!(cfg.folder_location, "CapturedMaps");
    assert_eq!(cfg.resolution().unwrap(), Resolution::new(100, 100).unwrap());
    cfg.validate().unwrap();
}

#[test]
fn empty_custom_names_count_as_unset() {
    let m = MapDescriptor::new("a").named("");
    assert_eq!(m.custom_name(), None);
    let b = CameraBinding::new("cam").named("");
    assert_eq!(b.custom_image_name(), None);
    assert_eq!(CameraBinding::new("cam").named("Top").custom_image_name(), Some("Top"));
}

#[test]
fn validation_catches_bad_values() {
    let bad = |f: fn(&mut CaptureConfig)| {
        let mut cfg = CaptureConfig::default();
        f(&mut cfg);
        cfg.validate().is_err()
    };
    assert!(bad(|c| c.resolution_width = 0));
    assert!(bad(|c| c.resolution_height = 0));
    assert!(bad(|c| c.gamma = 0.0));
    assert!(bad(|c| c.gamma = f32::INFINITY));
    assert!(bad(|c| c.particle_step_secs = -1.0));
    assert!(bad(|c| c.folder_location = "../outside".to_string()));
    assert!(bad(|c| c.folder_location = "/abs".to_string()));
    assert!(bad(|c| c.folder_location = String::new()));
    assert!(bad(|c| c.import.quality = 200));
    assert!(bad(|c| c.maps = vec![MapDescriptor::new("a").named("sub/dir")]));
    assert!(bad(|c| {
        c.maps = vec![MapDescriptor::new("a").with_camera(CameraBinding::new("cam").named(".."))]
    }));
}

#[test]
fn output_dir_joins_normalized_parts() {
    let cfg = CaptureConfig {
        folder_location: "Shots\\maps/./day".to_string(),
        ..CaptureConfig::default()
    };
    assert_eq!(
        cfg.output_dir(Path::new("root")).unwrap(),
        Path::new("root").join("Shots").join("maps").join("day")
    );
    assert_eq!(normalize_rel_dir("a//b/").unwrap(), "a/b");
}

#[test]
fn project_parses_scene_and_capture() {
    let json = r#"{
        "scene": { "nodes": [ { "id": "cam", "camera": { "center": { "x": 0.0, "y": 0.0 }, "view_height": 1.0 } } ] },
        "capture": { "capture_camera": "cam", "maps": [] }
    }"#;
    let project = CaptureProject::from_reader(json.as_bytes()).unwrap();
    assert_eq!(project.capture.capture_camera, Some(ViewpointId::new("cam")));
    assert_eq!(project.scene.nodes().count(), 1);

    assert!(CaptureProject::from_reader("{".as_bytes()).is_err());
    assert!(CaptureConfig::from_path("target/definitely/missing.json").is_err());
}

#[test]
fn colons_are_only_rejected_as_drive_prefixes() {
    assert_eq!(normalize_rel_dir("shots:v2/day").unwrap(), "shots:v2/day");
    assert!(normalize_rel_dir("C:\\Shots").is_err());
    assert!(normalize_rel_dir("c:/Shots").is_err());
    assert!(normalize_rel_dir("D:").is_err());
}
