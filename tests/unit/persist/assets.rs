use super::*;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_persist_assets").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_import_settings_match_capture_defaults() {
    let s = ImportSettings::default();
    assert_eq!(s.max_size, 1024);
    assert_eq!(s.compression, TextureCompression::Compressed);
    assert!(s.crunched);
    assert_eq!(s.quality, 30);
    s.validate().unwrap();
}

#[test]
fn import_settings_validation_catches_bad_values() {
    let zero = ImportSettings {
        max_size: 0,
        ..ImportSettings::default()
    };
    assert!(zero.validate().is_err());

    let over = ImportSettings {
        quality: 101,
        ..ImportSettings::default()
    };
    assert!(over.validate().is_err());
}

#[test]
fn asset_path_is_prefixed_and_forward_slashed() {
    let root = Path::new("project");
    let p = root.join("CapturedMaps").join("Map_1.png");
    assert_eq!(
        asset_path(root, &p).unwrap(),
        "Assets/CapturedMaps/Map_1.png"
    );
    assert!(asset_path(root, Path::new("elsewhere/Map_1.png")).is_err());
}

#[test]
fn no_asset_pipeline_accepts_everything() {
    let mut p = NoAssetPipeline;
    assert!(!p.supports_import());
    p.register_asset("Assets/x.png").unwrap();
    p.configure_import("Assets/x.png", &ImportSettings::default())
        .unwrap();
}

#[test]
fn json_index_persists_registrations_and_imports() {
    let root = fresh_dir("persists");

    let mut index = JsonAssetIndex::open(&root).unwrap();
    assert!(index.is_empty());
    assert!(index.supports_import());

    index.register_asset("Assets/CapturedMaps/Map_1.png").unwrap();
    index
        .configure_import(
            "Assets/CapturedMaps/Map_1.png",
            &ImportSettings::default(),
        )
        .unwrap();
    assert!(index.path().exists());

    let reopened = JsonAssetIndex::open(&root).unwrap();
    assert_eq!(reopened.len(), 1);
    let entry = reopened.get("Assets/CapturedMaps/Map_1.png").unwrap();
    assert_eq!(entry.import, Some(ImportSettings::default()));
}

#[test]
fn json_index_rejects_import_for_unregistered_asset() {
    let root = fresh_dir("unregistered");
    let mut index = JsonAssetIndex::open(&root).unwrap();
    assert!(
        index
            .configure_import("Assets/missing.png", &ImportSettings::default())
            .is_err()
    );
}

#[test]
fn reregistering_keeps_import_settings() {
    let root = fresh_dir("reregister");
    let mut index = JsonAssetIndex::open(&root).unwrap();
    index.register_asset("Assets/a.png").unwrap();
    index
        .configure_import("Assets/a.png", &ImportSettings::default())
        .unwrap();
    index.register_asset("Assets/a.png").unwrap();
    assert!(index.get("Assets/a.png").unwrap().import.is_some());
}
