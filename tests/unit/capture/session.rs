use super::*;
use crate::{
    config::model::MapDescriptor,
    scene::memory::{MemoryScene, NodeDef, SceneBuilder},
};

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn scene() -> MemoryScene {
    SceneBuilder::new()
        .node(NodeDef::new("map_1").inactive())
        .node(NodeDef::new("map_2"))
        .node(NodeDef::new("map_3"))
        .node(NodeDef::new("hud"))
        .node(NodeDef::new("gizmo").inactive())
        .build()
        .unwrap()
}

fn config() -> CaptureConfig {
    CaptureConfig {
        maps: vec![
            MapDescriptor::default(),
            MapDescriptor::new("map_1"),
            MapDescriptor::new("map_3"),
            MapDescriptor::new("map_2"),
        ],
        objects_to_hide: vec![Some(id("hud")), None, Some(id("ghost")), Some(id("gizmo"))],
        ..CaptureConfig::default()
    }
}

#[test]
fn begin_hides_objects_and_records_first_active_map() {
    let mut scene = scene();
    let session = CaptureSession::begin(&config(), &mut scene);

    assert_eq!(session.previously_active_map(), Some(&id("map_3")));
    assert!(!scene.is_active(&id("hud")));
    assert!(!scene.is_active(&id("gizmo")));
}

#[test]
fn restore_round_trips_visibility() {
    let mut scene = scene();
    let session = CaptureSession::begin(&config(), &mut scene);

    for m in ["map_1", "map_2", "map_3"] {
        scene.set_active(&id(m), false);
    }
    session.restore(&mut scene);

    assert!(scene.is_active(&id("hud")));
    assert!(!scene.is_active(&id("gizmo")));
    assert!(scene.is_active(&id("map_3")));
    assert!(!scene.is_active(&id("map_2")));
}

#[test]
fn no_active_map_records_none() {
    let mut scene = SceneBuilder::new()
        .node(NodeDef::new("a").inactive())
        .build()
        .unwrap();
    let cfg = CaptureConfig {
        maps: vec![MapDescriptor::new("a"), MapDescriptor::new("missing")],
        ..CaptureConfig::default()
    };
    let session = CaptureSession::begin(&cfg, &mut scene);
    assert_eq!(session.previously_active_map(), None);
    session.restore(&mut scene);
    assert!(!scene.is_active(&id("a")));
}

#[test]
fn node_listed_twice_keeps_its_original_flag() {
    let mut scene = scene();
    let cfg = CaptureConfig {
        objects_to_hide: vec![Some(id("hud")), Some(id("hud"))],
        ..CaptureConfig::default()
    };
    let session = CaptureSession::begin(&cfg, &mut scene);
    assert!(!scene.is_active(&id("hud")));
    session.restore(&mut scene);
    assert!(scene.is_active(&id("hud")));
}

#[test]
fn hidden_ancestor_does_not_hide_the_active_map() {
    let mut scene = SceneBuilder::new()
        .node(NodeDef::new("level_root"))
        .node(NodeDef::new("map_1").parent("level_root"))
        .node(NodeDef::new("map_2").parent("level_root").inactive())
        .build()
        .unwrap();
    let cfg = CaptureConfig {
        maps: vec![MapDescriptor::new("map_1"), MapDescriptor::new("map_2")],
        objects_to_hide: vec![Some(id("level_root"))],
        ..CaptureConfig::default()
    };

    let session = CaptureSession::begin(&cfg, &mut scene);
    assert_eq!(session.previously_active_map(), Some(&id("map_1")));
    assert!(!scene.is_active(&id("map_1")));

    scene.set_active(&id("map_1"), false);
    session.restore(&mut scene);
    assert!(scene.is_active(&id("map_1")));
    assert!(!scene.is_active(&id("map_2")));
}
