use kurbo::{Point, Rect};

use super::*;
use crate::scene::{
    context::SceneContext,
    memory::{EmitterDef, NodeDef, SceneBuilder},
};

fn res(w: u32, h: u32) -> Resolution {
    Resolution::new(w, h).unwrap()
}

fn assert_rgb_near(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() <= 1.0 / 255.0, "{actual:?} vs {expected:?}");
    }
}

fn scene_with_map() -> MemoryScene {
    SceneBuilder::new()
        .background(Rgb([0.0, 0.0, 0.0]))
        .node(
            NodeDef::new("map")
                .shape(Rect::new(-5.0, -5.0, 5.0, 5.0), Rgb([1.0, 0.0, 0.0])),
        )
        .node(
            NodeDef::new("fx")
                .parent("map")
                .emitter(EmitterDef::new(Point::new(0.0, 0.0), 60.0, Rgb([0.0, 1.0, 0.0]))),
        )
        .node(NodeDef::new("cam").camera(Point::new(0.0, 0.0), 20.0))
        .build()
        .unwrap()
}

#[test]
fn output_matches_requested_resolution() {
    let scene = scene_with_map();
    let buf = FlatRenderer::new()
        .render(&scene, &ViewpointId::new("cam"), res(40, 30))
        .unwrap();
    assert_eq!((buf.width, buf.height), (40, 30));
    buf.validate().unwrap();
}

#[test]
fn shapes_of_active_nodes_are_drawn_over_background() {
    let mut scene = scene_with_map();
    let cam = ViewpointId::new("cam");
    let mut r = FlatRenderer::new();

    let buf = r.render(&scene, &cam, res(20, 20)).unwrap();
    assert_rgb_near(buf.pixel(10, 10).unwrap(), [1.0, 0.0, 0.0]);
    assert_rgb_near(buf.pixel(0, 0).unwrap(), [0.0, 0.0, 0.0]);

    scene.set_active(&NodeId::new("map"), false);
    let buf = r.render(&scene, &cam, res(20, 20)).unwrap();
    assert_rgb_near(buf.pixel(10, 10).unwrap(), [0.0, 0.0, 0.0]);
}

#[test]
fn ambient_light_tints_shapes() {
    let mut scene = SceneBuilder::new()
        .node(NodeDef::new("sun").light(0.5))
        .node(NodeDef::new("floor").shape(Rect::new(-50.0, -50.0, 50.0, 50.0), Rgb([1.0, 1.0, 1.0])))
        .node(NodeDef::new("cam").camera(Point::new(0.0, 0.0), 10.0))
        .build()
        .unwrap();
    scene.refresh_lighting();

    let buf = FlatRenderer::new()
        .render(&scene, &ViewpointId::new("cam"), res(8, 8))
        .unwrap();
    assert_rgb_near(buf.pixel(4, 4).unwrap(), [0.5, 0.5, 0.5]);
}

#[test]
fn live_particles_show_up_only_after_simulation() {
    let mut scene = scene_with_map();
    let cam = ViewpointId::new("cam");
    let fx = NodeId::new("fx");
    let mut r = FlatRenderer::new();

    let before = r.render(&scene, &cam, res(20, 20)).unwrap();
    assert_rgb_near(before.pixel(10, 10).unwrap(), [1.0, 0.0, 0.0]);

    scene.play_emitter(&fx);
    scene.simulate_emitter(&fx, 1.0);
    let after = r.render(&scene, &cam, res(20, 20)).unwrap();
    let green = after
        .data
        .chunks_exact(3)
        .filter(|px| px[1] > 0.5 && px[0] < 0.5)
        .count();
    assert!(green > 0);
}

#[test]
fn unknown_viewpoint_is_a_render_error() {
    let scene = scene_with_map();
    let err = FlatRenderer::new()
        .render(&scene, &ViewpointId::new("map"), res(4, 4))
        .unwrap_err();
    assert!(matches!(err, CaptureError::Render(_)));
}

#[test]
fn oversized_target_is_rejected() {
    let scene = scene_with_map();
    assert!(
        FlatRenderer::new()
            .render(&scene, &ViewpointId::new("cam"), res(70_000, 4))
            .is_err()
    );
}
