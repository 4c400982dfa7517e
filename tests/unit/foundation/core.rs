use super::*;

#[test]
fn resolution_rejects_zero_dimensions() {
    assert!(Resolution::new(0, 10).is_err());
    assert!(Resolution::new(10, 0).is_err());
    let r = Resolution::new(100, 50).unwrap();
    assert_eq!(r.pixel_count(), 5000);
}

#[test]
fn ids_serialize_as_plain_strings() {
    let id = NodeId::new("harbor");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"harbor\"");
    let vp: ViewpointId = serde_json::from_str("\"overhead\"").unwrap();
    assert_eq!(vp.as_str(), "overhead");
    assert_eq!(vp.to_string(), "overhead");
}

#[test]
fn unit_to_u8_clamps_and_rounds() {
    assert_eq!(unit_to_u8(-0.5), 0);
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(3.0), 255);
    assert_eq!(unit_to_u8(f32::NAN), 0);
    assert_eq!(unit_to_u8(f32::INFINITY), 255);
}

#[test]
fn rgb_scale_multiplies_each_channel() {
    let c = Rgb([0.2, 0.4, 0.5]).scale(2.0);
    assert_eq!(c, Rgb([0.4, 0.8, 1.0]));
    assert_eq!(c.to_rgb8(), [102, 204, 255]);
}
