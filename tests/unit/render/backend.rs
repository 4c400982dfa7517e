use super::*;

#[test]
fn filled_buffer_has_expected_shape() {
    let buf = PixelBuffer::filled(Resolution::new(4, 3).unwrap(), Rgb([0.1, 0.2, 0.3]));
    assert_eq!(buf.data.len(), 4 * 3 * 3);
    buf.validate().unwrap();
    assert_eq!(buf.pixel(3, 2), Some([0.1, 0.2, 0.3]));
    assert_eq!(buf.pixel(4, 0), None);
}

#[test]
fn validate_rejects_mismatched_length() {
    let buf = PixelBuffer {
        width: 2,
        height: 2,
        data: vec![0.0; 11],
    };
    assert!(buf.validate().is_err());

    let empty = PixelBuffer {
        width: 0,
        height: 2,
        data: vec![],
    };
    assert!(empty.validate().is_err());
}
