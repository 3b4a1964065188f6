use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_keep_straight_alpha() {
    let src_rgba = vec![100u8, 50, 200, 128, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.height, 1);
    assert_eq!(decoded.rgba8, src_rgba);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn pixel_data_rejects_length_mismatch() {
    assert!(PixelData::new(2, 2, vec![0; 15]).is_err());
    assert!(PixelData::new(2, 2, vec![0; 16]).is_ok());
}
