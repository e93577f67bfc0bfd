mod common;

use invoice_pdf::{ColorSpace, ImageError, RasterImage, Size};

use common::{encode_png, gray_png};

#[test]
fn decodes_gray_png() {
    let image = RasterImage::from_png_bytes(&gray_png(3, 2)).unwrap();
    assert_eq!((image.width, image.height), (3, 2));
    assert_eq!(image.color_space, ColorSpace::DeviceGray);
    assert_eq!(image.pixels, vec![0, 1, 2, 0, 1, 2]);
    assert!(image.alpha.is_none());
    assert_eq!(image.size(), Size::new(3.0, 2.0));
}

#[test]
fn rgba_png_splits_alpha() {
    let data = [10, 20, 30, 255, 40, 50, 60, 0];
    let png = encode_png(2, 1, png::ColorType::Rgba, &data);
    let image = RasterImage::from_png_bytes(&png).unwrap();
    assert_eq!(image.color_space, ColorSpace::DeviceRGB);
    assert_eq!(image.pixels, vec![10, 20, 30, 40, 50, 60]);
    assert_eq!(image.alpha, Some(vec![255, 0]));
}

#[test]
fn reads_png_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.png");
    std::fs::write(&path, gray_png(8, 16)).unwrap();
    let image = RasterImage::from_png_file(&path).unwrap();
    assert_eq!(image.size(), Size::new(8.0, 16.0));
}

#[test]
fn truncated_png_is_a_decode_error() {
    let png = gray_png(8, 8);
    let result = RasterImage::from_png_bytes(&png[..png.len() / 2]);
    assert!(matches!(result, Err(ImageError::Decode(_))));
}

#[test]
fn missing_file_is_io_error() {
    let result = RasterImage::from_png_file("/nonexistent/capture.png");
    assert!(matches!(result, Err(ImageError::Io(_))));
}
