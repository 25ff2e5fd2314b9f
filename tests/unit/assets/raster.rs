use super::*;

#[test]
fn filled_and_pixel_access() {
    let mut r = Raster::filled(3, 2, [1, 2, 3, 255]).unwrap();
    assert_eq!(r.data.len(), 24);
    assert_eq!(r.pixel(2, 1), [1, 2, 3, 255]);
    r.set_pixel(0, 1, [9, 9, 9, 9]);
    assert_eq!(r.pixel(0, 1), [9, 9, 9, 9]);
    assert!(!r.is_opaque());
}

#[test]
fn from_premul_checks_length() {
    assert!(Raster::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(Raster::from_premul(2, 2, vec![0; 15]).is_err());
}

#[test]
fn fill_rect_clips_to_bounds() {
    let mut r = Raster::transparent(4, 4).unwrap();
    r.fill_rect(PixelRect::new(2, 2, 10, 10), [5, 5, 5, 255]);
    assert_eq!(r.pixel(1, 1), [0, 0, 0, 0]);
    assert_eq!(r.pixel(3, 3), [5, 5, 5, 255]);
    assert_eq!(r.data.chunks_exact(4).filter(|p| p[3] == 255).count(), 4);
}

#[test]
fn straight_images_are_premultiplied() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let r = Raster::from_straight(img);
    assert_eq!(
        r.pixel(0, 0),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn flatten_premul_over_black_keeps_rgb() {
    let r = Raster::from_premul(1, 1, vec![128, 0, 0, 128]).unwrap();
    assert_eq!(r.flatten_rgb8([0, 0, 0]), vec![128, 0, 0]);
    let r = Raster::from_premul(1, 1, vec![0, 0, 0, 0]).unwrap();
    assert_eq!(r.flatten_rgb8([10, 20, 30]), vec![10, 20, 30]);
}
