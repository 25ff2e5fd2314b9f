use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_at_clips_negative_and_overflowing_origins() {
    let mut dst = Raster::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let src = Raster::filled(3, 3, [255, 255, 255, 255]).unwrap();
    over_at(&mut dst, &src, -1, 2, 1.0);
    assert_eq!(dst.pixel(0, 2), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(1, 3), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(2, 2), [0, 0, 0, 255]);
    assert_eq!(dst.pixel(0, 1), [0, 0, 0, 255]);

    let before = dst.clone();
    over_at(&mut dst, &src, 10, 10, 1.0);
    assert_eq!(dst, before);
}

#[test]
fn paint_mask_respects_alpha_cap() {
    let mut dst = Raster::filled(2, 1, [255, 255, 255, 255]).unwrap();
    let mask = [255u8, 0u8];
    paint_mask(&mut dst, &mask, 2, 1, (0, 0), Rgb8::new(0, 0, 0), 0.25).unwrap();
    let shaded = dst.pixel(0, 0);
    assert!(shaded[0] >= 190 && shaded[0] <= 192, "{shaded:?}");
    assert_eq!(dst.pixel(1, 0), [255, 255, 255, 255]);
}

#[test]
fn paint_mask_rejects_mismatched_mask() {
    let mut dst = Raster::filled(2, 2, [0, 0, 0, 255]).unwrap();
    assert!(paint_mask(&mut dst, &[1, 2, 3], 2, 2, (0, 0), Rgb8::new(0, 0, 0), 1.0).is_err());
}

#[test]
fn mean_color_of_uniform_region() {
    let r = Raster::filled(4, 4, [40, 80, 120, 255]).unwrap();
    assert_eq!(
        mean_color(&r, PixelRect::new(1, 1, 2, 2)),
        Some(Rgb8::new(40, 80, 120))
    );
    assert_eq!(mean_color(&r, PixelRect::new(9, 9, 2, 2)), None);
}

#[test]
fn tint_with_white_light_is_identity() {
    let mut r = Raster::filled(2, 2, [40, 80, 120, 255]).unwrap();
    let before = r.clone();
    tint_multiply(&mut r, Rgb8::new(255, 255, 255), 0.5);
    assert_eq!(r, before);
}

#[test]
fn tint_with_warm_light_reduces_blue() {
    let mut r = Raster::filled(1, 1, [200, 200, 200, 255]).unwrap();
    tint_multiply(&mut r, Rgb8::new(255, 230, 180), 0.5);
    let px = r.pixel(0, 0);
    assert_eq!(px[0], 200);
    assert!(px[2] < px[1] && px[1] < px[0]);
}
