use super::*;
use crate::foundation::core::PixelRect;

const WALL: [u8; 4] = [128, 128, 128, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn wall() -> Raster {
    Raster::filled(200, 200, WALL).unwrap()
}

fn placement(x: u32, y: u32, w: u32, h: u32, scale: f64) -> Placement {
    Placement {
        rect: PixelRect::new(x, y, w, h),
        wall: PixelRect::new(0, 0, 200, 200),
        scale,
        fitted: false,
    }
}

fn no_light() -> LightingOpts {
    LightingOpts { strength: 0.0 }
}

#[test]
fn resample_to_same_size_is_identity() {
    let mut r = Raster::filled(30, 20, RED).unwrap();
    r.set_pixel(3, 3, [10, 20, 30, 40]);
    let out = resample(&r, r.size()).unwrap();
    assert_eq!(out.data, r.data);
}

#[test]
fn resample_keeps_premultiplied_invariant() {
    let mut r = Raster::transparent(64, 64).unwrap();
    r.fill_rect(PixelRect::new(16, 16, 32, 32), [255, 255, 255, 255]);
    let out = resample(&r, PixelSize::new(23, 41)).unwrap();
    assert_eq!(out.size(), PixelSize::new(23, 41));
    for px in out.data.chunks_exact(4) {
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
}

#[test]
fn resample_rejects_empty_target() {
    let r = Raster::filled(4, 4, RED).unwrap();
    assert!(resample(&r, PixelSize::new(0, 4)).is_err());
}

#[test]
fn artwork_lands_on_the_planned_rect() {
    let mut env = wall();
    let framed = Raster::filled(50, 50, RED).unwrap();
    let shadow = ShadowOpts {
        enabled: false,
        ..ShadowOpts::default()
    };
    composite_onto(&mut env, &framed, &placement(50, 50, 50, 50, 1.0), 0.0, &shadow, &no_light())
        .unwrap();
    assert_eq!(env.pixel(50, 50), RED);
    assert_eq!(env.pixel(99, 99), RED);
    assert_eq!(env.pixel(49, 50), WALL);
    assert_eq!(env.pixel(100, 99), WALL);
}

#[test]
fn room_light_tints_the_artwork() {
    let mut env = wall();
    let framed = Raster::filled(50, 50, RED).unwrap();
    let shadow = ShadowOpts {
        enabled: false,
        ..ShadowOpts::default()
    };
    composite_onto(
        &mut env,
        &framed,
        &placement(50, 50, 50, 50, 1.0),
        0.0,
        &shadow,
        &LightingOpts::default(),
    )
    .unwrap();
    let px = env.pixel(75, 75);
    assert!(px[0] < 255 && px[0] > 230, "{px:?}");
    assert_eq!(px[1], 0);
}

#[test]
fn contact_shadow_darkens_below_not_above() {
    let mut env = wall();
    let framed = Raster::filled(50, 50, RED).unwrap();
    composite_onto(
        &mut env,
        &framed,
        &placement(50, 50, 50, 50, 1.0),
        20.0,
        &ShadowOpts::default(),
        &no_light(),
    )
    .unwrap();
    let below = env.pixel(75, 103);
    assert!(below[0] < 100, "{below:?}");
    assert_eq!(env.pixel(75, 45), WALL);
    assert_eq!(env.pixel(75, 75), RED);
}

#[test]
fn deeper_frames_cast_longer_shadows() {
    let framed = Raster::filled(50, 50, RED).unwrap();
    let mut shallow = wall();
    let mut deep = wall();
    let p = placement(50, 50, 50, 50, 1.0);
    composite_onto(&mut shallow, &framed, &p, 4.0, &ShadowOpts::default(), &no_light()).unwrap();
    composite_onto(&mut deep, &framed, &p, 40.0, &ShadowOpts::default(), &no_light()).unwrap();
    assert!(deep.pixel(75, 112)[0] < shallow.pixel(75, 112)[0]);
}

#[test]
fn framed_raster_is_scaled_into_the_rect() {
    let mut env = wall();
    let framed = Raster::filled(400, 400, RED).unwrap();
    let shadow = ShadowOpts {
        enabled: false,
        ..ShadowOpts::default()
    };
    composite_onto(&mut env, &framed, &placement(10, 20, 40, 40, 0.1), 0.0, &shadow, &no_light())
        .unwrap();
    assert_eq!(env.pixel(10, 20), RED);
    assert_eq!(env.pixel(49, 59), RED);
    assert_eq!(env.pixel(50, 60), WALL);
}

#[test]
fn out_of_bounds_placement_is_rejected() {
    let mut env = wall();
    let framed = Raster::filled(10, 10, RED).unwrap();
    let err = composite_onto(
        &mut env,
        &framed,
        &placement(195, 0, 10, 10, 1.0),
        0.0,
        &ShadowOpts::default(),
        &no_light(),
    )
    .unwrap_err();
    assert!(matches!(err, MockupError::Validation(_)));
    assert_eq!(env.data, wall().data);
}

#[test]
fn lighting_strength_is_validated() {
    assert!(LightingOpts { strength: 1.5 }.validate().is_err());
    assert!(LightingOpts::default().validate().is_ok());
}
