use super::*;

fn plan(framed: (u32, u32), env: (u32, u32), wall: Option<PixelRect>) -> Placement {
    let env = PixelSize::new(env.0, env.1);
    plan_placement(
        PixelSize::new(framed.0, framed.1),
        env,
        Orientation::of_pixels(env),
        wall,
        &PlacementPolicy::default(),
    )
    .unwrap()
}

#[test]
fn portrait_frame_in_landscape_room() {
    let p = plan((1600, 2200), (1792, 1024), None);
    assert!(!p.fitted);
    // long edge takes 35% of the wall width
    assert_eq!(p.rect.height, 627);
    assert!(p.rect.fits_within(PixelSize::new(1792, 1024)));
    let left = p.rect.x;
    let right = 1792 - p.rect.right() as u32;
    assert_eq!(left, right);
}

#[test]
fn square_art_is_centred_with_equal_margins() {
    let p = plan((1000, 1000), (1024, 1024), None);
    assert_eq!(p.rect.width, p.rect.height);
    assert_eq!(p.rect.x, 1024 - p.rect.right() as u32);
    // centred at 45% of the wall height
    let centre = f64::from(p.rect.y) + f64::from(p.rect.height) / 2.0;
    assert!((centre - 0.45 * 1024.0).abs() <= 1.0);
}

#[test]
fn odd_leftover_width_is_evened_out() {
    let p = plan((999, 500), (1001, 1001), None);
    assert_eq!((1001 - p.rect.width) % 2, 0);
    assert_eq!(p.rect.x, 1001 - p.rect.right() as u32);
}

#[test]
fn aspect_survives_rounding_and_parity() {
    for framed in [(1600, 2200), (3000, 400), (400, 3000), (777, 778)] {
        for env in [(1792, 1024), (1024, 1792), (1024, 1024), (640, 480)] {
            let p = plan(framed, env, None);
            let r = f64::from(framed.1) / f64::from(framed.0);
            let w = f64::from(p.rect.width);
            let h = f64::from(p.rect.height);
            let deviation = (h - w * r).abs().min((w - h / r).abs());
            assert!(
                deviation <= 2.0,
                "framed={framed:?} env={env:?} rect={:?}",
                p.rect
            );
        }
    }
}

#[test]
fn rect_always_fits_the_environment() {
    let framed_sizes = [(1, 1), (5000, 5000), (10000, 10), (10, 10000), (1600, 2200)];
    let envs = [(1, 1), (2, 3), (17, 9), (1792, 1024), (1024, 1792), (4096, 64)];
    for framed in framed_sizes {
        for env in envs {
            let p = plan(framed, env, None);
            assert!(p.rect.width >= 1 && p.rect.height >= 1);
            assert!(
                p.rect.fits_within(PixelSize::new(env.0, env.1)),
                "framed={framed:?} env={env:?} rect={:?}",
                p.rect
            );
        }
    }
}

#[test]
fn extreme_aspect_shrinks_to_fit() {
    // a tall strip in a short wide room cannot reach 35% of the width by its long edge alone
    let p = plan((10, 10000), (4096, 64), None);
    assert!(p.fitted);
    assert!(p.rect.bottom() <= 64);
}

#[test]
fn wall_region_constrains_placement() {
    let wall = PixelRect::new(200, 100, 800, 600);
    let p = plan((1000, 1000), (1792, 1024), Some(wall));
    assert_eq!(p.wall, wall);
    assert!(p.rect.x >= 200 && p.rect.right() <= 1000);
    assert!(p.rect.y >= 100 && p.rect.bottom() <= 700);
    assert_eq!(p.rect.x - 200, 1000 - p.rect.right() as u32);
}

#[test]
fn wall_region_outside_raster_is_clamped() {
    let wall = PixelRect::new(1500, 900, 1000, 1000);
    let p = plan((500, 500), (1792, 1024), Some(wall));
    assert_eq!(p.wall, PixelRect::new(1500, 900, 292, 124));
    assert!(p.rect.fits_within(PixelSize::new(1792, 1024)));
}

#[test]
fn disjoint_wall_region_falls_back_to_full_raster() {
    let wall = PixelRect::new(5000, 5000, 10, 10);
    let p = plan((500, 500), (1024, 1024), Some(wall));
    assert_eq!(p.wall, PixelRect::new(0, 0, 1024, 1024));
}

#[test]
fn zero_area_inputs_are_rejected() {
    let policy = PlacementPolicy::default();
    let err = plan_placement(
        PixelSize::new(0, 10),
        PixelSize::new(100, 100),
        Orientation::Square,
        None,
        &policy,
    )
    .unwrap_err();
    assert!(matches!(err, MockupError::Validation(_)));
    assert!(
        plan_placement(
            PixelSize::new(10, 10),
            PixelSize::new(100, 0),
            Orientation::Square,
            None,
            &policy,
        )
        .is_err()
    );
}

#[test]
fn policy_validation_rejects_out_of_range_values() {
    let bad = PlacementPolicy {
        anchor_ratio: 1.5,
        ..PlacementPolicy::default()
    };
    assert!(bad.validate().is_err());
    let bad = PlacementPolicy {
        square_fraction: 0.0,
        ..PlacementPolicy::default()
    };
    assert!(bad.validate().is_err());
    let bad = PlacementPolicy {
        margin_ratio: 0.5,
        ..PlacementPolicy::default()
    };
    assert!(bad.validate().is_err());
    assert!(PlacementPolicy::default().validate().is_ok());
}

#[test]
fn policy_deserializes_with_defaults() {
    let p: PlacementPolicy = serde_json::from_str(r#"{"anchor_ratio":0.5}"#).unwrap();
    assert_eq!(p.anchor_ratio, 0.5);
    assert_eq!(p.landscape_fraction, 0.35);
}
