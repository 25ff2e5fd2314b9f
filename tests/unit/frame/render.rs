use super::*;
use crate::frame::spec::MatOption;

const PPI: f64 = 10.0;

fn artwork(w: u32, h: u32) -> Raster {
    let mut r = Raster::transparent(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = ((x * 7 + y * 13) % 256) as u8;
            r.set_pixel(x, y, [v, 255 - v, 128, 255]);
        }
    }
    r
}

fn mean_luma(r: &Raster, rect: PixelRect) -> f32 {
    let mut sum = 0.0;
    let mut n = 0.0;
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let p = r.pixel(x, y);
            sum += f32::from(p[0]) + f32::from(p[1]) + f32::from(p[2]);
            n += 3.0;
        }
    }
    sum / n
}

#[test]
fn none_none_is_pixel_identical() {
    let mut art = artwork(17, 23);
    art.set_pixel(3, 3, [0, 0, 0, 0]);
    art.set_pixel(4, 4, [40, 20, 10, 64]);
    let out = render_framed(&art, &FrameSpec::none(), &MatSpec::none(), PPI).unwrap();
    assert_eq!(out.raster, art);
    assert_eq!(out.artwork, PixelRect::new(0, 0, 17, 23));
}

#[test]
fn canvas_wrap_without_mat_is_pixel_identical() {
    let art = artwork(9, 5);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::CanvasWrap).with_border_in(4.0),
        &MatSpec::none(),
        PPI,
    )
    .unwrap();
    assert_eq!(out.raster, art);
}

#[test]
fn outer_size_is_art_plus_two_mats_plus_two_borders_for_every_style() {
    let art = artwork(30, 40);
    for style in FrameStyle::ALL {
        for mat in [MatSpec::none(), MatSpec::new(MatOption::White, 2.0)] {
            let frame = FrameSpec::new(style);
            let frame_px = frame.border_px(PPI).unwrap();
            let mat_px = mat.width_px(PPI).unwrap();
            let out = render_framed(&art, &frame, &mat, PPI).unwrap();
            assert_eq!(out.raster.width, 30 + 2 * mat_px + 2 * frame_px, "{style}");
            assert_eq!(out.raster.height, 40 + 2 * mat_px + 2 * frame_px, "{style}");
            assert_eq!(out.frame_px, frame_px);
            assert_eq!(out.mat_px, mat_px);
        }
    }
}

#[test]
fn artwork_pixels_are_preserved_inside_the_window() {
    let art = artwork(12, 8);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::ClassicGold).with_border_in(1.0),
        &MatSpec::new(MatOption::Cream, 1.5),
        PPI,
    )
    .unwrap();
    assert_eq!(out.artwork, PixelRect::new(25, 25, 12, 8));
    for y in 0..8 {
        for x in 0..12 {
            assert_eq!(out.raster.pixel(25 + x, 25 + y), art.pixel(x, y));
        }
    }
}

#[test]
fn flat_frame_has_hard_edges_around_the_mat() {
    let art = artwork(10, 10);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::ThinBlack).with_border_in(0.5),
        &MatSpec::new(MatOption::White, 1.0),
        PPI,
    )
    .unwrap();
    let black = FrameStyle::ThinBlack.base_color().opaque();
    let white = MatOption::White.color().unwrap().opaque();
    assert_eq!(out.raster.pixel(0, 0), black);
    assert_eq!(out.raster.pixel(4, 15), black);
    assert_eq!(out.raster.pixel(5, 15), white);
    assert!(out.raster.is_opaque());
}

#[test]
fn transparent_artwork_is_flattened_over_the_mat() {
    let art = Raster::transparent(4, 4).unwrap();
    let out = render_framed(
        &art,
        &FrameSpec::none(),
        &MatSpec::new(MatOption::Black, 1.0),
        PPI,
    )
    .unwrap();
    assert!(out.raster.is_opaque());
    assert_eq!(
        out.raster.pixel(11, 11),
        MatOption::Black.color().unwrap().opaque()
    );
}

#[test]
fn metallic_top_rail_is_lit_and_bottom_rail_is_shaded() {
    let art = artwork(40, 40);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::ClassicSilver).with_border_in(2.0),
        &MatSpec::none(),
        PPI,
    )
    .unwrap();
    let w = out.raster.width;
    let h = out.raster.height;
    let top = mean_luma(&out.raster, PixelRect::new(20, 0, w - 40, 20));
    let bottom = mean_luma(&out.raster, PixelRect::new(20, h - 20, w - 40, 20));
    assert!(top > bottom + 10.0, "top {top} bottom {bottom}");
}

#[test]
fn metallic_border_is_a_gradient_not_a_flat_fill() {
    let art = artwork(20, 20);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::OrnateGold).with_border_in(3.0),
        &MatSpec::none(),
        PPI,
    )
    .unwrap();
    let mut distinct = std::collections::BTreeSet::new();
    for y in 0..30 {
        distinct.insert(out.raster.pixel(40, y));
    }
    assert!(distinct.len() > 5);
}

#[test]
fn wood_grain_is_deterministic_and_varies_per_species() {
    let art = artwork(20, 20);
    let oak = FrameSpec::new(FrameStyle::NaturalOak).with_border_in(2.0);
    let a = render_framed(&art, &oak, &MatSpec::none(), PPI).unwrap();
    let b = render_framed(&art, &oak, &MatSpec::none(), PPI).unwrap();
    assert_eq!(a.raster, b.raster);

    let walnut = FrameSpec::new(FrameStyle::NaturalWalnut).with_border_in(2.0);
    let c = render_framed(&art, &walnut, &MatSpec::none(), PPI).unwrap();
    assert_ne!(a.raster, c.raster);

    let rail: std::collections::BTreeSet<_> = (0..60).map(|x| a.raster.pixel(x, 10)).collect();
    assert!(rail.len() > 3);
}

#[test]
fn floating_border_is_shadow_only() {
    let art = artwork(30, 30);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::FloatingBlack).with_border_in(2.4),
        &MatSpec::none(),
        PPI,
    )
    .unwrap();
    let r = &out.raster;
    assert_eq!(out.frame_px, 24);
    assert_eq!(r.pixel(0, 0)[3], 0);
    let below = r.pixel(r.width / 2, r.height - 24 + 8);
    assert!(below[3] > 0 && below[3] < 255, "{below:?}");
    for y in 24..54 {
        for x in 24..54 {
            assert_eq!(r.pixel(x, y)[3], 255);
        }
    }
    assert_eq!(r.pixel(23, 40), FrameStyle::FloatingBlack.base_color().opaque());
}

#[test]
fn shadow_box_darkens_the_mat_under_the_top_rail() {
    let art = artwork(20, 20);
    let out = render_framed(
        &art,
        &FrameSpec::new(FrameStyle::ShadowBox).with_border_in(1.5),
        &MatSpec::new(MatOption::White, 2.0),
        PPI,
    )
    .unwrap();
    let panel = out.panel();
    let near_top = out.raster.pixel(panel.x + panel.width / 2, panel.y);
    let deep = out.raster.pixel(panel.x + panel.width / 2, panel.y + 12);
    assert!(near_top[0] < deep[0]);
    assert_eq!(deep, MatOption::White.color().unwrap().opaque());
}

#[test]
fn colour_override_replaces_style_colour() {
    let art = artwork(8, 8);
    let mut frame = FrameSpec::new(FrameStyle::ThinWhite).with_border_in(0.5);
    frame.color = Some(Rgb8::new(200, 10, 10));
    let out = render_framed(&art, &frame, &MatSpec::none(), PPI).unwrap();
    assert_eq!(out.raster.pixel(0, 0), [200, 10, 10, 255]);
}

#[test]
fn invalid_ppi_is_rejected() {
    let art = artwork(2, 2);
    assert!(render_framed(&art, &FrameSpec::none(), &MatSpec::none(), 0.0).is_err());
}
