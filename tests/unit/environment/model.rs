use std::io::Cursor;

use super::*;
use crate::foundation::core::Unit;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([220, 215, 205]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn request(w: f64, h: f64) -> EnvironmentRequest {
    EnvironmentRequest::for_artwork(PhysicalSize::new(w, h, Unit::Inches).unwrap())
}

#[test]
fn generation_size_follows_artwork_orientation() {
    assert_eq!(request(24.0, 36.0).generation_size(), PixelSize::new(1024, 1792));
    assert_eq!(request(36.0, 24.0).generation_size(), PixelSize::new(1792, 1024));
    // sides closer than two units are square
    assert_eq!(request(20.0, 21.5).generation_size(), PixelSize::new(1024, 1024));
}

#[test]
fn category_round_trips_through_kebab_case() {
    for c in EnvironmentCategory::ALL {
        assert_eq!(c.as_str().parse::<EnvironmentCategory>().unwrap(), c);
    }
    assert_eq!(
        "Living Room".parse::<EnvironmentCategory>().unwrap(),
        EnvironmentCategory::LivingRoom
    );
    assert!("garage".parse::<EnvironmentCategory>().is_err());
}

#[test]
fn meta_uses_camel_case_keys() {
    let meta: EnvironmentMeta = serde_json::from_str(
        r#"{"name":"Loft","category":"loft","wallColor":"exposed brick","orientation":"landscape",
            "wallRegion":{"x":10,"y":20,"width":300,"height":200}}"#,
    )
    .unwrap();
    assert_eq!(meta.category, EnvironmentCategory::Loft);
    assert_eq!(meta.wall_color.as_deref(), Some("exposed brick"));
    assert_eq!(meta.wall_region, Some(PixelRect::new(10, 20, 300, 200)));
    assert!(meta.tags.is_empty());
}

#[test]
fn decode_corrects_declared_orientation() {
    let asset = EnvironmentAsset {
        bytes: png(64, 32),
        meta: EnvironmentMeta::untitled(Orientation::Portrait),
    };
    let decoded = asset.decode().unwrap();
    assert_eq!(decoded.meta.orientation, Orientation::Landscape);
    assert_eq!(decoded.raster.size(), PixelSize::new(64, 32));
}

#[test]
fn from_bytes_infers_orientation_from_header() {
    let asset = EnvironmentAsset::from_bytes(png(30, 30)).unwrap();
    assert_eq!(asset.meta.orientation, Orientation::Square);
    assert!(EnvironmentAsset::from_bytes(b"nope".to_vec()).is_err());
}

#[test]
fn prompt_includes_description_and_staging() {
    let mut req = request(24.0, 36.0);
    req.prompt = Some("  a sunlit scandinavian living room ".to_owned());
    let p = req.render_prompt();
    assert!(p.starts_with("a sunlit scandinavian living room."));
    assert!(p.contains("completely blank"));

    let mut req = request(24.0, 36.0);
    req.category = Some(EnvironmentCategory::LivingRoom);
    assert!(req.render_prompt().starts_with("a living room interior."));
}
