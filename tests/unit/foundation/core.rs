use super::*;

#[test]
fn unit_parsing_accepts_aliases_and_rejects_unknown() {
    assert_eq!("in".parse::<Unit>().unwrap(), Unit::Inches);
    assert_eq!(" Inches ".parse::<Unit>().unwrap(), Unit::Inches);
    assert_eq!("\"".parse::<Unit>().unwrap(), Unit::Inches);
    assert_eq!("CM".parse::<Unit>().unwrap(), Unit::Centimeters);
    let err = "mm".parse::<Unit>().unwrap_err();
    assert!(matches!(err, MockupError::InvalidDimension(_)));
}

#[test]
fn physical_size_rejects_non_positive_and_non_finite() {
    assert!(PhysicalSize::new(24.0, 36.0, Unit::Inches).is_ok());
    for (w, h) in [(0.0, 1.0), (1.0, 0.0), (-3.0, 2.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
        let err = PhysicalSize::new(w, h, Unit::Inches).unwrap_err();
        assert!(matches!(err, MockupError::InvalidDimension(_)), "{w}x{h}");
    }
}

#[test]
fn centimeters_convert_to_inches() {
    let s = PhysicalSize::new(25.4, 50.8, Unit::Centimeters).unwrap();
    assert!((s.width_in() - 10.0).abs() < 1e-9);
    assert!((s.height_in() - 20.0).abs() < 1e-9);
}

#[test]
fn artwork_orientation_uses_two_unit_square_band() {
    let sq = PhysicalSize::new(20.0, 21.5, Unit::Inches).unwrap();
    assert_eq!(Orientation::for_artwork(&sq), Orientation::Square);
    let land = PhysicalSize::new(36.0, 24.0, Unit::Inches).unwrap();
    assert_eq!(Orientation::for_artwork(&land), Orientation::Landscape);
    let port = PhysicalSize::new(24.0, 36.0, Unit::Inches).unwrap();
    assert_eq!(Orientation::for_artwork(&port), Orientation::Portrait);
}

#[test]
fn pixel_orientation_tolerates_near_square() {
    assert_eq!(Orientation::of_pixels(PixelSize::new(1024, 1024)), Orientation::Square);
    assert_eq!(Orientation::of_pixels(PixelSize::new(1010, 1000)), Orientation::Square);
    assert_eq!(Orientation::of_pixels(PixelSize::new(1792, 1024)), Orientation::Landscape);
    assert_eq!(Orientation::of_pixels(PixelSize::new(1024, 1792)), Orientation::Portrait);
}

#[test]
fn rect_clamp_and_fit() {
    let bounds = PixelSize::new(100, 50);
    let r = PixelRect::new(90, 40, 20, 20);
    assert!(!r.fits_within(bounds));
    assert_eq!(r.clamp_to(bounds), Some(PixelRect::new(90, 40, 10, 10)));
    assert_eq!(PixelRect::new(100, 0, 5, 5).clamp_to(bounds), None);
    assert!(PixelRect::new(0, 0, 100, 50).fits_within(bounds));
}

#[test]
fn rgb_hex_parse_and_serde() {
    let c = Rgb8::from_hex("#C9A227").unwrap();
    assert_eq!(c, Rgb8::new(0xc9, 0xa2, 0x27));
    assert!(Rgb8::from_hex("#12345").is_err());
    assert!(Rgb8::from_hex("zzzzzz").is_err());

    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#c9a227\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
