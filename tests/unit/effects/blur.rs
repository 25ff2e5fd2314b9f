use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = blur_mask(&src, 3, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_mask_is_identity() {
    let (w, h) = (6u32, 5u32);
    let src = vec![90u8; (w * h) as usize];
    let out = blur_mask(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(3 * w + 3) as usize] = 255;

    let out = blur_mask(&src, w, h, 2, 1.2).unwrap();

    assert!(out.iter().filter(|&&a| a != 0).count() > 1);
    let sum: u32 = out.iter().map(|&a| u32::from(a)).sum();
    assert!((sum as i32 - 255).abs() <= 6);
}

#[test]
fn blur_is_deterministic() {
    let (w, h) = (16u32, 9u32);
    let src: Vec<u8> = (0..w * h).map(|i| (i * 37 % 251) as u8).collect();
    let a = blur_mask(&src, w, h, 4, sigma_for_radius(4)).unwrap();
    let b = blur_mask(&src, w, h, 4, sigma_for_radius(4)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blur_rejects_bad_inputs() {
    assert!(blur_mask(&[0u8; 5], 2, 2, 1, 1.0).is_err());
    assert!(blur_mask(&[0u8; 4], 2, 2, 1, 0.0).is_err());
}
