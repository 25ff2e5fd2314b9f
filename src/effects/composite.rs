use crate::{
    assets::raster::Raster,
    foundation::{
        core::{PixelRect, Rgb8},
        error::{MockupError, MockupResult},
        math::{add_sat_u8, mul_div255},
    },
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels, with an extra opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` over `dst` with `src`'s top-left at `(x, y)`; clipped to `dst`.
pub fn over_at(dst: &mut Raster, src: &Raster, x: i64, y: i64, opacity: f32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (y + i64::from(src.height)).min(i64::from(dst.height));
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for dy in y0..y1 {
        let sy = (dy - y) as u32;
        for dx in x0..x1 {
            let sx = (dx - x) as u32;
            let s = src.pixel(sx, sy);
            if s[3] == 0 {
                continue;
            }
            let d = dst.pixel(dx as u32, dy as u32);
            dst.set_pixel(dx as u32, dy as u32, over(d, s, opacity));
        }
    }
}

/// Paint a solid colour through an 8-bit coverage mask placed at `(x, y)`.
///
/// `max_alpha` caps the resulting coverage; used for shadows.
pub fn paint_mask(
    dst: &mut Raster,
    mask: &[u8],
    mask_width: u32,
    mask_height: u32,
    origin: (i64, i64),
    color: Rgb8,
    max_alpha: f32,
) -> MockupResult<()> {
    if mask.len() != (mask_width as usize) * (mask_height as usize) {
        return Err(MockupError::validation(
            "paint_mask expects mask matching width*height",
        ));
    }
    let cap = ((max_alpha.clamp(0.0, 1.0) * 255.0).round()) as u16;
    if cap == 0 {
        return Ok(());
    }
    let (x, y) = origin;
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(mask_width)).min(i64::from(dst.width));
    let y1 = (y + i64::from(mask_height)).min(i64::from(dst.height));
    for dy in y0..y1 {
        let my = (dy - y) as usize;
        for dx in x0..x1 {
            let mx = (dx - x) as usize;
            let cov = mask[my * mask_width as usize + mx];
            if cov == 0 {
                continue;
            }
            let a = mul_div255(u16::from(cov), cap);
            let src = [
                mul_div255(u16::from(color.r), u16::from(a)),
                mul_div255(u16::from(color.g), u16::from(a)),
                mul_div255(u16::from(color.b), u16::from(a)),
                a,
            ];
            let d = dst.pixel(dx as u32, dy as u32);
            dst.set_pixel(dx as u32, dy as u32, over(d, src, 1.0));
        }
    }
    Ok(())
}

/// Mean straight colour of the opaque-weighted pixels inside `rect`.
pub fn mean_color(raster: &Raster, rect: PixelRect) -> Option<Rgb8> {
    let r = rect.clamp_to(raster.size())?;
    let mut acc = [0u64; 4];
    for y in r.y..r.y + r.height {
        for x in r.x..r.x + r.width {
            let px = raster.pixel(x, y);
            for c in 0..4 {
                acc[c] += u64::from(px[c]);
            }
        }
    }
    if acc[3] == 0 {
        return None;
    }
    // premultiplied sums divided by alpha sum give the straight mean
    let f = |c: u64| ((c * 255 + acc[3] / 2) / acc[3]).min(255) as u8;
    Some(Rgb8::new(f(acc[0]), f(acc[1]), f(acc[2])))
}

/// Multiply-tint a raster towards `light`, mixing by `strength` in `[0, 1]`.
///
/// Neutral white light leaves pixels unchanged.
pub fn tint_multiply(raster: &mut Raster, light: Rgb8, strength: f32) {
    let s = ((strength.clamp(0.0, 1.0) * 255.0).round()) as u16;
    if s == 0 {
        return;
    }
    let light = [light.r, light.g, light.b];
    for px in raster.data.chunks_exact_mut(4) {
        for c in 0..3 {
            let lit = mul_div255(u16::from(px[c]), u16::from(light[c]));
            px[c] -= mul_div255(u16::from(px[c] - lit), s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
