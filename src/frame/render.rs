use std::f32::consts::{PI, TAU};

use crate::{
    assets::raster::Raster,
    effects::{
        blur::{blur_mask, sigma_for_radius},
        composite::{over_at, paint_mask},
    },
    foundation::{
        core::{PixelRect, Rgb8},
        error::{MockupError, MockupResult},
        math::{lattice, seed_for, value_noise},
    },
    frame::spec::{FrameFamily, FrameSpec, FrameStyle, MatSpec},
};

/// Paper shown behind transparent artwork when there is a frame but no mat.
const BACKING: Rgb8 = Rgb8::new(0xfb, 0xfb, 0xf8);
/// White core exposed by the mat's bevel cut.
const MAT_CORE: Rgb8 = Rgb8::new(0xfa, 0xf8, 0xf2);
const FLOATING_SHADOW_ALPHA: f32 = 0.45;

/// Output of [`render_framed`].
#[derive(Clone, Debug)]
pub struct FramedRaster {
    /// Flattened frame + mat + artwork.
    pub raster: Raster,
    /// Where the artwork pixels sit inside `raster`.
    pub artwork: PixelRect,
    /// Mat width in pixels.
    pub mat_px: u32,
    /// Frame border width in pixels.
    pub frame_px: u32,
    /// Style the border was drawn with.
    pub style: FrameStyle,
}

impl FramedRaster {
    /// Mat + artwork region (everything inside the frame border).
    pub fn panel(&self) -> PixelRect {
        PixelRect::new(
            self.frame_px,
            self.frame_px,
            self.raster.width - 2 * self.frame_px,
            self.raster.height - 2 * self.frame_px,
        )
    }
}

/// Surround `artwork` with a mat and a frame border.
///
/// Outer size is exactly `artwork + 2 * mat_px + 2 * frame_px` on each axis. With no mat and no
/// border the artwork is returned untouched.
#[tracing::instrument(skip(artwork), fields(style = %frame.style, mat = %mat.option, w = artwork.width, h = artwork.height))]
pub fn render_framed(
    artwork: &Raster,
    frame: &FrameSpec,
    mat: &MatSpec,
    ppi: f64,
) -> MockupResult<FramedRaster> {
    if !ppi.is_finite() || ppi <= 0.0 {
        return Err(MockupError::validation(format!("ppi must be > 0 (got {ppi})")));
    }
    let frame_px = frame.border_px(ppi)?;
    let mat_px = mat.width_px(ppi)?;
    let family = frame.style.family();

    if frame_px == 0 && mat_px == 0 {
        return Ok(FramedRaster {
            raster: artwork.clone(),
            artwork: PixelRect::new(0, 0, artwork.width, artwork.height),
            mat_px: 0,
            frame_px: 0,
            style: frame.style,
        });
    }

    let panel_w = grow(artwork.width, mat_px)?;
    let panel_h = grow(artwork.height, mat_px)?;
    let outer_w = grow(panel_w, frame_px)?;
    let outer_h = grow(panel_h, frame_px)?;
    let panel = PixelRect::new(frame_px, frame_px, panel_w, panel_h);
    let art = PixelRect::new(
        frame_px + mat_px,
        frame_px + mat_px,
        artwork.width,
        artwork.height,
    );

    let mut out = Raster::transparent(outer_w, outer_h)?;
    paint_frame(&mut out, frame, family, frame_px, panel)?;

    let board = mat.option.color().unwrap_or(BACKING);
    out.fill_rect(panel, board.opaque());
    if mat_px > 0 {
        paint_mat_bevel(&mut out, art, mat_px);
    }
    over_at(&mut out, artwork, i64::from(art.x), i64::from(art.y), 1.0);

    match family {
        FrameFamily::ShadowBox if frame_px > 0 => {
            inner_shadow(&mut out, panel, (frame_px / 3).max(1));
        }
        FrameFamily::Floating if frame_px > 0 => {
            let lip = (frame_px / 12).max(1);
            let c = frame.color();
            fill_strips(&mut out, panel, lip, [c, c.shade(0.9), c.shade(0.85), c]);
        }
        _ => {}
    }

    tracing::debug!(outer_w, outer_h, frame_px, mat_px, "framed raster rendered");
    Ok(FramedRaster {
        raster: out,
        artwork: art,
        mat_px,
        frame_px,
        style: frame.style,
    })
}

fn grow(v: u32, border: u32) -> MockupResult<u32> {
    border
        .checked_mul(2)
        .and_then(|b| v.checked_add(b))
        .ok_or_else(|| MockupError::invalid_dimension("framed size exceeds pixel range"))
}

fn paint_frame(
    out: &mut Raster,
    frame: &FrameSpec,
    family: FrameFamily,
    bw: u32,
    panel: PixelRect,
) -> MockupResult<()> {
    if bw == 0 {
        return Ok(());
    }
    let color = frame.color();
    match family {
        FrameFamily::Borderless => {
            return Err(MockupError::unsupported_frame_style(format!(
                "{} cannot carry a {bw}px border",
                frame.style
            )));
        }
        FrameFamily::Flat => paint_ring(out, bw, |_| color.opaque()),
        FrameFamily::Metallic => paint_ring(out, bw, |p| metallic(color, p, false)),
        FrameFamily::Ornate => paint_ring(out, bw, |p| metallic(color, p, true)),
        FrameFamily::Wood => {
            let seed = seed_for(frame.style.as_str());
            paint_ring(out, bw, |p| wood(color, seed, p));
        }
        FrameFamily::ShadowBox => paint_ring(out, bw, |p| shadow_box(color, p)),
        FrameFamily::Floating => floating_shadow(out, bw, panel)?,
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Key light from the upper left.
    fn light(self) -> f32 {
        match self {
            Side::Top => 1.10,
            Side::Left => 1.04,
            Side::Right => 0.90,
            Side::Bottom => 0.82,
        }
    }

    fn salt(self) -> u64 {
        match self {
            Side::Top => 0x11,
            Side::Right => 0x22,
            Side::Bottom => 0x33,
            Side::Left => 0x44,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RingPixel {
    side: Side,
    /// Pixels from the outer edge.
    depth: u32,
    /// Normalised depth across the moulding, in `(0, 1)`.
    t: f32,
    /// Position along the rail.
    along: u32,
    /// On a mitre diagonal.
    mitre: bool,
    width: u32,
}

/// Visit every pixel within `bw` of the raster edge. Corners are mitred: each pixel belongs to
/// the nearest edge, horizontal rails winning ties.
fn paint_ring(out: &mut Raster, bw: u32, mut shade: impl FnMut(RingPixel) -> [u8; 4]) {
    let (w, h) = (out.width, out.height);
    let mut visit = |out: &mut Raster, x: u32, y: u32| {
        let (dl, dr, dt, db) = (x, w - 1 - x, y, h - 1 - y);
        let depth = dl.min(dr).min(dt).min(db);
        if depth >= bw {
            return;
        }
        let (side, along) = if dt == depth {
            (Side::Top, x)
        } else if db == depth {
            (Side::Bottom, x)
        } else if dl == depth {
            (Side::Left, y)
        } else {
            (Side::Right, y)
        };
        let mitre = (dt == depth || db == depth) && (dl == depth || dr == depth);
        let px = shade(RingPixel {
            side,
            depth,
            t: (depth as f32 + 0.5) / bw as f32,
            along,
            mitre,
            width: bw,
        });
        out.set_pixel(x, y, px);
    };
    for y in 0..h {
        if y < bw || y >= h.saturating_sub(bw) {
            for x in 0..w {
                visit(&mut *out, x, y);
            }
        } else {
            for x in (0..bw.min(w)).chain(w.saturating_sub(bw).max(bw)..w) {
                visit(&mut *out, x, y);
            }
        }
    }
}

fn metallic(base: Rgb8, p: RingPixel, ornate: bool) -> [u8; 4] {
    let t = p.t;
    let mut k = 0.80 + 0.32 * (PI * t).sin();
    k *= p.side.light();
    if t < 0.10 {
        k += 0.18 * (1.0 - t / 0.10);
    }
    if t > 0.88 {
        k *= 0.72;
    }
    if ornate {
        k *= 1.0 + 0.10 * (t * PI * 7.0).cos();
        if (0.45..0.70).contains(&t) {
            let period = (p.width as f32 * 0.35).max(4.0);
            let bead = 0.5 + 0.5 * (p.along as f32 / period * TAU).cos();
            k *= 0.88 + 0.24 * bead;
        }
    }
    if p.mitre {
        k *= 0.9;
    }
    base.shade(k).opaque()
}

fn wood(base: Rgb8, seed: u64, p: RingPixel) -> [u8; 4] {
    let along = p.along as f32;
    let warp = value_noise(seed ^ p.side.salt(), along * 0.012) * 3.0;
    let g = value_noise(seed, p.depth as f32 * 0.4 + warp);
    let rings = 0.5 + 0.5 * (g * 14.0).sin();
    let fibre = lattice(seed ^ 0x5a5a, i64::from(p.along) * 131 + i64::from(p.depth));
    let mut k = 0.86 + 0.16 * rings + 0.05 * (fibre - 0.5);
    k *= 1.0 + (p.side.light() - 1.0) * 0.5;
    if p.mitre {
        k *= 0.8;
    }
    base.shade(k).opaque()
}

fn shadow_box(base: Rgb8, p: RingPixel) -> [u8; 4] {
    let mut k = p.side.light();
    if p.t < 0.06 {
        k *= 1.15;
    }
    if p.t > 0.75 {
        k *= 0.75;
    }
    base.shade(k).opaque()
}

/// Soft shadow of the floating panel cast down-right into the (otherwise transparent) border.
fn floating_shadow(out: &mut Raster, bw: u32, panel: PixelRect) -> MockupResult<()> {
    let (w, h) = (out.width, out.height);
    let mut mask = vec![0u8; (w as usize) * (h as usize)];
    let (dx, dy) = (bw / 6, bw / 4);
    let shrink = bw / 8;
    for y in panel.y + shrink..panel.y + panel.height - shrink {
        let sy = y + dy;
        if sy >= h {
            break;
        }
        for x in panel.x + shrink..panel.x + panel.width - shrink {
            let sx = x + dx;
            if sx >= w {
                break;
            }
            mask[(sy as usize) * (w as usize) + sx as usize] = 255;
        }
    }
    let radius = (bw / 3).max(1);
    let blurred = blur_mask(&mask, w, h, radius, sigma_for_radius(radius))?;
    paint_mask(
        out,
        &blurred,
        w,
        h,
        (0, 0),
        Rgb8::new(0, 0, 0),
        FLOATING_SHADOW_ALPHA,
    )
}

/// Bevel-cut window edge: a thin strip of white core around the artwork.
fn paint_mat_bevel(out: &mut Raster, art: PixelRect, mat_px: u32) {
    let bev = (mat_px / 48).max(1);
    if mat_px < 2 * bev {
        return;
    }
    let lit = MAT_CORE;
    let shaded = MAT_CORE.shade(0.92);
    fill_strips(out, art, bev, [shaded, lit, lit, shaded]);
}

/// Fill a `width`-pixel band just outside `inner` with top/right/bottom/left colours.
fn fill_strips(out: &mut Raster, inner: PixelRect, width: u32, colors: [Rgb8; 4]) {
    let [top, right, bottom, left] = colors;
    let x0 = inner.x.saturating_sub(width);
    let y0 = inner.y.saturating_sub(width);
    let full_w = inner.width + 2 * width;
    out.fill_rect(PixelRect::new(x0, y0, full_w, width), top.opaque());
    out.fill_rect(
        PixelRect::new(x0, inner.y + inner.height, full_w, width),
        bottom.opaque(),
    );
    out.fill_rect(
        PixelRect::new(x0, inner.y, width, inner.height),
        left.opaque(),
    );
    out.fill_rect(
        PixelRect::new(inner.x + inner.width, inner.y, width, inner.height),
        right.opaque(),
    );
}

/// Darken the panel near the moulding, strongest under the top rail.
fn inner_shadow(out: &mut Raster, panel: PixelRect, spread: u32) {
    let falloff = |d: u32, strength: f32| {
        if d >= spread {
            return 1.0;
        }
        let u = 1.0 - d as f32 / spread as f32;
        1.0 - strength * u * u
    };
    for y in panel.y..panel.y + panel.height {
        let dt = y - panel.y;
        let db = panel.y + panel.height - 1 - y;
        for x in panel.x..panel.x + panel.width {
            let dl = x - panel.x;
            let dr = panel.x + panel.width - 1 - x;
            let k = falloff(dt, 0.40)
                .min(falloff(dl, 0.30))
                .min(falloff(dr, 0.15))
                .min(falloff(db, 0.10));
            if k >= 1.0 {
                continue;
            }
            let px = out.pixel(x, y);
            let s = |c: u8| (f32::from(c) * k).round() as u8;
            out.set_pixel(x, y, [s(px[0]), s(px[1]), s(px[2]), px[3]]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/render.rs"]
mod tests;
