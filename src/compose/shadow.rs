use crate::{
    assets::raster::Raster,
    effects::blur::{blur_mask, sigma_for_radius},
    foundation::{
        core::Rgb8,
        error::{MockupError, MockupResult},
    },
};

/// Upper bound for contact-shadow opacity regardless of configuration.
pub const MAX_SHADOW_ALPHA: f32 = 0.6;

/// Contact shadow tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowOpts {
    /// Draw a contact shadow at all.
    pub enabled: bool,
    /// Peak opacity, clamped to [`MAX_SHADOW_ALPHA`].
    pub max_alpha: f32,
    /// Downward offset per pixel of frame depth on the wall.
    pub offset_factor: f64,
    /// Blur radius as a fraction of the placed artwork height.
    pub blur_ratio: f64,
    /// Shadow colour.
    pub color: Rgb8,
}

impl Default for ShadowOpts {
    fn default() -> Self {
        Self {
            enabled: true,
            max_alpha: 0.35,
            offset_factor: 0.5,
            blur_ratio: 0.02,
            color: Rgb8::new(0x14, 0x10, 0x0c),
        }
    }
}

impl ShadowOpts {
    /// Reject negative or non-finite tuning values.
    pub fn validate(&self) -> MockupResult<()> {
        if !self.max_alpha.is_finite() || self.max_alpha < 0.0 {
            return Err(MockupError::validation(format!(
                "shadow max_alpha must be >= 0 (got {})",
                self.max_alpha
            )));
        }
        if !self.offset_factor.is_finite() || self.offset_factor < 0.0 {
            return Err(MockupError::validation("shadow offset_factor must be >= 0"));
        }
        if !(0.0..=0.25).contains(&self.blur_ratio) {
            return Err(MockupError::validation(format!(
                "shadow blur_ratio must be within [0, 0.25] (got {})",
                self.blur_ratio
            )));
        }
        Ok(())
    }

    /// Opacity actually applied.
    pub fn effective_alpha(&self) -> f32 {
        self.max_alpha.clamp(0.0, MAX_SHADOW_ALPHA)
    }
}

/// Blurred silhouette ready to be painted under a raster.
#[derive(Clone, Debug)]
pub struct ShadowLayer {
    /// Row-major coverage, `width * height` bytes.
    pub mask: Vec<u8>,
    /// Mask width.
    pub width: u32,
    /// Mask height.
    pub height: u32,
    /// Position of the mask's top-left corner relative to the casting raster.
    pub offset: (i64, i64),
}

/// Build the contact shadow cast by `caster` hanging `depth_px` off the wall.
///
/// The silhouette is the caster's alpha, pushed down by `depth_px * offset_factor` and blurred
/// with a radius proportional to the caster height.
#[tracing::instrument(level = "debug", skip(caster, opts), fields(w = caster.width, h = caster.height))]
pub fn contact_shadow(caster: &Raster, depth_px: f64, opts: &ShadowOpts) -> MockupResult<ShadowLayer> {
    opts.validate()?;
    if !depth_px.is_finite() || depth_px < 0.0 {
        return Err(MockupError::validation(format!(
            "shadow depth must be >= 0 (got {depth_px})"
        )));
    }

    let radius = (opts.blur_ratio * f64::from(caster.height)).round().max(1.0) as u32;
    let pad = radius as usize;
    let width = caster
        .width
        .checked_add(2 * radius)
        .ok_or_else(|| MockupError::validation("shadow mask too large"))?;
    let height = caster
        .height
        .checked_add(2 * radius)
        .ok_or_else(|| MockupError::validation("shadow mask too large"))?;

    let mut mask = vec![0u8; (width as usize) * (height as usize)];
    for y in 0..caster.height as usize {
        let row = (y + pad) * width as usize + pad;
        for x in 0..caster.width as usize {
            mask[row + x] = caster.data[(y * caster.width as usize + x) * 4 + 3];
        }
    }
    let mask = blur_mask(&mask, width, height, radius, sigma_for_radius(radius))?;

    let drop = (depth_px * opts.offset_factor).round() as i64;
    Ok(ShadowLayer {
        mask,
        width,
        height,
        offset: (-i64::from(radius), drop - i64::from(radius)),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/shadow.rs"]
mod tests;
