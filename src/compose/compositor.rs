use image::imageops::{self, FilterType};

use crate::{
    assets::raster::Raster,
    compose::shadow::{ShadowOpts, contact_shadow},
    effects::composite::{mean_color, over_at, paint_mask, tint_multiply},
    foundation::{
        core::PixelSize,
        error::{MockupError, MockupResult},
    },
    placement::planner::Placement,
};

/// Room-light adaptation applied to the placed artwork.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LightingOpts {
    /// Mix of the environment's mean colour into the artwork, `0` disables.
    pub strength: f32,
}

impl Default for LightingOpts {
    fn default() -> Self {
        Self { strength: 0.08 }
    }
}

impl LightingOpts {
    /// Reject strengths outside `[0, 1]`.
    pub fn validate(&self) -> MockupResult<()> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(MockupError::validation(format!(
                "lighting strength must be within [0, 1] (got {})",
                self.strength
            )));
        }
        Ok(())
    }
}

/// Lanczos3 resample of a premultiplied raster.
pub fn resample(src: &Raster, size: PixelSize) -> MockupResult<Raster> {
    if size.width == 0 || size.height == 0 {
        return Err(MockupError::validation("resample target has zero area"));
    }
    if src.size() == size {
        return Ok(src.clone());
    }
    let img = src.to_premul_image()?;
    let resized = imageops::resize(&img, size.width, size.height, FilterType::Lanczos3);
    let mut out = Raster::from_premul_image(resized);
    clamp_premul(&mut out);
    Ok(out)
}

// lanczos lobes can push a colour channel above its alpha
fn clamp_premul(raster: &mut Raster) {
    for px in raster.data.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
}

/// Composite a framed raster onto the environment at its planned placement.
///
/// `depth_px` is the frame depth in framed-raster pixels; it is scaled with the placement.
/// Stages: resample, lighting tint, contact shadow, premultiplied `over`.
#[tracing::instrument(skip(environment, framed, shadow, lighting), fields(rect = ?placement.rect))]
pub fn composite_onto(
    environment: &mut Raster,
    framed: &Raster,
    placement: &Placement,
    depth_px: f64,
    shadow: &ShadowOpts,
    lighting: &LightingOpts,
) -> MockupResult<()> {
    lighting.validate()?;
    let rect = placement.rect;
    if !rect.fits_within(environment.size()) {
        return Err(MockupError::validation(format!(
            "placement {rect:?} exceeds environment {}x{}",
            environment.width, environment.height
        )));
    }

    let mut placed = resample(framed, rect.size())?;

    if lighting.strength > 0.0
        && let Some(light) = mean_color(environment, rect)
    {
        tint_multiply(&mut placed, light, lighting.strength);
    }

    let x = i64::from(rect.x);
    let y = i64::from(rect.y);
    if shadow.enabled && shadow.effective_alpha() > 0.0 {
        let layer = contact_shadow(&placed, depth_px * placement.scale, shadow)?;
        paint_mask(
            environment,
            &layer.mask,
            layer.width,
            layer.height,
            (x + layer.offset.0, y + layer.offset.1),
            shadow.color,
            shadow.effective_alpha(),
        )?;
    }

    over_at(environment, &placed, x, y, 1.0);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
