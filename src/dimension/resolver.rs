use crate::foundation::{
    core::{Orientation, PhysicalSize, PixelSize},
    error::{MockupError, MockupResult},
};

/// Working resolution used when the caller does not configure one.
pub const DEFAULT_PPI: f64 = 50.0;

/// Default cap on the long edge of the framed working raster.
pub const DEFAULT_MAX_LONG_EDGE_PX: u32 = 4096;

const MIN_LONG_EDGE_PX: u32 = 256;

// Per-side rounding in `length_to_px` can add up to this many pixels across artwork, mat and
// frame on one axis.
const ROUNDING_SLACK_PX: f64 = 8.0;

/// Pixel-geometry policy for physical sizes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DimensionPolicy {
    /// Pixels per inch of the working canvas.
    pub ppi: f64,
    /// Upper bound on the framed raster's long edge; larger pieces get a lower working ppi.
    pub max_long_edge_px: u32,
}

impl Default for DimensionPolicy {
    fn default() -> Self {
        Self {
            ppi: DEFAULT_PPI,
            max_long_edge_px: DEFAULT_MAX_LONG_EDGE_PX,
        }
    }
}

impl DimensionPolicy {
    /// Reject non-finite or non-positive resolutions and tiny raster caps.
    pub fn validate(&self) -> MockupResult<()> {
        if !self.ppi.is_finite() || self.ppi <= 0.0 {
            return Err(MockupError::validation(format!(
                "ppi must be > 0 (got {})",
                self.ppi
            )));
        }
        if self.max_long_edge_px < MIN_LONG_EDGE_PX {
            return Err(MockupError::validation(format!(
                "max_long_edge_px must be >= {MIN_LONG_EDGE_PX} (got {})",
                self.max_long_edge_px
            )));
        }
        Ok(())
    }

    /// Resolution for a piece whose frame and mat add `surround_in` inches on every side.
    ///
    /// Equals `ppi` unless the framed long edge would exceed `max_long_edge_px`, in which case it
    /// drops so the framed raster fits. Frame, mat and shadow depth must use the same value.
    pub fn working_ppi(&self, size: &PhysicalSize, surround_in: f64) -> MockupResult<f64> {
        size.validate()?;
        self.validate()?;
        if !surround_in.is_finite() || surround_in < 0.0 {
            return Err(MockupError::invalid_dimension(format!(
                "frame and mat width must be >= 0 (got {surround_in})"
            )));
        }
        let long_in = size.width_in().max(size.height_in()) + 2.0 * surround_in;
        let budget = f64::from(self.max_long_edge_px) - ROUNDING_SLACK_PX;
        if long_in * self.ppi <= budget {
            return Ok(self.ppi);
        }
        let ppi = budget / long_in;
        tracing::debug!(
            requested = self.ppi,
            ppi,
            max_long_edge_px = self.max_long_edge_px,
            "working resolution lowered for a large piece"
        );
        Ok(ppi)
    }
}

/// Convert a declared physical size to pixels at `policy.working_ppi(size, 0.0)`.
///
/// Each side is rounded to the nearest pixel independently, so the aspect ratio never drifts by
/// more than one pixel of rounding. Sides never collapse below one pixel, and the long edge never
/// exceeds `policy.max_long_edge_px`.
#[tracing::instrument(level = "debug")]
pub fn resolve_pixel_size(size: &PhysicalSize, policy: &DimensionPolicy) -> MockupResult<PixelSize> {
    let ppi = policy.working_ppi(size, 0.0)?;
    let width = length_to_px(size.width_in(), ppi)?;
    let height = length_to_px(size.height_in(), ppi)?;
    if width == 0 || height == 0 {
        return Err(MockupError::invalid_dimension(format!(
            "{size} resolves to an empty raster"
        )));
    }
    tracing::debug!(width, height, "resolved pixel size");
    Ok(PixelSize::new(width, height))
}

/// Convert a length in inches to whole pixels. Zero stays zero; any positive length is at least
/// one pixel.
pub fn length_to_px(inches: f64, ppi: f64) -> MockupResult<u32> {
    if !inches.is_finite() || inches < 0.0 {
        return Err(MockupError::invalid_dimension(format!(
            "length must be >= 0 (got {inches})"
        )));
    }
    if inches == 0.0 {
        return Ok(0);
    }
    let px = (inches * ppi).round();
    if px > f64::from(u32::MAX) {
        return Err(MockupError::invalid_dimension(format!(
            "{inches} in at {ppi} ppi exceeds the pixel range"
        )));
    }
    Ok((px as u32).max(1))
}

/// Raster size requested from the generation service for an orientation:
/// `1792x1024`, `1024x1792` or `1024x1024`.
pub fn generation_size(orientation: Orientation) -> PixelSize {
    match orientation {
        Orientation::Landscape => PixelSize::new(1792, 1024),
        Orientation::Portrait => PixelSize::new(1024, 1792),
        Orientation::Square => PixelSize::new(1024, 1024),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dimension/resolver.rs"]
mod tests;
