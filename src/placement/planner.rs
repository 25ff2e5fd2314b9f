use crate::foundation::{
    core::{Orientation, PixelRect, PixelSize, Size},
    error::{MockupError, MockupResult},
};

/// Tunable constants of the wall-placement policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementPolicy {
    /// Vertical centre of the artwork as a fraction of wall height from the top.
    pub anchor_ratio: f64,
    /// Long edge as a fraction of wall width in landscape rooms.
    pub landscape_fraction: f64,
    /// Long edge as a fraction of wall width in square rooms.
    pub square_fraction: f64,
    /// Long edge as a fraction of wall width in portrait rooms.
    pub portrait_fraction: f64,
    /// Clear margin kept around the artwork, as a fraction of the wall's shorter side.
    pub margin_ratio: f64,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            anchor_ratio: 0.45,
            landscape_fraction: 0.35,
            square_fraction: 0.40,
            portrait_fraction: 0.45,
            margin_ratio: 0.04,
        }
    }
}

impl PlacementPolicy {
    /// Long-edge fraction for a room orientation.
    pub fn fraction_for(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Landscape => self.landscape_fraction,
            Orientation::Square => self.square_fraction,
            Orientation::Portrait => self.portrait_fraction,
        }
    }

    /// Reject ratios outside their meaningful ranges.
    pub fn validate(&self) -> MockupResult<()> {
        if !(0.0..=1.0).contains(&self.anchor_ratio) {
            return Err(MockupError::validation(format!(
                "anchor_ratio must be within [0, 1] (got {})",
                self.anchor_ratio
            )));
        }
        for (name, v) in [
            ("landscape_fraction", self.landscape_fraction),
            ("square_fraction", self.square_fraction),
            ("portrait_fraction", self.portrait_fraction),
        ] {
            if !(v > 0.0 && v <= 1.0) {
                return Err(MockupError::validation(format!(
                    "{name} must be within (0, 1] (got {v})"
                )));
            }
        }
        if !(0.0..0.5).contains(&self.margin_ratio) {
            return Err(MockupError::validation(format!(
                "margin_ratio must be within [0, 0.5) (got {})",
                self.margin_ratio
            )));
        }
        Ok(())
    }
}

/// Resolved target rectangle for the framed artwork.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Target rectangle inside the environment raster.
    pub rect: PixelRect,
    /// Wall region the rectangle was planned against.
    pub wall: PixelRect,
    /// Scale applied to the framed raster.
    pub scale: f64,
    /// Whether the policy size had to shrink to fit the wall.
    pub fitted: bool,
}

/// Decide where the framed artwork hangs on the environment.
///
/// The returned rectangle always lies inside `wall_region` (clamped to the raster) and therefore
/// inside the environment raster, for any combination of sizes.
#[tracing::instrument(level = "debug", skip(policy))]
pub fn plan_placement(
    framed: PixelSize,
    environment: PixelSize,
    orientation: Orientation,
    wall_region: Option<PixelRect>,
    policy: &PlacementPolicy,
) -> MockupResult<Placement> {
    policy.validate()?;
    if framed.width == 0 || framed.height == 0 {
        return Err(MockupError::validation("framed raster has zero area"));
    }
    if environment.width == 0 || environment.height == 0 {
        return Err(MockupError::validation("environment raster has zero area"));
    }

    let full = PixelRect::new(0, 0, environment.width, environment.height);
    let wall = wall_region
        .and_then(|r| r.clamp_to(environment))
        .unwrap_or(full);
    let wall_k = wall.to_kurbo();

    let target_long = policy.fraction_for(orientation) * wall_k.width();
    let mut scale = target_long / f64::from(framed.long_edge());

    let mut margin = (policy.margin_ratio * wall_k.width().min(wall_k.height())).floor();
    if wall_k.width() - 2.0 * margin < 1.0 || wall_k.height() - 2.0 * margin < 1.0 {
        margin = 0.0;
    }
    let avail = Size::new(
        wall_k.width() - 2.0 * margin,
        wall_k.height() - 2.0 * margin,
    );

    let wanted = framed.to_kurbo() * scale;
    let fit = (avail.width / wanted.width)
        .min(avail.height / wanted.height)
        .min(1.0);
    let fitted = fit < 1.0;
    if fitted {
        scale *= fit;
        tracing::warn!(fit, "framed artwork scaled down to fit the wall");
    }

    let max_w = avail.width as u32;
    let max_h = avail.height as u32;
    let mut width = ((f64::from(framed.width) * scale).round() as u32).clamp(1, max_w);
    let height = ((f64::from(framed.height) * scale).round() as u32).clamp(1, max_h);

    // equal left/right margins need an even leftover
    if (wall.width - width) % 2 == 1 {
        if width > 1 {
            width -= 1;
        } else if width < max_w {
            width += 1;
        }
    }
    let x = wall.x + (wall.width - width) / 2;

    let centre_y = wall_k.y0 + policy.anchor_ratio * wall_k.height();
    let lo = wall_k.y0 + margin;
    let hi = wall_k.y1 - margin - f64::from(height);
    let y_f = (centre_y - f64::from(height) / 2.0).clamp(lo, hi.max(lo));
    let y = (y_f.round() as u32).min(wall.y + wall.height - height);

    let rect = PixelRect::new(x, y, width, height);
    tracing::debug!(?rect, scale, fitted, "placement planned");
    Ok(Placement {
        rect,
        wall,
        scale,
        fitted,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/placement/planner.rs"]
mod tests;
