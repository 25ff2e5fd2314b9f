use std::path::Path;

use anyhow::Context as _;

use crate::{
    compose::{compositor::LightingOpts, shadow::ShadowOpts},
    dimension::resolver::DimensionPolicy,
    encode::output::OutputOpts,
    foundation::error::{MockupError, MockupResult},
    placement::planner::PlacementPolicy,
};

/// Worker pool sizing for batch compositing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchThreading {
    /// Worker count; `None` uses one per available CPU.
    pub threads: Option<usize>,
}

/// Every tunable of the mockup pipeline.
///
/// All sections default, so `{}` is a complete configuration:
///
/// ```json
/// {
///   "dimension": { "ppi": 50, "max_long_edge_px": 4096 },
///   "placement": { "anchor_ratio": 0.45, "margin_ratio": 0.04 },
///   "shadow": { "max_alpha": 0.35 },
///   "lighting": { "strength": 0.08 },
///   "output": { "format": "jpeg", "jpeg_quality": 95, "thumbnail": true },
///   "threading": { "threads": 4 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockupConfig {
    /// Working resolution.
    pub dimension: DimensionPolicy,
    /// Wall placement rules.
    pub placement: PlacementPolicy,
    /// Contact shadow.
    pub shadow: ShadowOpts,
    /// Room-light tint.
    pub lighting: LightingOpts,
    /// Encoding.
    pub output: OutputOpts,
    /// Batch workers.
    pub threading: BatchThreading,
}

impl MockupConfig {
    /// Parse JSON text and validate it.
    pub fn from_json_str(s: &str) -> MockupResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| MockupError::validation(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> MockupResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every section.
    pub fn validate(&self) -> MockupResult<()> {
        self.dimension.validate()?;
        self.placement.validate()?;
        self.shadow.validate()?;
        self.lighting.validate()?;
        self.output.validate()?;
        if self.threading.threads == Some(0) {
            return Err(MockupError::validation(
                "threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
