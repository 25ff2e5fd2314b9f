//! framewall turns a flat artwork image into a framed, wall-hung mockup.
//!
//! A request flows through four deterministic stages:
//!
//! - resolve the declared physical size to a working pixel size
//! - render the frame and mat around the artwork
//! - plan where the framed piece hangs on an environment photo
//! - composite it with a contact shadow and encode the result
//!
//! Backgrounds come from an [`EnvironmentSource`]: a template directory, a saved-asset catalog,
//! an in-memory image, or (with the `remote` feature) an image generation service.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod compose;
/// Pipeline configuration.
pub mod config;
pub(crate) mod dimension;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod environment;
pub(crate) mod frame;
/// End-to-end mockup pipeline.
pub mod pipeline;
pub(crate) mod placement;

pub use crate::assets::decode::{decode_raster, probe_size};
pub use crate::assets::raster::Raster;
pub use crate::compose::compositor::{LightingOpts, composite_onto, resample};
pub use crate::compose::shadow::{MAX_SHADOW_ALPHA, ShadowLayer, ShadowOpts, contact_shadow};
pub use crate::config::{BatchThreading, MockupConfig};
pub use crate::dimension::resolver::{
    DEFAULT_MAX_LONG_EDGE_PX, DEFAULT_PPI, DimensionPolicy, generation_size, length_to_px,
    resolve_pixel_size,
};
pub use crate::encode::output::{OutputFormat, OutputOpts, encode, thumbnail};
pub use crate::environment::model::{
    DecodedEnvironment, EnvironmentAsset, EnvironmentCategory, EnvironmentMeta,
    EnvironmentRequest,
};
#[cfg(feature = "remote")]
pub use crate::environment::remote::{RemoteConfig, RemoteImageSource};
pub use crate::environment::source::{
    AssetCatalog, EnvironmentSource, InMemorySource, SavedEnvironmentSource, TEMPLATE_MANIFEST,
    TemplateCatalog, TemplateEntry,
};
pub use crate::foundation::core::{Orientation, PhysicalSize, PixelRect, PixelSize, Rgb8, Unit};
pub use crate::foundation::error::{MockupError, MockupResult};
pub use crate::frame::render::{FramedRaster, render_framed};
pub use crate::frame::spec::{
    DEFAULT_MAT_WIDTH_IN, FrameFamily, FrameSpec, FrameStyle, MatOption, MatSpec,
};
pub use crate::pipeline::{
    Artwork, CancelToken, CompositeRequest, Mockup, Pipeline, Thumbnail, composite,
};
pub use crate::placement::planner::{Placement, PlacementPolicy, plan_placement};
