use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;
use xxhash_rust::xxh3::Xxh3;

use crate::{
    assets::{decode::decode_raster, raster::Raster},
    compose::compositor::{composite_onto, resample},
    config::MockupConfig,
    dimension::resolver::{DimensionPolicy, resolve_pixel_size},
    encode::output::{OutputFormat, encode, thumbnail},
    environment::{
        model::{EnvironmentAsset, EnvironmentMeta, EnvironmentRequest},
        source::EnvironmentSource,
    },
    foundation::{
        core::{PhysicalSize, PixelSize},
        error::{MockupError, MockupResult},
    },
    frame::{
        render::render_framed,
        spec::{FrameSpec, MatSpec},
    },
    placement::planner::{Placement, plan_placement},
};

const FINGERPRINT_SEED: u64 = 0x6d6f636b75707331;

/// Cooperative cancellation flag shared between a caller and running requests.
///
/// Checked at every stage boundary; a cancelled request yields [`MockupError::Cancelled`] and no
/// output bytes.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every holder.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, stage: &'static str) -> MockupResult<()> {
        if self.is_cancelled() {
            tracing::warn!(stage, "mockup request cancelled");
            return Err(MockupError::Cancelled(stage));
        }
        Ok(())
    }
}

/// The artwork half of a request.
#[derive(Clone)]
pub struct Artwork {
    /// Encoded PNG/JPEG/WebP bytes.
    pub bytes: Vec<u8>,
    /// Declared physical size.
    pub dimensions: PhysicalSize,
    /// Frame choice.
    pub frame: FrameSpec,
    /// Mat choice.
    pub mat: MatSpec,
}

impl std::fmt::Debug for Artwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artwork")
            .field("bytes", &self.bytes.len())
            .field("dimensions", &self.dimensions)
            .field("frame", &self.frame)
            .field("mat", &self.mat)
            .finish()
    }
}

impl Artwork {
    /// Environment request matching this artwork's orientation.
    pub fn environment_request(&self) -> EnvironmentRequest {
        EnvironmentRequest::for_artwork(self.dimensions)
    }
}

/// One complete compositing job.
#[derive(Clone, Debug)]
pub struct CompositeRequest {
    /// What to hang.
    pub artwork: Artwork,
    /// Where to hang it.
    pub environment: EnvironmentAsset,
}

/// Cover-cropped preview of a mockup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    /// Pixel size.
    pub size: PixelSize,
    /// JPEG bytes.
    pub bytes: Vec<u8>,
}

/// Finished mockup: encoded image plus what it took to make it.
#[derive(Clone, Debug)]
pub struct Mockup {
    /// Encoded image.
    pub bytes: Vec<u8>,
    /// Container of `bytes`.
    pub format: OutputFormat,
    /// Pixel size of the output (the environment size).
    pub size: PixelSize,
    /// Working-resolution size of the artwork.
    pub artwork_size: PixelSize,
    /// Size of the framed raster before placement scaling.
    pub framed_size: PixelSize,
    /// Where the framed artwork was placed.
    pub placement: Placement,
    /// Metadata of the environment used.
    pub environment: EnvironmentMeta,
    /// Optional preview.
    pub thumbnail: Option<Thumbnail>,
    /// xxh3 of the final premultiplied pixels, for auditing reruns.
    pub fingerprint: u64,
}

/// Configured mockup pipeline: resolve, frame, place, composite, encode.
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: MockupConfig,
}

impl Pipeline {
    /// Validate `config` and build a pipeline.
    pub fn new(config: MockupConfig) -> MockupResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &MockupConfig {
        &self.config
    }

    /// Composite one request.
    #[tracing::instrument(skip_all, fields(dims = %request.artwork.dimensions, frame = %request.artwork.frame.style))]
    pub fn run(&self, request: &CompositeRequest, cancel: &CancelToken) -> MockupResult<Mockup> {
        self.execute(&request.artwork, &request.environment, cancel)
    }

    /// Acquire a background from `source`, then composite onto it.
    #[tracing::instrument(skip_all, fields(dims = %artwork.dimensions))]
    pub fn run_with_source(
        &self,
        artwork: &Artwork,
        source: &dyn EnvironmentSource,
        environment: &EnvironmentRequest,
        cancel: &CancelToken,
    ) -> MockupResult<Mockup> {
        cancel.check("environment")?;
        let asset = source.acquire(environment)?;
        self.execute(artwork, &asset, cancel)
    }

    /// Composite many requests on a bounded worker pool.
    ///
    /// Results keep request order; one failing request does not affect the others.
    pub fn run_batch(
        &self,
        requests: &[CompositeRequest],
        cancel: &CancelToken,
    ) -> MockupResult<Vec<MockupResult<Mockup>>> {
        let pool = build_thread_pool(self.config.threading.threads)?;
        tracing::info!(
            requests = requests.len(),
            workers = pool.current_num_threads(),
            "starting batch"
        );
        Ok(pool.install(|| {
            requests
                .par_iter()
                .map(|req| self.run(req, cancel))
                .collect()
        }))
    }

    fn execute(
        &self,
        artwork: &Artwork,
        environment: &EnvironmentAsset,
        cancel: &CancelToken,
    ) -> MockupResult<Mockup> {
        let cfg = &self.config;

        cancel.check("resolve")?;
        artwork.frame.validate()?;
        artwork.mat.validate()?;
        let surround_in = artwork.frame.border_in() + artwork.mat.effective_in();
        let ppi = cfg
            .dimension
            .working_ppi(&artwork.dimensions, surround_in)?;
        let policy = DimensionPolicy {
            ppi,
            ..cfg.dimension
        };
        let artwork_size = resolve_pixel_size(&artwork.dimensions, &policy)?;
        let art = decode_raster(&artwork.bytes)?;
        let art = resample(&art, artwork_size)?;

        cancel.check("frame")?;
        let framed = render_framed(&art, &artwork.frame, &artwork.mat, ppi)?;
        drop(art);

        cancel.check("placement")?;
        let env = environment.decode()?;
        let mut canvas = env.raster;
        let placement = plan_placement(
            framed.raster.size(),
            canvas.size(),
            env.meta.orientation,
            env.meta.wall_region,
            &cfg.placement,
        )?;

        cancel.check("composite")?;
        let depth_px = artwork.frame.style.depth_in() * ppi;
        composite_onto(
            &mut canvas,
            &framed.raster,
            &placement,
            depth_px,
            &cfg.shadow,
            &cfg.lighting,
        )?;

        cancel.check("encode")?;
        let bytes = encode(&canvas, &cfg.output)?;
        let thumbnail = if cfg.output.thumbnail {
            let (size, bytes) = thumbnail(&canvas, &cfg.output)?;
            Some(Thumbnail { size, bytes })
        } else {
            None
        };

        Ok(Mockup {
            bytes,
            format: cfg.output.format,
            size: canvas.size(),
            artwork_size,
            framed_size: framed.raster.size(),
            placement,
            environment: env.meta,
            thumbnail,
            fingerprint: fingerprint(&canvas),
        })
    }
}

/// Composite with the default configuration.
///
/// `environment` is an encoded background; its orientation is read from the pixels.
pub fn composite(
    artwork: &[u8],
    dimensions: PhysicalSize,
    frame: FrameSpec,
    mat: MatSpec,
    environment: &[u8],
) -> MockupResult<Mockup> {
    let pipeline = Pipeline::new(MockupConfig::default())?;
    let request = CompositeRequest {
        artwork: Artwork {
            bytes: artwork.to_vec(),
            dimensions,
            frame,
            mat,
        },
        environment: EnvironmentAsset::from_bytes(environment.to_vec())?,
    };
    pipeline.run(&request, &CancelToken::new())
}

fn fingerprint(raster: &Raster) -> u64 {
    let mut h = Xxh3::with_seed(FINGERPRINT_SEED);
    h.update(&raster.width.to_le_bytes());
    h.update(&raster.height.to_le_bytes());
    h.update(&raster.data);
    h.digest()
}

fn build_thread_pool(threads: Option<usize>) -> MockupResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MockupError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MockupError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}
