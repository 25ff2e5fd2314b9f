use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use framewall::{
    Artwork, CancelToken, CompositeRequest, DimensionPolicy, EnvironmentAsset,
    EnvironmentCategory, EnvironmentSource, FrameSpec, FrameStyle, MatOption, MatSpec, MockupConfig, Mockup,
    Orientation, OutputFormat, PhysicalSize, Pipeline, PixelSize, TemplateCatalog, Unit,
};

#[derive(Parser, Debug)]
#[command(name = "framewall", version, about = "Framed artwork mockups on wall photos")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one artwork onto one environment.
    Compose(ComposeArgs),
    /// Print the placement a piece would get, without rendering.
    Plan(PlanArgs),
    /// Composite every job of a JSON manifest on a worker pool.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct PieceArgs {
    /// Declared artwork width.
    #[arg(long)]
    width: f64,

    /// Declared artwork height.
    #[arg(long)]
    height: f64,

    /// Unit of width and height (in, cm).
    #[arg(long, default_value = "in")]
    unit: Unit,

    /// Frame style.
    #[arg(long, default_value = "none")]
    frame: FrameStyle,

    /// Frame border width in inches (style default when omitted).
    #[arg(long)]
    frame_width: Option<f64>,

    /// Frame colour override as #rrggbb.
    #[arg(long)]
    frame_color: Option<String>,

    /// Mat option.
    #[arg(long, default_value = "none")]
    mat: MatOption,

    /// Mat width in inches.
    #[arg(long, default_value_t = framewall::DEFAULT_MAT_WIDTH_IN)]
    mat_width: f64,
}

impl PieceArgs {
    fn dimensions(&self) -> anyhow::Result<PhysicalSize> {
        Ok(PhysicalSize::new(self.width, self.height, self.unit)?)
    }

    fn frame_spec(&self) -> anyhow::Result<FrameSpec> {
        let mut spec = FrameSpec::new(self.frame);
        if let Some(w) = self.frame_width {
            spec = spec.with_border_in(w);
        }
        if let Some(c) = &self.frame_color {
            spec.color = Some(framewall::Rgb8::from_hex(c)?);
        }
        Ok(spec)
    }

    fn mat_spec(&self) -> MatSpec {
        MatSpec::new(self.mat, self.mat_width)
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working resolution override.
    #[arg(long)]
    ppi: Option<f64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<MockupConfig> {
        let mut cfg = match &self.config {
            Some(path) => MockupConfig::from_json_file(path)?,
            None => MockupConfig::default(),
        };
        if let Some(ppi) = self.ppi {
            cfg.dimension.ppi = ppi;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Artwork image (PNG, JPEG or WebP).
    #[arg(long)]
    artwork: PathBuf,

    #[command(flatten)]
    piece: PieceArgs,

    /// Environment image to hang the artwork in.
    #[arg(long, conflicts_with = "templates")]
    environment: Option<PathBuf>,

    /// Template directory containing templates.json.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Room category used to pick a template.
    #[arg(long, requires = "templates")]
    category: Option<EnvironmentCategory>,

    /// Template id to use.
    #[arg(long, requires = "templates")]
    environment_id: Option<String>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output format (jpeg, png); inferred from --out when omitted.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// JPEG quality override.
    #[arg(long)]
    quality: Option<u8>,

    /// Also write a cover-cropped thumbnail here.
    #[arg(long)]
    thumbnail: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    piece: PieceArgs,

    /// Environment pixel size as WxH.
    #[arg(long, value_parser = parse_pixel_size, conflicts_with = "environment")]
    env_size: Option<PixelSize>,

    /// Environment image to read the size from.
    #[arg(long)]
    environment: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Batch manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Worker threads override.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(serde::Deserialize, Debug)]
struct BatchManifest {
    jobs: Vec<BatchJob>,
}

#[derive(serde::Deserialize, Debug)]
struct BatchJob {
    artwork: PathBuf,
    dimensions: PhysicalSize,
    #[serde(default = "FrameSpec::none")]
    frame: FrameSpec,
    #[serde(default = "MatSpec::none")]
    mat: MatSpec,
    environment: PathBuf,
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("framewall=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("framewall=info"))
    };
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut cfg = args.config.load()?;
    if let Some(format) = args.format.or_else(|| format_from_path(&args.out)) {
        cfg.output.format = format;
    }
    if let Some(q) = args.quality {
        cfg.output.jpeg_quality = q;
    }
    cfg.output.thumbnail = args.thumbnail.is_some();
    let pipeline = Pipeline::new(cfg)?;

    let artwork = Artwork {
        bytes: read(&args.artwork)?,
        dimensions: args.piece.dimensions()?,
        frame: args.piece.frame_spec()?,
        mat: args.piece.mat_spec(),
    };
    let cancel = CancelToken::new();

    let mockup = match (&args.environment, &args.templates) {
        (Some(path), _) => {
            let request = CompositeRequest {
                artwork,
                environment: EnvironmentAsset::from_bytes(read(path)?)?,
            };
            pipeline.run(&request, &cancel)?
        }
        (None, Some(dir)) => {
            let catalog = TemplateCatalog::open(dir)?;
            let mut request = artwork.environment_request();
            request.category = args.category;
            request.environment_id = args.environment_id.clone();
            pipeline.run_with_source(&artwork, &catalog as &dyn EnvironmentSource, &request, &cancel)?
        }
        (None, None) => anyhow::bail!("one of --environment or --templates is required"),
    };

    write(&args.out, &mockup.bytes)?;
    if let (Some(path), Some(thumb)) = (&args.thumbnail, &mockup.thumbnail) {
        write(path, &thumb.bytes)?;
    }
    print_summary(&mockup)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    cfg.validate()?;

    let env_size = match (args.env_size, &args.environment) {
        (Some(size), _) => size,
        (None, Some(path)) => framewall::probe_size(&read(path)?)?,
        (None, None) => anyhow::bail!("one of --env-size or --environment is required"),
    };

    let frame = args.piece.frame_spec()?;
    let mat = args.piece.mat_spec();
    frame.validate()?;
    mat.validate()?;
    let dims = args.piece.dimensions()?;
    let ppi = cfg
        .dimension
        .working_ppi(&dims, frame.border_in() + mat.effective_in())?;
    let policy = DimensionPolicy {
        ppi,
        ..cfg.dimension
    };
    let art = framewall::resolve_pixel_size(&dims, &policy)?;
    let surround = frame
        .border_px(ppi)?
        .checked_add(mat.width_px(ppi)?)
        .and_then(|s| s.checked_mul(2))
        .context("frame and mat widths exceed the pixel range")?;
    let framed = art
        .width
        .checked_add(surround)
        .zip(art.height.checked_add(surround))
        .map(|(w, h)| PixelSize::new(w, h))
        .context("framed size exceeds the pixel range")?;
    let placement = framewall::plan_placement(
        framed,
        env_size,
        Orientation::of_pixels(env_size),
        None,
        &cfg.placement,
    )?;

    let out = serde_json::json!({
        "ppi": ppi,
        "artwork": art,
        "framed": framed,
        "environment": env_size,
        "placement": placement,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let mut cfg = args.config.load()?;
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    let pipeline = Pipeline::new(cfg)?;

    let text = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let manifest: BatchManifest = serde_json::from_str(&text)
        .with_context(|| format!("parse manifest '{}'", args.manifest.display()))?;
    let root = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let mut requests = Vec::with_capacity(manifest.jobs.len());
    for job in &manifest.jobs {
        requests.push(CompositeRequest {
            artwork: Artwork {
                bytes: read(&root.join(&job.artwork))?,
                dimensions: job.dimensions,
                frame: job.frame.clone(),
                mat: job.mat,
            },
            environment: EnvironmentAsset::from_bytes(read(&root.join(&job.environment))?)?,
        });
    }

    let results = pipeline.run_batch(&requests, &CancelToken::new())?;
    let mut failed = 0usize;
    let mut summary = Vec::with_capacity(results.len());
    for (job, result) in manifest.jobs.iter().zip(results) {
        match result {
            Ok(mockup) => {
                let out = root.join(&job.out);
                write(&out, &mockup.bytes)?;
                eprintln!("wrote {}", out.display());
                summary.push(serde_json::json!({
                    "out": job.out,
                    "ok": true,
                    "size": mockup.size,
                    "placement": mockup.placement,
                    "fingerprint": format!("{:016x}", mockup.fingerprint),
                }));
            }
            Err(err) => {
                failed += 1;
                tracing::error!(artwork = %job.artwork.display(), error = %err, "job failed");
                summary.push(serde_json::json!({
                    "out": job.out,
                    "ok": false,
                    "error": err.to_string(),
                }));
            }
        }
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "jobs": summary }))?
    );
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", manifest.jobs.len());
    }
    Ok(())
}

fn print_summary(mockup: &Mockup) -> anyhow::Result<()> {
    let out = serde_json::json!({
        "format": mockup.format,
        "size": mockup.size,
        "artwork": mockup.artwork_size,
        "framed": mockup.framed_size,
        "placement": mockup.placement,
        "environment": mockup.environment.name,
        "fingerprint": format!("{:016x}", mockup.fingerprint),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn format_from_path(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
}

fn parse_pixel_size(s: &str) -> Result<PixelSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("environment size must be non-zero".to_owned());
    }
    Ok(PixelSize::new(w, h))
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let tmp = temp_sibling(path)?;
    let staged = std::fs::File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|()| std::fs::rename(&tmp, path));
    if let Err(err) = staged {
        let _ = std::fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("write '{}'", path.display()));
    }
    Ok(())
}

/// Hidden staging file next to `path`, renamed over it once fully written.
fn temp_sibling(path: &Path) -> anyhow::Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("output path '{}' has no file name", path.display()))?;
    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(format!(".{}.tmp", std::process::id()));
    Ok(path.with_file_name(staged))
}
