use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use stylize_core::detection::infrastructure::json_face_detector::JsonFaceDetector;
use stylize_core::generation::infrastructure::pollinations_generator::PollinationsGenerator;
use stylize_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use stylize_core::pipeline::stylize_face_use_case::StylizeFaceUseCase;
use stylize_core::sampling::domain::bounded_color_sampler::BoundedColorSampler;
use stylize_core::sampling::domain::image_fetcher::ImageFetcher;
use stylize_core::sampling::infrastructure::file_image_fetcher::FileImageFetcher;
use stylize_core::sampling::infrastructure::http_image_fetcher::HttpImageFetcher;
use stylize_core::sampling::infrastructure::locator_image_fetcher::{
    is_remote, LocatorImageFetcher,
};
use stylize_core::sampling::infrastructure::memoized_image_fetcher::MemoizedImageFetcher;
use stylize_core::shared::settings::Settings;
use stylize_core::shared::BoxError;

/// Turn a face photo into cartoon stylization parameters.
#[derive(Parser)]
#[command(name = "stylize")]
struct Cli {
    /// Source photo: an http(s) URL, a file:// URL or a local path.
    image: String,

    /// Recorded detector output for the photo (JSON object, or null).
    #[arg(long)]
    detections: PathBuf,

    /// Where to write the generated cartoon (required unless --params-only).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the stylization parameters as JSON and skip generation.
    #[arg(long)]
    params_only: bool,

    /// Settings file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout for image downloads, in seconds.
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Maximum redirects followed per download.
    #[arg(long)]
    max_redirects: Option<usize>,

    /// Timeout for the generation request, in seconds.
    #[arg(long)]
    generation_timeout: Option<u64>,

    /// Base URL of the image generation service.
    #[arg(long)]
    generator_url: Option<String>,

    /// Sample the three regions one after another.
    #[arg(long)]
    sequential: bool,

    /// Download the photo once and reuse it for every region.
    #[arg(long)]
    reuse_download: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), BoxError> {
    let cli = Cli::parse();
    validate(&cli)?;
    let settings = resolve_settings(&cli)?;

    let fetcher = build_fetcher(&settings)?;
    let detector = JsonFaceDetector::from_path(&cli.detections)?;
    let generator =
        PollinationsGenerator::new(&settings.generator_url, settings.generation_timeout())?;

    let mut use_case = StylizeFaceUseCase::new(
        fetcher.clone(),
        Box::new(detector),
        BoundedColorSampler::new(fetcher),
        Box::new(generator),
        Box::new(StdoutPipelineLogger::new()),
        settings.concurrent_sampling,
    );

    if cli.params_only {
        let result = use_case.analyze(&cli.image);
        use_case.logger().summary();
        let params = result?;
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let result = use_case.execute(&cli.image);
    use_case.logger().summary();
    let image = result?;
    if let Some(output) = cli.output.as_deref() {
        write_output(output, &image)?;
    }
    Ok(())
}

/// Settings file (or per-user defaults) overlaid by flags, then validated.
fn resolve_settings(cli: &Cli) -> Result<Settings, BoxError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(secs) = cli.fetch_timeout {
        settings.fetch_timeout_secs = secs;
    }
    if let Some(n) = cli.max_redirects {
        settings.max_redirects = n;
    }
    if let Some(secs) = cli.generation_timeout {
        settings.generation_timeout_secs = secs;
    }
    if let Some(url) = &cli.generator_url {
        settings.generator_url = url.clone();
    }
    if cli.sequential {
        settings.concurrent_sampling = false;
    }
    if cli.reuse_download {
        settings.reuse_download = true;
    }
    settings.validate()?;
    Ok(settings)
}

fn build_fetcher(settings: &Settings) -> Result<Arc<dyn ImageFetcher>, BoxError> {
    let http = HttpImageFetcher::new(settings.fetch_timeout(), settings.max_redirects)?;
    let base: Arc<dyn ImageFetcher> =
        Arc::new(LocatorImageFetcher::new(http, FileImageFetcher::new()));

    if settings.reuse_download {
        Ok(Arc::new(MemoizedImageFetcher::new(base)))
    } else {
        Ok(base)
    }
}

fn write_output(output: &Path, image: &[u8]) -> Result<(), BoxError> {
    fs::write(output, image)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), BoxError> {
    if cli.image.trim().is_empty() {
        return Err("Image locator must not be empty".into());
    }
    if !is_remote(&cli.image) {
        let path = Path::new(cli.image.strip_prefix("file://").unwrap_or(&cli.image));
        if !path.exists() {
            return Err(format!("Input file not found: {}", path.display()).into());
        }
    }
    if !cli.detections.exists() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    if !cli.params_only && cli.output.is_none() {
        return Err("--output is required unless --params-only is used".into());
    }
    Ok(())
}
