use std::path::PathBuf;
use std::process;

use clap::Parser;

use annodiff_core::annotations::infrastructure::voc_directory_source::VocDirectorySource;
use annodiff_core::comparison::compare_annotations_use_case::CompareAnnotationsUseCase;
use annodiff_core::comparison::comparison_executor::ComparisonExecutor;
use annodiff_core::comparison::comparison_logger::LogComparisonLogger;
use annodiff_core::comparison::comparison_result::ComparisonResult;
use annodiff_core::comparison::infrastructure::sequential_executor::SequentialExecutor;
use annodiff_core::comparison::infrastructure::threaded_executor::ThreadedExecutor;
use annodiff_core::report::domain::report_renderer::ReportRenderer;
use annodiff_core::report::infrastructure::json_report::JsonReport;
use annodiff_core::report::infrastructure::overlay_renderer::OverlayRenderer;
use annodiff_core::report::infrastructure::text_report::TextReport;
use annodiff_core::shared::config::{ComparisonConfig, TieBreak};

/// Compare two folders of Pascal VOC annotations of the same images.
#[derive(Parser, Debug)]
#[command(name = "annodiff")]
struct Cli {
    /// Folder with annotations from source A.
    folder_a: PathBuf,

    /// Folder with annotations from source B.
    folder_b: PathBuf,

    /// Folder with the annotated images (needed for overlays).
    #[arg(long)]
    images: Option<PathBuf>,

    /// Overlap percentage a box pair must exceed to match (0-100).
    #[arg(long)]
    threshold: Option<f64>,

    /// Label-mismatch rule: legacy or first-overlap.
    #[arg(long)]
    tie_break: Option<TieBreak>,

    /// Also count unmatched B boxes with a scan from B's side.
    #[arg(long)]
    symmetric: bool,

    /// Worker threads (1 = sequential).
    #[arg(long)]
    workers: Option<usize>,

    /// Annotation file extension, without the dot.
    #[arg(long)]
    annotation_ext: Option<String>,

    /// Image file extension, without the dot.
    #[arg(long)]
    image_ext: Option<String>,

    /// JSON config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full result as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write side-by-side overlays of disagreeing matches to this folder.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Only draw the image of the N-th disagreeing match.
    #[arg(long, requires = "overlay_dir")]
    overlay_index: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    log::debug!("Using config {config:?}");

    let source_a = VocDirectorySource::new(&cli.folder_a, &config.annotation_extension)?;
    let source_b = VocDirectorySource::new(&cli.folder_b, &config.annotation_extension)?;
    let executor: Box<dyn ComparisonExecutor> = if config.workers > 1 {
        let threaded = ThreadedExecutor::new(config.workers);
        log::info!("Comparing on {} worker threads", threaded.workers());
        Box::new(threaded)
    } else {
        Box::new(SequentialExecutor::new())
    };

    let mut use_case = CompareAnnotationsUseCase::new(
        Box::new(source_a),
        Box::new(source_b),
        executor,
        Box::new(LogComparisonLogger::default()),
        config.clone(),
    );
    let result = use_case.execute()?;

    print!("{}", TextReport::new().render(&result)?);

    if let Some(path) = &cli.json {
        JsonReport::new().write_to(&result, path)?;
    }
    if let Some(out_dir) = &cli.overlay_dir {
        write_overlays(&cli, &config, &result, out_dir)?;
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for (name, folder) in [("A", &cli.folder_a), ("B", &cli.folder_b)] {
        if !folder.is_dir() {
            return Err(format!("Folder {name} not found: {}", folder.display()).into());
        }
    }
    if cli.overlay_dir.is_some() {
        match &cli.images {
            None => return Err("--overlay-dir requires --images".into()),
            Some(dir) if !dir.is_dir() => {
                return Err(format!("Image folder not found: {}", dir.display()).into());
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Config file values, overridden by any flag given on the command line.
fn build_config(cli: &Cli) -> Result<ComparisonConfig, Box<dyn std::error::Error>> {
    let mut config = ComparisonConfig::load(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(tie_break) = cli.tie_break {
        config.tie_break = tie_break;
    }
    if cli.symmetric {
        config.symmetric = true;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(ext) = &cli.annotation_ext {
        config.annotation_extension = ext.trim_start_matches('.').to_string();
    }
    if let Some(ext) = &cli.image_ext {
        config.image_extension = ext.trim_start_matches('.').to_string();
    }
    config.validate()?;
    Ok(config)
}

fn write_overlays(
    cli: &Cli,
    config: &ComparisonConfig,
    result: &ComparisonResult,
    out_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let images = cli
        .images
        .as_ref()
        .ok_or("--overlay-dir requires --images")?;
    let renderer = OverlayRenderer::new(images, config.image_extension.as_str());
    match cli.overlay_index {
        Some(index) => {
            let path = renderer.render_disagreement(result, index, out_dir)?;
            eprintln!("Overlay written to {}", path.display());
        }
        None => {
            let written = renderer.render_all(result, out_dir)?;
            eprintln!("{} overlays written to {}", written.len(), out_dir.display());
        }
    }
    Ok(())
}
