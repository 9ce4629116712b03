//! Line box editor binary
//!
//! Opens the first page of a PDF, overlays its detected text-line boxes and
//! lets them be moved and resized before exporting them back onto the page.

mod app;
mod canvas;

use anyhow::{Context, Result};
use clap::Parser;
use linebox_core::EditorConfig;
use linebox_pdf::{detect_lines, read_source, EditSession, PageGeometry, PdfiumLoader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "linebox-desktop")]
#[command(version, about = "Edit detected text-line boxes on the first page of a PDF")]
struct Args {
    /// PDF to open
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export destination (overrides export.output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page rasterization resolution (overrides render.dpi)
    #[arg(long)]
    dpi: Option<f32>,

    /// Print the merged line boxes as JSON and exit
    #[arg(long)]
    dump_lines: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    apply_overrides(&mut config, args.output.clone(), args.dpi);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut EditorConfig, output: Option<PathBuf>, dpi: Option<f32>) {
    if let Some(output) = output {
        config.export.output = output;
    }
    if let Some(dpi) = dpi {
        config.render.dpi = dpi;
    }
}

fn dump_lines(args: &Args, config: &EditorConfig, loader: &PdfiumLoader) -> Result<()> {
    let source = read_source(&args.input)?;
    let geometry = PageGeometry::from_bytes(&source)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let (_, lines) = detect_lines(&source, &geometry, loader, &config.merge)?;
    println!("{}", serde_json::to_string_pretty(&lines)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::info!("Starting line box editor v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let loader = PdfiumLoader::bind().context("Failed to initialize pdfium")?;

    if args.dump_lines {
        return dump_lines(&args, &config, &loader);
    }

    let window = config.window.clone();
    let session = EditSession::open(&args.input, &loader, config)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_title(&window.title),
        ..Default::default()
    };

    eframe::run_native(
        &window.title,
        options,
        Box::new(move |_cc| Ok(Box::new(app::EditorApp::new(session)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {e}"))
}
