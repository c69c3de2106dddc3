//! geoplot command line renderer.
//!
//! Reads one JSON plot request, renders it with the configured boundaries
//! and writes the PNG. Render metadata (size, warnings) goes to stdout as
//! JSON; a failed render prints its error payload to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use plot_engine::{Engine, EngineConfig, PlotRequest};

#[derive(Parser, Debug)]
#[command(name = "geoplot")]
#[command(about = "Render choropleth, hist2d, dot, bubble and boundary maps to PNG")]
struct Args {
    /// Engine configuration (.yaml, .yml or .json); built-in defaults when absent
    #[arg(short, long, env = "GEOPLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Plot request JSON file, or "-" for stdin
    #[arg(short, long)]
    params: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "plot.png")]
    out: PathBuf,

    /// Override the configured resolution
    #[arg(long)]
    dpi: Option<f64>,

    /// Log level
    #[arg(long, default_value = "info", env = "GEOPLOT_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the render report.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dpi) = args.dpi {
        config = config.with_dpi(dpi);
    }

    let engine = Engine::from_config(config).context("initializing plot engine")?;
    let json = read_params(&args.params)?;

    let result = PlotRequest::from_json(&json).and_then(|request| {
        info!(kind = %request.kind(), "rendering");
        engine.render(&request)
    });

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            error!(kind = e.kind().as_str(), error = %e, "render failed");
            eprintln!("{}", serde_json::to_string(&e.payload())?);
            return Ok(ExitCode::from(2));
        }
    };

    std::fs::write(&args.out, &result.bytes)
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!(
        path = %args.out.display(),
        bytes = result.bytes.len(),
        width = result.width,
        height = result.height,
        "wrote image"
    );

    let report = serde_json::json!({
        "path": args.out,
        "content_type": result.content_type,
        "width": result.width,
        "height": result.height,
        "elements": result.elements,
        "warnings": result.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

fn read_params(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("reading request from stdin")?;
        return Ok(json);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading request {}", path.display()))
}
