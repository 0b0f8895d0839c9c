//! Field viewer CLI.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use field_common::FieldError;
use renderer::text::TextPainter;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use field_viewer::pipeline::OverlayOutcome;
use field_viewer::{display, pipeline, Args, ViewerConfig};

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let field_error = err.downcast_ref::<FieldError>();
            let kind = field_error.map(FieldError::kind).unwrap_or("Other");
            let code = field_error.map(FieldError::exit_code).unwrap_or(1);

            error!(kind, "{:#}", err);
            eprintln!("field-viewer: {:#}", err);
            ExitCode::from(code as u8)
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = ViewerConfig::load(args.config.as_deref()).context("loading configuration")?;

    // Everything below is checked before the first data file is opened.
    let backend_flag = args.backend;
    let request = args.into_request(&config).context("invalid arguments")?;
    let resolved = display::resolve_from_env(backend_flag, &config.display)
        .context("resolving display backend")?;
    info!(backend = %resolved.backend, source = %resolved.source, "Display backend");

    let painter = TextPainter::discover(request.font_path.as_deref());
    let report = pipeline::run(&request, &painter)?;

    for outcome in &report.overlays {
        match outcome {
            OverlayOutcome::Drawn { path, markers, drawn } => {
                info!(path = %path.display(), markers, drawn, "Overlay drawn")
            }
            OverlayOutcome::Failed { path, error } => {
                warn!(path = %path.display(), error = %error, "Overlay failed")
            }
        }
    }
    info!(
        points_loaded = report.points_loaded,
        points_rendered = report.points_rendered,
        triangles = report.triangles,
        limits = %report.limits,
        "Rendered field"
    );

    display::show(resolved.backend, &report.output, &config.display.viewer_command)
        .context("displaying figure")?;
    Ok(())
}
