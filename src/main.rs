//! Binary entrypoint: analyze background images and print overlay values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use legible_backdrop::config::Configuration;
use legible_backdrop::scan::collect_inputs;
use legible_backdrop::tasks::analyze::{self, ImageReport};
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG: &str = "legible-backdrop.yaml";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One line per image with color, luminosity and opacity
    Text,
    /// JSON array of reports
    Json,
    /// `path: background` lines ready to paste into a stylesheet
    Css,
}

#[derive(Debug, Parser)]
#[command(
    name = "legible-backdrop",
    about = "Compute text-legibility overlays from background image luminosity"
)]
struct Cli {
    /// Image files or directories to analyze
    #[arg(required = true, value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Path to YAML config file (defaults to ./legible-backdrop.yaml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the darkness coefficient
    #[arg(long, value_name = "COEFF")]
    coefficient: Option<f64>,

    /// Override the number of images analyzed concurrently
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Append the luminosity/opacity caption to each report
    #[arg(long)]
    debug_caption: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter =
        EnvFilter::from_default_env().add_directive(format!("legible_backdrop={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Configuration> {
    match explicit {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            Configuration::from_yaml_file(DEFAULT_CONFIG)
                .with_context(|| format!("loading config from {DEFAULT_CONFIG}"))
        }
        None => {
            debug!("no config file; using defaults");
            Ok(Configuration::default())
        }
    }
}

fn print_reports(reports: &[ImageReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
        OutputFormat::Css => {
            for r in reports {
                if let Some(bg) = &r.background {
                    println!("{}: background: {bg};", r.path.display());
                }
            }
        }
        OutputFormat::Text => {
            for r in reports {
                match (&r.analysis, &r.error) {
                    (Some(a), _) => {
                        let c = a.average;
                        print!(
                            "{}  rgb({},{},{})  luminosity {:.4}  opacity {:.4}",
                            r.path.display(),
                            c.r,
                            c.g,
                            c.b,
                            a.luminosity,
                            a.overlay_opacity
                        );
                        match &r.caption {
                            Some(caption) => println!("  [{caption}]"),
                            None => println!(),
                        }
                    }
                    (None, Some(err)) => println!("{}  error: {err}", r.path.display()),
                    (None, None) => {}
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(c) = cli.coefficient {
        cfg.darkness_coefficient = c;
    }
    if let Some(j) = cli.jobs {
        cfg.max_concurrent_decodes = j;
    }
    cfg.debug_caption |= cli.debug_caption;
    let cfg = cfg.validated().context("validating configuration")?;

    let images = collect_inputs(&cli.inputs, &cfg.scan_options())?;
    info!(count = images.len(), "collected images");

    let reports = analyze::run(images, &cfg).await;
    print_reports(&reports, cli.format)?;

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        bail!("{failed} of {} images could not be analyzed", reports.len());
    }
    Ok(())
}
