//! msw-export: write MSW keyword tables for a well model
//!
//! # Usage
//! ```bash
//! msw-export --model well.json --output well.sch
//! msw-export --model well.json --format json --mode ABS
//! msw-export --print-config > msw_export.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use msw_export::{collect_tables, export_wells_parallel, ExportConfig, LengthAndDepth, MswExportInfo};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "msw-export")]
#[command(about = "Multi-segment well WELSEGS/COMPSEGS/WSEGVALV/WSEGAICD export")]
#[command(version)]
struct CliArgs {
    /// Well model (JSON); can be given more than once
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_config")]
    model: Vec<PathBuf>,

    /// Export configuration (TOML). Defaults to $MSW_EXPORT_CONFIG or ./msw_export.toml
    #[arg(short, long, value_name = "FILE", env = "MSW_EXPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "deck")]
    format: OutputFormat,

    /// Override export.max_segment_length (m)
    #[arg(long)]
    max_segment_length: Option<f64>,

    /// Override export.length_and_depth (INC or ABS)
    #[arg(long, value_parser = parse_mode)]
    mode: Option<LengthAndDepth>,

    /// Leave the time stamp comment out of deck output
    #[arg(long)]
    no_stamp: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Simulator deck text
    Deck,
    /// Tables as structured JSON
    Json,
}

fn parse_mode(s: &str) -> Result<LengthAndDepth, String> {
    s.parse()
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(args: &CliArgs) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExportConfig::load(),
    };

    if let Some(max) = args.max_segment_length {
        config.export.max_segment_length = max;
    }
    if let Some(mode) = args.mode {
        config.export.length_and_depth = mode;
    }
    config.validate().context("Invalid export configuration")?;
    Ok(config)
}

fn load_models(paths: &[PathBuf]) -> Result<Vec<MswExportInfo>> {
    paths
        .iter()
        .map(|path| {
            MswExportInfo::load_json(path).with_context(|| format!("Failed to load model {}", path.display()))
        })
        .collect()
}

fn render_decks(models: Vec<MswExportInfo>, config: &ExportConfig, stamp: bool) -> Result<String> {
    let stamp = stamp.then(chrono::Utc::now);
    let mut output = String::new();
    for export in export_wells_parallel(models, config, stamp) {
        let (deck, _) = export.result.with_context(|| format!("Export failed for well {}", export.well_name))?;
        output.push_str(&deck);
    }
    Ok(output)
}

fn render_json(models: Vec<MswExportInfo>, config: &ExportConfig) -> Result<String> {
    let mut documents = Vec::with_capacity(models.len());
    for mut info in models {
        let (tables, summary) = collect_tables(&mut info, &config.export)
            .with_context(|| format!("Export failed for well {}", info.well_name))?;
        documents.push(serde_json::json!({ "summary": summary, "tables": tables.tables }));
    }
    let json = match documents.len() {
        1 => serde_json::to_string_pretty(&documents[0])?,
        _ => serde_json::to_string_pretty(&documents)?,
    };
    Ok(json + "\n")
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);
    let config = load_config(&args)?;

    if args.print_config {
        print!("{}", config.to_toml().context("Failed to serialize config")?);
        return Ok(());
    }

    let models = load_models(&args.model)?;
    let output = match args.format {
        OutputFormat::Deck => render_decks(models, &config, !args.no_stamp)?,
        OutputFormat::Json => render_json(models, &config)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), wells = args.model.len(), "Export written");
        }
        None => print!("{output}"),
    }
    Ok(())
}
