//! Check a historian export against a TDT from the command line.
//!
//! Usage:
//!   hist-check --tdt point_survey.csv --historical unit1.csv --unit "Unit 1"
//!
//! Prints the unit report as JSON on stdout. Without `--historical` only the
//! parsed template summary is printed.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tdt_hist::config::AnalysisConfig;
use tdt_hist::core::domain::{TdtIdentity, TemplateCatalog};
use tdt_hist::io::loaders::{HistoricalLoader, TemplateLoader};
use tdt_hist::parsing::tdt_parser::parse_template;
use tdt_hist::services::unit_report::{build_unit_report, ReportOptions};
use tdt_hist::session::SessionStore;

#[derive(Parser, Debug)]
#[command(version, about = "Validate historian exports against a Tag Definition Table")]
struct Args {
    /// Point Survey sheet of the TDT, saved as CSV
    #[arg(long)]
    tdt: PathBuf,

    /// Historian export for the selected unit
    #[arg(long)]
    historical: Option<PathBuf>,

    /// Plant unit to check (defaults to the first unit of the TDT)
    #[arg(long)]
    unit: Option<String>,

    /// Rolling window for freeze detection, in hours
    #[arg(long)]
    window_hours: Option<u32>,

    /// List every joined point, not only the offending ones
    #[arg(long)]
    full_listing: bool,

    /// Settings file (falls back to TDT_HIST_CONFIG, then analysis.toml)
    #[arg(long, env = "TDT_HIST_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct TemplateSummary<'a> {
    identity: &'a str,
    title: Option<&'a str>,
    units: Vec<UnitSummary<'a>>,
}

#[derive(Serialize)]
struct UnitSummary<'a> {
    label: &'a str,
    points: usize,
    analog_points: usize,
}

fn summarize<'a>(
    identity: &'a TdtIdentity,
    catalog: &'a TemplateCatalog,
    analog: &str,
) -> TemplateSummary<'a> {
    TemplateSummary {
        identity: identity.as_str(),
        title: catalog.title.as_deref(),
        units: catalog
            .units
            .iter()
            .map(|u| UnitSummary {
                label: &u.label,
                points: u.entries.len(),
                analog_points: catalog.points_of_type(&u.label, analog).len(),
            })
            .collect(),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().parse_lossy(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path),
        None => AnalysisConfig::load_or_default(),
    }
    .and_then(AnalysisConfig::with_env_overrides)?;

    let tdt_bytes = std::fs::read(&args.tdt)
        .with_context(|| format!("Failed to read TDT {}", args.tdt.display()))?;
    let raw = TemplateLoader::load_from_bytes(&tdt_bytes)?;
    let catalog = parse_template(&raw, &config.template)?;
    let identity = TdtIdentity::from_bytes(&tdt_bytes);

    let mut store = SessionStore::new();
    store.load_tdt(identity.clone(), &catalog.unit_labels());
    info!(
        "Loaded TDT {} with {} plant unit(s)",
        args.tdt.display(),
        catalog.units.len()
    );

    let Some(hist_path) = &args.historical else {
        return print_json(
            &summarize(&identity, &catalog, &config.template.analog_point_type),
            args.pretty,
        );
    };

    let unit = match &args.unit {
        Some(unit) => unit.clone(),
        None => store
            .unit_labels()
            .first()
            .cloned()
            .context("TDT has no plant units")?,
    };

    let table = HistoricalLoader::load_from_csv(hist_path)?;
    let filename = hist_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    store.set_historical(&unit, table, filename)?;

    let table = store
        .get_historical(&unit)
        .context("historical upload missing after store")?;
    let options = ReportOptions {
        window_hours: args.window_hours,
        full_listing: args.full_listing,
    };
    let report = build_unit_report(&catalog, &unit, table, &config, &options)?;

    for advisory in &report.advisories {
        warn!("{}", advisory.message());
    }

    print_json(&report, args.pretty)
}
