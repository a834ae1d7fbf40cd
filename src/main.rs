//! Boundaries - World Bank administrative boundaries as tables
//!
//! Fetches boundary polygons from the World Bank ArcGIS feature services:
//! - Country outlines, matched by any attribute (ISO_A3, NAME_EN, WB_A3, ...)
//! - Admin level 1 subdivisions (provinces, departments, states)
//! - Admin level 2 subdivisions (districts, communes, counties)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geo::Area;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boundaries::api::BoundaryClient;
use boundaries::config::Config;
use boundaries::error::FetchOutcome;
use boundaries::export::{self, ExportFormat};
use boundaries::models::{self, CountryRecord, SubdivisionTable, format_json_value};

/// Columns shown in the subdivision summary, when present
const SUMMARY_COLUMNS: &[&str] = &["NAM_0", "NAM_1", "NAM_2", "ADM1CD_c", "ADM2CD_c"];

/// Boundaries - fetch country and subdivision boundary polygons
#[derive(Parser, Debug)]
#[command(name = "boundaries")]
#[command(about = "Fetch World Bank administrative boundaries with polygon geometry")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// ArcGIS services root URL
    #[arg(long, global = true, env = "BOUNDARIES_SERVICE_URL")]
    service_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "BOUNDARIES_TIMEOUT")]
    timeout: Option<u64>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Export format
    #[arg(long, global = true, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Export path (default: exports/<query>_<timestamp>.<ext>)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Only print the summary
    #[arg(long, global = true, default_value = "false")]
    no_export: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Country boundary matching an attribute value
    Country {
        /// Attribute to match (e.g., ISO_A3, NAME_EN, WB_A2, WB_A3)
        #[arg(short, long, default_value = "ISO_A3")]
        attr: String,

        /// Value to match exactly (e.g., HTI, Haiti)
        value: String,
    },
    /// Admin level 1 subdivisions of a country
    Admin1 {
        /// ISO 3-letter country code (e.g., HTI)
        iso: String,
    },
    /// Admin level 2 subdivisions of a country
    Admin2 {
        /// ISO 3-letter country code (e.g., MMR)
        iso: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging (set RUST_LOG=info to see query diagnostics)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = &args.service_url {
        config.service_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    let client = BoundaryClient::new(&config).context("Failed to create boundary client")?;

    match &args.command {
        Command::Country { attr, value } => {
            let outcome = client.fetch_country(attr, value).await;
            finish(outcome, &format!("{}='{}'", attr, value), |record| {
                print_country(&record);
                if let Some(path) = export_path(&args, &format!("{}_{}", attr, value)) {
                    let written = export::export_country(&record, args.format, &path)?;
                    eprintln!("Exported to {}", written);
                }
                Ok(())
            })
        }
        Command::Admin1 { iso } => {
            let outcome = client.fetch_admin1(iso).await;
            finish(outcome, &format!("admin 1 ISO='{}'", iso), |table| {
                write_subdivisions(&args, &table, &format!("{}_admin1", iso))
            })
        }
        Command::Admin2 { iso } => {
            let outcome = client.fetch_admin2(iso).await;
            finish(outcome, &format!("admin 2 ISO='{}'", iso), |table| {
                write_subdivisions(&args, &table, &format!("{}_admin2", iso))
            })
        }
    }
}

/// Map an outcome to an exit code, handing successes to `on_success`
fn finish<T>(
    outcome: FetchOutcome<T>,
    subject: &str,
    on_success: impl FnOnce(T) -> Result<()>,
) -> Result<ExitCode> {
    match outcome {
        FetchOutcome::Success(value) => {
            on_success(value)?;
            Ok(ExitCode::SUCCESS)
        }
        FetchOutcome::NotFound => {
            eprintln!("No features found for {}", subject);
            Ok(ExitCode::SUCCESS)
        }
        FetchOutcome::NetworkFailure(e) => {
            eprintln!("Request error: {}", e);
            Ok(ExitCode::FAILURE)
        }
        FetchOutcome::ParseFailure(e) => {
            eprintln!("Error processing data: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn write_subdivisions(args: &Args, table: &SubdivisionTable, name: &str) -> Result<()> {
    print_subdivisions(table);
    if let Some(path) = export_path(args, name) {
        let written = export::export_subdivisions(table, args.format, &path)?;
        eprintln!("Exported to {}", written);
    }
    Ok(())
}

fn export_path(args: &Args, name: &str) -> Option<PathBuf> {
    if args.no_export {
        return None;
    }
    if let Some(path) = &args.output {
        return Some(path.clone());
    }

    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Some(PathBuf::from(format!(
        "exports/{}_{}.{}",
        name,
        timestamp,
        args.format.extension()
    )))
}

fn print_country(record: &CountryRecord) {
    for (name, value) in &record.rows {
        println!("{:<16} {}", name, format_json_value(value));
    }
    println!(
        "{:<16} {} polygon part(s), area {:.4} sq. deg",
        models::RINGS_LABEL,
        record.rings.0.len(),
        record.rings.unsigned_area()
    );
    if record.match_count > 1 {
        println!("({} features matched, showing the first)", record.match_count);
    }
}

fn print_subdivisions(table: &SubdivisionTable) {
    let shown: Vec<&str> = SUMMARY_COLUMNS
        .iter()
        .copied()
        .filter(|c| table.columns.iter().any(|name| name == c))
        .collect();

    println!(
        "{} {} subdivisions for {}",
        table.len(),
        table.layer.label(),
        table.iso_code
    );
    for row in &table.rows {
        let cells: Vec<String> = shown
            .iter()
            .map(|c| row.get(c).map(format_json_value).unwrap_or_default())
            .collect();
        let parts = row
            .geometry
            .as_ref()
            .map(|g| format!("{} part(s)", g.0.len()))
            .unwrap_or_else(|| "no geometry".to_string());
        println!("  {}  [{}]", cells.join(" | "), parts);
    }
}
