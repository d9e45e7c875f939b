//! Trip Productivity Report
//!
//! Loads trips, manifests and LR bookings from the record store and prints
//! per-trip revenue, expense and profit figures.

mod config;
mod export;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::{Config, FileConfig, SourceConfig};
use trip_productivity::constants;
use trip_productivity::{
    FileSource, RecordSource, ReferenceIndex, ReportFilter, Resources, RestSource, Snapshot,
    TripProductivityReport, load_snapshot, normalize, report, revenue,
};

#[derive(Parser, Debug)]
#[command(name = "trip-productivity")]
#[command(about = "Per-trip revenue, expense and profit report")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = constants::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Load collections from JSON files in this directory
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load collections from this REST store URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Earliest trip date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    from: Option<String>,

    /// Latest trip date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    to: Option<String>,

    /// Match trip number, origin, destination or vehicle number
    #[arg(short, long, global = true)]
    search: Option<String>,

    /// Leave out trips with status "Closed"
    #[arg(long, global = true)]
    exclude_closed: bool,

    /// Keep trips with status "Closed" even if config.toml leaves them out
    #[arg(long, global = true, conflicts_with = "exclude_closed")]
    include_closed: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the trip productivity report (default)
    Report {
        /// Also write the report as CSV
        #[arg(long, num_args = 0..=1, default_missing_value = constants::REPORT_FILENAME)]
        csv: Option<PathBuf>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one trip with its LRs and expense breakdown
    Trip {
        /// Trip number, e.g. TRIP007
        trip_number: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = FileConfig::load_or_default(&args.config)?;
    let config = Config::from_file(file_config, args.data_dir.clone(), args.base_url.clone());
    let filter = build_filter(&args, &config)?;

    let command = args.command.unwrap_or(Command::Report {
        csv: None,
        json: false,
    });

    let quiet = matches!(command, Command::Report { json: true, .. });
    let snapshot = load(&config, quiet).await?;
    let (index, report) = build(&snapshot, &filter, quiet);

    match command {
        Command::Report { csv, json } => run_report(&report, csv, json),
        Command::Trip { trip_number } => show_trip(&report, &index, &trip_number),
    }
}

/// Parse a YYYY-MM-DD command-line date
fn parse_date_arg(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date '{}'. Use YYYY-MM-DD", flag, value))
}

fn build_filter(args: &Args, config: &Config) -> Result<ReportFilter> {
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date_arg(s, "--from"))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date_arg(s, "--to"))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("--from ({}) is after --to ({})", from, to);
        }
    }

    Ok(ReportFilter {
        from,
        to,
        search: args.search.clone(),
        include_closed: if args.include_closed {
            true
        } else if args.exclude_closed {
            false
        } else {
            config.include_closed
        },
    })
}

/// Load every collection from the configured source
async fn load(config: &Config, quiet: bool) -> Result<Snapshot> {
    match &config.source {
        SourceConfig::Files { data_dir } => {
            let source = FileSource::new(data_dir);
            if !quiet {
                println!("Loading records from {}...", source.data_dir().display());
            }
            load_from(&source, &config.resources, quiet).await
        }
        SourceConfig::Rest {
            base_url,
            api_token,
        } => {
            let source = RestSource::new(base_url, api_token.clone());
            if !quiet {
                println!("Loading records from {}...", source.base_url());
            }
            load_from(&source, &config.resources, quiet).await
        }
    }
}

async fn load_from<S: RecordSource>(
    source: &S,
    resources: &Resources,
    quiet: bool,
) -> Result<Snapshot> {
    let snapshot = load_snapshot(source, resources)
        .await
        .context("Could not load report data. No report was produced; check the record store and retry")?;

    if !quiet {
        println!("  Trips: {}", snapshot.trips.len());
        println!("  Manifests: {}", snapshot.manifests.len());
        println!(
            "  LR bookings: {} ({} general, {} part-load, {} full-load)\n",
            snapshot.booking_record_count(),
            snapshot.general_bookings.len(),
            snapshot.part_load_bookings.len(),
            snapshot.full_load_bookings.len()
        );
    }

    Ok(snapshot)
}

/// Index bookings and manifests, then build the report against that index
fn build(
    snapshot: &Snapshot,
    filter: &ReportFilter,
    quiet: bool,
) -> (ReferenceIndex, TripProductivityReport) {
    let index = snapshot.reference_index();

    if !quiet {
        println!(
            "Indexed {} LRs and {} manifests by id",
            index.booking_count(),
            index.manifest_count()
        );
        let shadowed = snapshot.booking_record_count() - index.booking_count();
        if shadowed > 0 {
            eprintln!(
                "  Warning: {} LR record(s) have a blank or repeated id and were not indexed",
                shadowed
            );
        }
    }

    let trips = normalize::normalize_trips(&snapshot.trips);
    let report = report::build_report_from(&trips, &index, filter);
    (index, report)
}

fn run_report(report: &TripProductivityReport, csv: Option<PathBuf>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "Matched {} of {} trip records",
        report.trips_matched, report.trips_scanned
    );

    if report.is_empty() {
        println!("\nNo trips match the selected filters.");
        return Ok(());
    }

    let unresolved: usize = report
        .rows
        .iter()
        .filter(|row| row.booking_count > 0 && row.revenue == 0.0)
        .count();
    if unresolved > 0 {
        eprintln!(
            "  Warning: {} trip(s) reference LRs but show no revenue (missing or unpriced bookings)",
            unresolved
        );
    }

    println!();
    export::print_table(report);
    export::print_summary(report);

    if let Some(path) = csv {
        println!("\nWriting CSV report...");
        export::write_csv(&path, report)?;
    }

    Ok(())
}

fn show_trip(
    report: &TripProductivityReport,
    index: &ReferenceIndex,
    trip_number: &str,
) -> Result<()> {
    let Some(row) = report.find(trip_number) else {
        anyhow::bail!(
            "Trip '{}' not found ({} trips matched the filters)",
            trip_number,
            report.rows.len()
        );
    };

    let bookings = revenue::booking_breakdown(&row.booking_ids, index);
    export::print_trip_detail(row, &bookings);
    Ok(())
}
