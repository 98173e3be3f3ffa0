//! Command-line front end: year scans and single-instant queries printed
//! as JSON. Logging is controlled through `RUST_LOG`.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use enoch_api::{BodySet, InstantRequest, YearRequest, instant_query, year_scan};
use enoch_eph::AnalyticEphemeris;

#[derive(Parser)]
#[command(name = "enoch", about = "Enoch calendar and celestial event engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the Enoch year containing an instant: days plus events
    Year {
        /// Datetime, ISO-8601 (signed/extended years allowed)
        #[arg(long)]
        date: String,
        /// Latitude in degrees
        #[arg(long, default_value = "0.0")]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, default_value = "0.0")]
        lon: f64,
        /// IANA timezone for bare datetimes
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Force the approximate epoch/sunset path
        #[arg(long)]
        approx: bool,
        /// Skip per-day bound enrichment
        #[arg(long)]
        fast: bool,
        /// Alignment body set: inner, classic5, seven, all
        #[arg(long, default_value = "seven")]
        align_planets: String,
        /// Minimum bodies for an alignment
        #[arg(long, default_value = "4")]
        align_min_count: usize,
        /// Maximum alignment arc in degrees
        #[arg(long, default_value = "30.0")]
        align_span_deg: f64,
        /// Also detect 2-body aspects
        #[arg(long)]
        aspects: bool,
    },
    /// Planet positions and Enoch date for one instant
    Instant {
        /// Datetime, ISO-8601 (signed/extended years allowed)
        #[arg(long)]
        date: String,
        /// Latitude in degrees
        #[arg(long, default_value = "0.0")]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, default_value = "0.0")]
        lon: f64,
        /// IANA timezone for bare datetimes
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Force the approximate epoch path
        #[arg(long)]
        approx: bool,
    },
}

fn parse_body_set(s: &str) -> Result<BodySet, String> {
    match s {
        "inner" => Ok(BodySet::Inner),
        "classic5" => Ok(BodySet::Classic5),
        "seven" => Ok(BodySet::Seven),
        "all" => Ok(BodySet::All),
        other => Err(format!("unknown body set {other:?} (inner, classic5, seven, all)")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let eph = AnalyticEphemeris::new();

    let result = match cli.command {
        Commands::Year {
            date,
            lat,
            lon,
            timezone,
            approx,
            fast,
            align_planets,
            align_min_count,
            align_span_deg,
            aspects,
        } => {
            let align_planets = match parse_body_set(&align_planets) {
                Ok(v) => v,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(2);
                }
            };
            let req = YearRequest {
                datetime: date,
                latitude: lat,
                longitude: lon,
                timezone,
                zodiac_mode: "tropical".to_string(),
                approx,
                fast,
                align_min_count,
                align_span_deg,
                align_step_hours: 24.0,
                align_planets,
                align_include_outer: align_planets == BodySet::All,
                align_include_moon: true,
                align_include_sun: true,
                align_detect_aspects: aspects,
                align_include_oppositions: true,
            };
            year_scan(&eph, &req).map(|resp| serde_json::to_string_pretty(&resp))
        }
        Commands::Instant {
            date,
            lat,
            lon,
            timezone,
            approx,
        } => {
            let req = InstantRequest {
                datetime: date,
                latitude: lat,
                longitude: lon,
                timezone,
                approx,
            };
            instant_query(&eph, &req).map(|resp| serde_json::to_string_pretty(&resp))
        }
    };

    match result {
        Ok(Ok(json)) => println!("{json}"),
        Ok(Err(e)) => {
            eprintln!("error: failed to serialize response: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error ({}): {e}", e.status_class());
            std::process::exit(1);
        }
    }
}
