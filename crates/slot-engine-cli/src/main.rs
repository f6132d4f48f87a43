//! `slots` CLI -- compute bookable slots, re-check a slot, and format instants.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for a request (stdin → stdout), labelled in the viewer's zone
//! slots available --display-tz Europe/Berlin < request.json
//!
//! # Pin "now" and load query defaults from a TOML file
//! slots available -i request.json --now 2026-03-15T12:00:00Z --config query.toml
//!
//! # Raw slot map instead of rendered day views
//! slots available -i request.json --raw -o slots.json
//!
//! # Re-check one slot against fresh bookings right before confirming it
//! slots check -i request.json --start 2026-03-16T14:00:00Z --end 2026-03-16T14:30:00Z
//!
//! # Format an instant for display
//! slots format --instant 2026-03-16T13:00:00Z --tz America/New_York
//! ```
//!
//! A request is a JSON object:
//!
//! ```json
//! {
//!   "windows": [{"weekday": 1, "startTime": "09:00", "endTime": "12:00", "timezone": "America/New_York"}],
//!   "bookings": [{"start_time": "2026-03-16T14:00:00Z", "end_time": "2026-03-16T14:30:00Z"}],
//!   "query": {"duration_minutes": 30, "buffer_before_minutes": 15},
//!   "holiday_mode": false
//! }
//! ```

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use slot_engine::booking::{parse_booking_records, BookingRecord};
use slot_engine::{
    format_date, format_time, parse_datetime, render, AvailabilityEngine, AvailabilityWindow,
    HostSettings, SlotError, SlotQuery, TimeSlot,
};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Meeting availability slot engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots per day
    Available {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference "now" as RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// IANA timezone for slot labels
        #[arg(long, env = "SLOTS_DISPLAY_TZ", default_value = "UTC")]
        display_tz: String,
        /// TOML file with query defaults; the request's "query" overrides it
        #[arg(long)]
        config: Option<String>,
        /// Print the raw date → slots map instead of rendered day views
        #[arg(long)]
        raw: bool,
    },
    /// Re-check a single slot against the request's bookings
    Check {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Slot start, RFC 3339
        #[arg(long)]
        start: String,
        /// Slot end, RFC 3339
        #[arg(long)]
        end: String,
        /// Reference "now" as RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// TOML file with query defaults; the request's "query" overrides it
        #[arg(long)]
        config: Option<String>,
    },
    /// Format an instant as display time and date
    Format {
        /// Instant to format, RFC 3339
        #[arg(long)]
        instant: String,
        /// IANA timezone of the viewer
        #[arg(long, env = "SLOTS_DISPLAY_TZ", default_value = "UTC")]
        tz: String,
    },
}

/// Request body shared by `available` and `check`.
#[derive(Deserialize)]
struct Request {
    #[serde(default)]
    windows: Vec<AvailabilityWindow>,
    #[serde(default)]
    bookings: Vec<BookingRecord>,
    #[serde(default)]
    query: Option<serde_json::Value>,
    #[serde(default)]
    holiday_mode: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Available {
            input,
            output,
            now,
            display_tz,
            config,
            raw,
        } => {
            let request = read_request(input.as_deref())?;
            let query = build_query(config.as_deref(), request.query.as_ref())?;
            let now = resolve_now(now.as_deref())?;
            let bookings = parse_booking_records(request.bookings)
                .context("Failed to parse bookings")?;

            let engine = AvailabilityEngine::new(Arc::new(HostSettings::new(request.holiday_mode)));
            let availability = engine
                .available_slots(&request.windows, &bookings, &query, now)
                .context("Failed to compute availability")?;
            debug!(days = availability.len(), "availability ready");

            let json = if raw {
                serde_json::to_string_pretty(&availability)?
            } else {
                serde_json::to_string_pretty(&render(&availability, &display_tz))?
            };
            write_output(output.as_deref(), &json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            input,
            start,
            end,
            now,
            config,
        } => {
            let request = read_request(input.as_deref())?;
            let query = build_query(config.as_deref(), request.query.as_ref())?;
            let now = resolve_now(now.as_deref())?;
            let bookings = parse_booking_records(request.bookings)
                .context("Failed to parse bookings")?;
            let slot = TimeSlot::new(
                parse_datetime(&start).context("Invalid --start")?,
                parse_datetime(&end).context("Invalid --end")?,
            );

            let engine = AvailabilityEngine::new(Arc::new(HostSettings::new(request.holiday_mode)));
            match engine.recheck(&slot, &bookings, &query, now) {
                Ok(()) => {
                    println!("available");
                    Ok(ExitCode::SUCCESS)
                }
                Err(SlotError::SlotTaken { conflicts }) => {
                    println!("taken");
                    println!("{}", serde_json::to_string_pretty(&conflicts)?);
                    Ok(ExitCode::FAILURE)
                }
                Err(SlotError::HostUnavailable) => {
                    println!("unavailable");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e).context("Failed to re-check slot"),
            }
        }
        Commands::Format { instant, tz } => {
            let instant = parse_datetime(&instant).context("Invalid --instant")?;
            println!("{}", format_time(instant, &tz));
            println!("{}", format_date(instant, &tz));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build the query: defaults, then the TOML config file, then the request's overrides.
fn build_query(config: Option<&str>, overrides: Option<&serde_json::Value>) -> Result<SlotQuery> {
    let base = match config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            toml::from_str::<SlotQuery>(&content)
                .with_context(|| format!("Failed to parse config: {}", path))?
        }
        None => SlotQuery::default(),
    };

    let Some(overrides) = overrides else {
        return Ok(base);
    };
    let Some(fields) = overrides.as_object() else {
        anyhow::bail!("\"query\" must be a JSON object");
    };

    let mut merged = serde_json::to_value(&base)?;
    if let Some(target) = merged.as_object_mut() {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(merged).context("Invalid \"query\" in request")
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => parse_datetime(s).context("Invalid --now"),
        None => Ok(Utc::now()),
    }
}

fn read_request(path: Option<&str>) -> Result<Request> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
