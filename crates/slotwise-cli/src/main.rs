//! `slotwise` CLI — compute bookable availability from a JSON request file.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for one date (request on stdin, result on stdout)
//! slotwise day --date 2026-03-16 < request.json
//!
//! # From file to file, with a pinned clock
//! slotwise day --date 2026-03-16 --now 2026-03-01T00:00:00Z -i request.json -o slots.json
//!
//! # A month of per-date booleans, or full slot lists with --eager
//! slotwise month --month 2026-03 -i request.json
//! slotwise month --month 2026-03 --eager -i request.json
//!
//! # Summarize one date (windows, busy spans, slot count)
//! slotwise stats --date 2026-03-16 -i request.json
//! ```

mod request;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Read};

use request::BookingRequest;
use slotwise_engine::engine::{available_slots_from, month_availability_from, MonthMode};
use slotwise_engine::tz::parse_zone;
use slotwise_engine::windows::resolve_open_windows;

#[derive(Parser)]
#[command(
    name = "slotwise",
    version,
    about = "Availability calculator for appointment scheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bookable slots for a single date
    Day {
        /// Date to compute, e.g. 2026-03-16
        #[arg(long)]
        date: NaiveDate,
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Request instant in RFC 3339 UTC (defaults to the current time)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Compute availability for a calendar month
    Month {
        /// Month to compute, e.g. 2026-03
        #[arg(long)]
        month: String,
        /// Embed full slot lists instead of per-date booleans
        #[arg(long)]
        eager: bool,
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Request instant in RFC 3339 UTC (defaults to the current time)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Summarize one date: open windows, busy spans, slot count
    Stats {
        /// Date to summarize, e.g. 2026-03-16
        #[arg(long)]
        date: NaiveDate,
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Request instant in RFC 3339 UTC (defaults to the current time)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Day {
            date,
            input,
            output,
            now,
        } => {
            let request = load_request(input.as_deref())?;
            let now = now.unwrap_or_else(Utc::now);

            let day = available_slots_from(
                &request,
                date,
                &request.organizer_tz,
                &request.viewer_tz,
                &request.config,
                now,
            )?;
            warn_if_degraded(day.degraded);
            let json = serde_json::to_string_pretty(&day)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Month {
            month,
            eager,
            input,
            output,
            now,
        } => {
            let (year, month) = parse_month(&month)?;
            let request = load_request(input.as_deref())?;
            let now = now.unwrap_or_else(Utc::now);
            let mode = if eager {
                MonthMode::Eager
            } else {
                MonthMode::Summary
            };

            let availability = month_availability_from(
                &request,
                year,
                month,
                &request.organizer_tz,
                &request.viewer_tz,
                &request.config,
                mode,
                now,
            )?;
            warn_if_degraded(availability.degraded);
            let json = serde_json::to_string_pretty(&availability)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Stats { date, input, now } => {
            let request = load_request(input.as_deref())?;
            let now = now.unwrap_or_else(Utc::now);

            let organizer = parse_zone(&request.organizer_tz)?;
            let windows =
                resolve_open_windows(date, &request.weekly, &request.exceptions, organizer)?;
            let (busy_spans, _) = request.busy_sources().merged();
            let day = available_slots_from(
                &request,
                date,
                &request.organizer_tz,
                &request.viewer_tz,
                &request.config,
                now,
            )?;
            warn_if_degraded(day.degraded);

            println!(
                "Date:            {} ({} -> {})",
                date, request.organizer_tz, request.viewer_tz
            );
            println!("Open windows:    {}", windows.len());
            println!("Busy spans:      {}", busy_spans.len());
            println!("Bookable slots:  {}", day.slots.len());
            if let (Some(first), Some(last)) = (day.slots.first(), day.slots.last()) {
                println!(
                    "First slot:      {} ({} organizer time)",
                    first.start, first.organizer.start
                );
                println!(
                    "Last slot:       {} ({} organizer time)",
                    last.start, last.organizer.start
                );
            }
        }
    }

    Ok(())
}

/// Parse a `YYYY-MM` month argument.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("Invalid month '{}': expected YYYY-MM", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in month '{}'", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{}'", raw))?;
    Ok((year, month))
}

/// A failed external feed is not fatal, but the caller should know the
/// result may offer slots that are actually taken.
fn warn_if_degraded(degraded: bool) {
    if degraded {
        eprintln!(
            "warning: one or more external calendars could not be fetched; \
             availability may be optimistic"
        );
    }
}

fn load_request(path: Option<&str>) -> Result<BookingRequest> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse request JSON")
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
            print!("{}", content);
        }
    }
    Ok(())
}
