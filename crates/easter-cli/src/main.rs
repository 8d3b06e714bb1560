//! `easter` CLI — Easter Sunday lookup and BYEASTER recurrence expansion.
//!
//! ## Usage
//!
//! ```sh
//! # Easter Sunday of a year (Julian computus up to 1583, Gregorian after)
//! easter sunday 2024
//!
//! # Force one algorithm, e.g. Orthodox Easter
//! easter sunday 2024 --computus julian
//!
//! # Expand yearly candidates to Good Friday and Easter Monday
//! easter transform --offsets=-2,1 --freq yearly 2024-01-01 2025-01-01
//!
//! # Keep only candidates that fall on Easter Sunday
//! easter transform --offsets 0 --freq daily 2024-03-30 2024-03-31
//!
//! # Expand a full RRULE with BYEASTER
//! easter expand --rrule "FREQ=YEARLY;BYEASTER=0" --dtstart 2024-01-01T10:00:00 --count 3
//!
//! # Show skipped-offset diagnostics
//! easter -v transform --offsets 400 --freq yearly 2024-01-01
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use easter_engine::{Computus, EasterOffsetRule, Frequency};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser)]
#[command(
    name = "easter",
    version,
    about = "Easter Sunday computus and BYEASTER recurrence expansion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log diagnostics (skipped offsets etc.) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the date of Easter Sunday for a year
    Sunday {
        /// The year
        #[arg(allow_negative_numbers = true)]
        year: i32,
        /// Algorithm to use ("auto" applies the 1583 cutover)
        #[arg(long, value_enum, default_value_t = ComputusArg::Auto)]
        computus: ComputusArg,
        /// Print a JSON object instead of a bare date
        #[arg(long)]
        json: bool,
    },
    /// Apply a BYEASTER rule to a list of dates
    Transform {
        /// Comma-separated day offsets relative to Easter Sunday
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        offsets: Vec<i32>,
        /// Recurrence frequency (YEARLY expands, anything else limits)
        #[arg(long, default_value = "YEARLY")]
        freq: String,
        /// Dates as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS (one date-time makes all date-times)
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// Expand an RRULE (optionally with BYEASTER) into concrete instances
    Expand {
        /// RRULE string, e.g. "FREQ=YEARLY;BYEASTER=-2,0"
        #[arg(long)]
        rrule: String,
        /// Local start datetime (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        dtstart: String,
        /// IANA timezone of dtstart
        #[arg(long, default_value = "UTC")]
        tz: String,
        /// Duration of each instance in minutes
        #[arg(long, default_value_t = 60)]
        duration: u32,
        /// Local end boundary (YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        until: Option<String>,
        /// Maximum number of instances
        #[arg(long)]
        count: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ComputusArg {
    Auto,
    Julian,
    Gregorian,
}

#[derive(Serialize)]
struct SundayOutput {
    year: i32,
    computus: &'static str,
    date: String,
}

#[derive(Serialize)]
struct EventOutput {
    start: String,
    end: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sunday {
            year,
            computus,
            json,
        } => {
            let computus = match computus {
                ComputusArg::Auto => Computus::for_year(year),
                ComputusArg::Julian => Computus::Julian,
                ComputusArg::Gregorian => Computus::Gregorian,
            };
            let date = computus
                .easter_sunday(year)
                .with_context(|| format!("Failed to compute Easter Sunday for {}", year))?;
            let date = date.format(DATE_FORMAT).to_string();

            if json {
                let output = SundayOutput {
                    year,
                    computus: match computus {
                        Computus::Julian => "julian",
                        Computus::Gregorian => "gregorian",
                    },
                    date,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("{}", date);
            }
        }
        Commands::Transform {
            offsets,
            freq,
            dates,
        } => {
            let frequency: Frequency = freq
                .parse()
                .with_context(|| format!("Unknown frequency: '{}'", freq))?;
            let rule = EasterOffsetRule::new(offsets, frequency);
            tracing::debug!(
                offsets = ?rule.offsets(),
                frequency = %frequency,
                candidates = dates.len(),
                "applying BYEASTER rule"
            );
            let lines = rule
                .transform_iso(dates.as_slice())
                .context("Failed to parse candidate dates")?;
            for line in lines {
                println!("{}", line);
            }
        }
        Commands::Expand {
            rrule,
            dtstart,
            tz,
            duration,
            until,
            count,
        } => {
            let events = easter_engine::expand_rrule(
                &rrule,
                &dtstart,
                duration,
                &tz,
                until.as_deref(),
                count,
            )
            .context("Failed to expand RRULE")?;

            let output: Vec<EventOutput> = events
                .iter()
                .map(|e| EventOutput {
                    start: e.start.to_rfc3339(),
                    end: e.end.to_rfc3339(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
