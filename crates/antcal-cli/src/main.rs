//! antcal: Three-antenna absolute gain calculator.
//!
//! Command-line front end over antcal-core: reads the three pairwise
//! measurement files, solves for the individual antenna gains at the
//! requested frequency and renders the outcome.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use antcal_core::{GainRequest, MeasurementTable, SessionState};

#[derive(Parser)]
#[command(name = "antcal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for the three antenna gains at a target frequency
    Solve {
        /// .s2p file for the antenna 1 - antenna 2 measurement
        #[arg(long)]
        ab: Option<PathBuf>,

        /// .s2p file for the antenna 1 - antenna 3 measurement
        #[arg(long)]
        ac: Option<PathBuf>,

        /// .s2p file for the antenna 2 - antenna 3 measurement
        #[arg(long)]
        bc: Option<PathBuf>,

        /// Target frequency in MHz (zero means not yet chosen)
        #[arg(long, default_value = "0.0")]
        freq: f64,

        /// Also write the rendered output to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and summarize a two-port measurement file
    Inspect {
        /// Path to the .s2p file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Solve {
            ab,
            ac,
            bc,
            freq,
            output,
        } => {
            let state = run_solve(ab, ac, bc, freq, output, cli.format)?;
            if matches!(state, SessionState::Failed(_)) {
                std::process::exit(1);
            }
        }
        Commands::Inspect { file } => {
            inspect(&file)?;
        }
    }

    Ok(())
}

/// Parse one optional measurement file into its request slot.
///
/// An unsupplied path and a supplied-but-empty file both leave the slot
/// `None`; only genuinely malformed files fail.
fn load_pair(path: Option<&PathBuf>) -> Result<Option<MeasurementTable>> {
    match path {
        None => Ok(None),
        Some(p) => {
            tracing::info!("Reading measurement file {:?}", p);
            MeasurementTable::from_file(p)
                .with_context(|| format!("failed to read {}", p.display()))
        }
    }
}

fn run_solve(
    ab: Option<PathBuf>,
    ac: Option<PathBuf>,
    bc: Option<PathBuf>,
    freq: f64,
    output_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<SessionState> {
    let request = GainRequest {
        ab: load_pair(ab.as_ref())?,
        ac: load_pair(ac.as_ref())?,
        bc: load_pair(bc.as_ref())?,
        target_mhz: freq,
    };

    let state = request.evaluate();
    let rendered = output::render(&state, format)?;
    print!("{rendered}");

    if let Some(path) = output_path {
        std::fs::write(&path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote results to {:?}", path);
    }

    Ok(state)
}

fn inspect(file: &PathBuf) -> Result<()> {
    tracing::info!("Reading measurement file {:?}", file);

    let table = MeasurementTable::from_file(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let Some(table) = table else {
        println!("Measurement file: {}", file.display());
        println!("  No data rows (treated as a missing measurement)");
        return Ok(());
    };

    println!("Measurement file: {}", file.display());
    println!("  Rows: {}", table.len());
    match table.declared_unit() {
        Some(unit) => println!("  Declared unit: {}", unit.label()),
        None => println!("  Declared unit: none"),
    }
    println!("  Detected unit: {}", table.detected_unit().label());

    let (start, stop) = table.freq_span_mhz();
    println!("  Frequency span: {:.3} MHz - {:.3} MHz", start, stop);

    let s21 = table.s21_db();
    let s21_min = s21.iter().copied().fold(f64::INFINITY, f64::min);
    let s21_max = s21.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!("  S21 range: {:.2} dB to {:.2} dB", s21_min, s21_max);

    if !table.comments().is_empty() {
        println!("  Comments:");
        for comment in table.comments() {
            println!("    ! {}", comment);
        }
    }

    Ok(())
}
