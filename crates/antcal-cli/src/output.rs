//! Lifecycle-state rendering for the terminal and machine formats.

use crate::OutputFormat;
use antcal_core::{GainResult, SessionState};
use anyhow::Result;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Render a lifecycle state in the requested format.
///
/// Every state renders in every format, so scripted callers always get
/// well-formed output even while inputs are incomplete.
pub fn render(state: &SessionState, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(state)),
        OutputFormat::Json => render_json(state),
        OutputFormat::Csv => Ok(render_csv(state)),
    }
}

fn render_text(state: &SessionState) -> String {
    let mut out = String::new();
    match state {
        SessionState::AwaitingFiles { missing } => {
            let labels: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            let _ = writeln!(out, "Waiting for measurement files: {}", labels.join(", "));
            let _ = writeln!(
                out,
                "Supply all three pairwise .s2p files (--ab, --ac, --bc) to solve."
            );
        }
        SessionState::AwaitingFrequency => {
            let _ = writeln!(out, "All measurement files loaded.");
            let _ = writeln!(out, "Waiting for a target frequency (--freq, in MHz).");
        }
        SessionState::Ready(result) => {
            let _ = writeln!(
                out,
                "Three-antenna gain results at {:.2} MHz",
                result.frequency_mhz
            );
            let _ = writeln!(out, "=======================================");
            let _ = writeln!(out);
            let _ = writeln!(out, "Corrected transmissions:");
            let _ = writeln!(out, "  S21 1-2: {:>8.2} dB", result.s21_ab_db);
            let _ = writeln!(out, "  S21 1-3: {:>8.2} dB", result.s21_ac_db);
            let _ = writeln!(out, "  S21 2-3: {:>8.2} dB", result.s21_bc_db);
            let _ = writeln!(out);
            let _ = writeln!(out, "Absolute gains:");
            out.push_str(&render_bar_chart(result));
        }
        SessionState::Failed(err) => {
            let _ = writeln!(out, "Solve failed: {}", err);
        }
    }
    out
}

/// Text bar chart of the three gains, antenna 1 marked as the antenna
/// under test. Bars scale against the largest gain magnitude.
fn render_bar_chart(result: &GainResult) -> String {
    let chart = result.bar_chart();
    let max_abs = chart
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (i, (label, value)) in chart.iter().enumerate() {
        let suffix = if i == 0 { " (AUT)" } else { "" };
        let bar_len = if max_abs > 0.0 {
            ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {:<15} {:>8.2} dBi  {}",
            format!("{}{}", label, suffix),
            value,
            "#".repeat(bar_len)
        );
    }
    out
}

fn render_json(state: &SessionState) -> Result<String> {
    let json = match state {
        SessionState::AwaitingFiles { missing } => {
            let labels: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            serde_json::json!({
                "state": "awaiting_files",
                "missing": labels,
            })
        }
        SessionState::AwaitingFrequency => serde_json::json!({
            "state": "awaiting_frequency",
        }),
        SessionState::Ready(result) => serde_json::json!({
            "state": "ready",
            "frequency_mhz": result.frequency_mhz,
            "s21_db": {
                "pair_12": result.s21_ab_db,
                "pair_13": result.s21_ac_db,
                "pair_23": result.s21_bc_db,
            },
            "gains_dbi": {
                "antenna1": result.gain1_dbi,
                "antenna2": result.gain2_dbi,
                "antenna3": result.gain3_dbi,
            },
            "aut": "antenna1",
        }),
        SessionState::Failed(err) => serde_json::json!({
            "state": "failed",
            "error": err.to_string(),
        }),
    };
    let mut rendered = serde_json::to_string_pretty(&json)?;
    rendered.push('\n');
    Ok(rendered)
}

fn render_csv(state: &SessionState) -> String {
    let mut out = String::from("metric,value\n");
    match state {
        SessionState::AwaitingFiles { missing } => {
            let labels: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            let _ = writeln!(out, "state,awaiting_files");
            let _ = writeln!(out, "missing,{}", labels.join(";"));
        }
        SessionState::AwaitingFrequency => {
            let _ = writeln!(out, "state,awaiting_frequency");
        }
        SessionState::Ready(result) => {
            let _ = writeln!(out, "state,ready");
            let _ = writeln!(out, "frequency_mhz,{}", result.frequency_mhz);
            let _ = writeln!(out, "s21_12_db,{}", result.s21_ab_db);
            let _ = writeln!(out, "s21_13_db,{}", result.s21_ac_db);
            let _ = writeln!(out, "s21_23_db,{}", result.s21_bc_db);
            let _ = writeln!(out, "gain1_dbi,{}", result.gain1_dbi);
            let _ = writeln!(out, "gain2_dbi,{}", result.gain2_dbi);
            let _ = writeln!(out, "gain3_dbi,{}", result.gain3_dbi);
        }
        SessionState::Failed(err) => {
            let _ = writeln!(out, "state,failed");
            let _ = writeln!(out, "error,{}", err);
        }
    }
    out
}
