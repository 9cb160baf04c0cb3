//! Rendering of reconstructed patterns

use anyhow::Result;
use clap::ValueEnum;
use patrecon_core::{Pattern3D, Reconstruction};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// θ rows by φ columns, comma separated
    Csv,
    /// Full reconstruction result including warnings
    Json,
}

pub fn render(rec: &Reconstruction, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(to_csv(&rec.pattern)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rec)?),
    }
}

/// Header `theta\phi,<phi...>`, then one line per θ.
pub fn to_csv(pattern: &Pattern3D) -> String {
    let mut out = String::from("theta\\phi");
    for phi in &pattern.phi {
        let _ = write!(out, ",{}", phi);
    }
    out.push('\n');

    for (theta, row) in pattern.theta.iter().zip(pattern.gain.iter_rows()) {
        out.push_str(&theta.to_string());
        for gain in row {
            let _ = write!(out, ",{:.4}", gain);
        }
        out.push('\n');
    }
    out
}
