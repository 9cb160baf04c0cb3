//! patrecon CLI
//!
//! Reconstructs a 3D antenna pattern from the two slices described in a job
//! file and prints the result on stdout.
//!
//! # Commands
//!
//! - `reconstruct`: validate, combine and print the (θ, φ) gain grid
//! - `check`: run validation only and report warnings
//! - `config`: print the effective or an example configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use patrecon_core::observe::{init_logging, LogLevel};
use patrecon_core::{reconstruct, validate, PatreconConfig, ReconstructionMethod};
use std::path::PathBuf;

mod job;
mod output;

use job::Job;
use output::OutputFormat;

/// 3D antenna pattern reconstruction from orthogonal slices
#[derive(Parser)]
#[command(name = "patrecon")]
#[command(version)]
#[command(about = "Reconstruct 3D antenna patterns from vertical and horizontal cuts")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (overrides the search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named profile from the configuration file
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the 3D pattern described by a job file
    Reconstruct {
        /// Job file (YAML)
        job: PathBuf,

        /// Combination method (Summing, CrossWeighted)
        #[arg(long)]
        method: Option<String>,

        /// Cross-Weighted normalization exponent
        #[arg(long)]
        k: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Validate the slices of a job file without reconstructing
    Check {
        /// Job file (YAML)
        job: PathBuf,
    },
    /// Print configuration
    Config {
        /// Print an example configuration instead of the effective one
        #[arg(long)]
        example: bool,
    },
}

fn load_config(cli: &Cli) -> Result<PatreconConfig> {
    let config = match &cli.config {
        Some(path) => PatreconConfig::load_from(path)?,
        None => PatreconConfig::load()?,
    };
    let config = match &cli.profile {
        Some(name) => config.with_profile(name)?,
        None => config,
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("failed to load configuration")?;

    // -v flags take precedence over the configured level
    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
        log_config.filter = None;
    }
    init_logging(&log_config);

    match cli.command {
        Commands::Reconstruct {
            job,
            method,
            k,
            format,
        } => {
            let job = Job::load(&job)?;
            let mut options = job.apply_overrides(config.options())?;
            if let Some(method) = method {
                options.method = method.parse::<ReconstructionMethod>()?;
            }
            if let Some(k) = k {
                options.cross_weighted_k = k;
            }

            let rec = reconstruct(&job.vertical, job.horizontal_input(), &options)
                .context("reconstruction failed")?;
            tracing::info!(
                method = %rec.method,
                max_directivity = rec.max_directivity,
                theta = rec.pattern.theta.len(),
                phi = rec.pattern.phi.len(),
                "pattern reconstructed"
            );
            print!("{}", output::render(&rec, format)?);
        }
        Commands::Check { job } => {
            let job = Job::load(&job)?;
            let options = job.apply_overrides(config.options())?;
            let horizontal = job.horizontal_input().materialize(job.vertical.max_gain());
            let warnings = validate(&job.vertical, &horizontal, &options.tolerances)
                .context("validation failed")?;

            for warning in &warnings {
                println!("warning: {}", warning);
            }
            println!(
                "ok: {} θ samples, {} φ samples, {} warning(s)",
                job.vertical.len(),
                horizontal.len(),
                warnings.len()
            );
        }
        Commands::Config { example } => {
            if example {
                print!("{}", PatreconConfig::example_yaml());
            } else {
                print!("{}", serde_yaml::to_string(&config)?);
            }
        }
    }

    Ok(())
}
