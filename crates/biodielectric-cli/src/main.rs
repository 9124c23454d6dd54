//! Biodielectric command-line interface.
//!
//! Evaluate single operating points or run sweeps from TOML configuration files:
//! ```sh
//! biodielectric compute medium plasma --composition 72 --frequency 0.5
//! biodielectric compute tissue skin --frequency 1575 --unit MHz --mode table
//! biodielectric curves plasma --composition 100
//! biodielectric sweep job.toml
//! biodielectric validate job.toml
//! biodielectric media
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use biodielectric_core::sweep::{comparison_curves, default_frequency_grid_ghz};
use biodielectric_core::{
    medium_properties, tissue_properties, CorrectionStrategy, FrequencyUnit, Medium,
    PropertyResult, Tissue, TissueMode,
};

#[derive(Parser)]
#[command(name = "biodielectric")]
#[command(about = "Dielectric properties of biological media and glucose-loaded solutions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a medium or tissue at a single frequency.
    Compute {
        #[command(subcommand)]
        target: ComputeTarget,
        /// Print the result as JSON.
        #[arg(long, global = true)]
        json: bool,
    },
    /// Print comparison curves for a medium as JSON.
    Curves {
        /// Medium key: plasma or water.
        medium: String,
        /// Glucose concentration (mg/dL) to highlight.
        #[arg(short, long)]
        composition: f64,
        /// Correction strategy: residual or coefficient.
        #[arg(short, long, default_value = "residual")]
        strategy: String,
    },
    /// Run a sweep from a TOML configuration file.
    Sweep {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the sweep.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display information about available media, tissues and modes.
    Media,
}

#[derive(Subcommand)]
enum ComputeTarget {
    /// Glucose-loaded blood plasma or de-ionized water.
    Medium {
        /// Medium key: plasma or water.
        medium: String,
        /// Glucose concentration (mg/dL).
        #[arg(short, long)]
        composition: f64,
        /// Frequency value, in --unit.
        #[arg(short, long)]
        frequency: f64,
        /// Frequency unit (Hz, kHz, MHz, GHz). Unknown units are read as GHz.
        #[arg(short, long, default_value = "GHz")]
        unit: String,
        /// Correction strategy: residual or coefficient.
        #[arg(short, long, default_value = "residual")]
        strategy: String,
    },
    /// Biological tissue.
    Tissue {
        /// Tissue key: skin, fat, muscle, blood or bone.
        tissue: String,
        /// Frequency value, in --unit.
        #[arg(short, long)]
        frequency: f64,
        /// Frequency unit (Hz, kHz, MHz, GHz). Unknown units are read as GHz.
        #[arg(short, long, default_value = "GHz")]
        unit: String,
        /// Evaluation mode: cole-cole or table.
        #[arg(short, long, default_value = "cole-cole")]
        mode: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compute { target, json } => {
            let (heading, frequency_hz, result) = match target {
                ComputeTarget::Medium {
                    medium,
                    composition,
                    frequency,
                    unit,
                    strategy,
                } => {
                    let medium: Medium = medium.parse()?;
                    let strategy: CorrectionStrategy = strategy.parse()?;
                    let frequency_hz = FrequencyUnit::parse_or_default(&unit).to_hz(frequency);
                    let result = medium_properties(frequency_hz, medium, strategy, composition)?;
                    let heading = format!(
                        "{}, {} mg/dL, {} correction",
                        medium.label(),
                        composition,
                        strategy
                    );
                    (heading, frequency_hz, result)
                }
                ComputeTarget::Tissue {
                    tissue,
                    frequency,
                    unit,
                    mode,
                } => {
                    let tissue: Tissue = tissue.parse()?;
                    let mode: TissueMode = mode.parse()?;
                    let frequency_hz = FrequencyUnit::parse_or_default(&unit).to_hz(frequency);
                    let result = tissue_properties(frequency_hz, tissue, mode)?;
                    (format!("{} ({})", tissue.label(), mode), frequency_hz, result)
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&heading, frequency_hz, &result);
            }
            Ok(())
        }
        Commands::Curves {
            medium,
            composition,
            strategy,
        } => {
            let medium: Medium = medium.parse()?;
            let strategy: CorrectionStrategy = strategy.parse()?;
            let curves =
                comparison_curves(medium, strategy, composition, &default_frequency_grid_ghz())?;
            println!("{}", serde_json::to_string_pretty(&curves)?);
            Ok(())
        }
        Commands::Sweep { config, output } => {
            println!("Biodielectric Sweep");
            println!("===================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let outputs = runner::run_sweep(&job)?;

            // Determine output directory
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                for target in &outputs {
                    let csv_path = out_dir.join(format!("{}.csv", target.name));
                    runner::write_target_csv(target, &csv_path, &job)?;
                }
            }

            if job.output.save_json {
                runner::write_results_json(&outputs, &out_dir.join("sweep.json"))?;
            }

            println!("Sweep complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate_job(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Media => {
            println!("Glucose-loaded media (compute medium <key>):");
            for medium in Medium::ALL {
                println!("  {:<8} {}", medium.key(), medium.label());
            }
            println!();
            println!("Tissues (compute tissue <key>):");
            for tissue in Tissue::ALL {
                println!("  {:<8} {}", tissue.key(), tissue.label());
            }
            println!();
            println!("Tissue modes: {}", join_keys(TissueMode::ALL.iter().map(|m| m.key())));
            println!(
                "Correction strategies: {} (default {})",
                join_keys(CorrectionStrategy::ALL.iter().map(|s| s.key())),
                CorrectionStrategy::default()
            );
            println!(
                "Frequency units: {}",
                join_keys(FrequencyUnit::ALL.iter().map(|u| u.symbol()))
            );
            Ok(())
        }
    }
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.collect::<Vec<_>>().join(", ")
}

/// Undefined values print as N/A.
fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        "N/A".into()
    }
}

fn print_result(heading: &str, frequency_hz: f64, result: &PropertyResult) {
    println!("{} at {} Hz", heading, frequency_hz);
    println!("  ε'            = {}", format_value(result.epsilon_real));
    println!("  ε''           = {}", format_value(result.epsilon_imag));
    println!("  σ (S/m)       = {}", format_value(result.conductivity));
    println!("  tan δ         = {}", format_value(result.loss_tangent));
}
