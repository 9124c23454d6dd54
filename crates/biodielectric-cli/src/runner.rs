//! Sweep runner: resolves config selectors, evaluates targets, writes results.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use biodielectric_core::sweep::{linear_grid, tissue_sweep};
use biodielectric_core::{
    medium_properties, CorrectionStrategy, FrequencyUnit, Medium, PropertyResult, Tissue,
    TissueMode,
};
use biodielectric_materials::constants::HZ_PER_GHZ;

use crate::config::{FrequencySpec, JobConfig, SweepConfig, TargetConfig};

/// A config target with its selectors resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Medium {
        medium: Medium,
        strategy: CorrectionStrategy,
        compositions: Vec<f64>,
    },
    Tissue {
        tissue: Tissue,
        mode: TissueMode,
    },
}

impl Target {
    /// File stem used for this target's CSV output.
    pub fn stem(&self) -> String {
        match self {
            Target::Medium {
                medium, strategy, ..
            } => format!("{}_{}", medium.key(), strategy.key()),
            Target::Tissue { tissue, mode } => format!("{}_{}", tissue.key(), mode.key()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Target::Medium {
                medium, strategy, ..
            } => format!("{} [{} correction]", medium.label(), strategy),
            Target::Tissue { tissue, mode } => format!("{} [{}]", tissue.label(), mode),
        }
    }
}

/// One evaluated sample.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SweepRow {
    pub frequency_hz: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_mgdl: Option<f64>,
    #[serde(flatten)]
    pub properties: PropertyResult,
}

/// All samples of one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutput {
    pub name: String,
    pub label: String,
    pub rows: Vec<SweepRow>,
}

/// Build the sweep frequency grid in Hz.
pub fn frequency_grid_hz(sweep: &SweepConfig) -> Vec<f64> {
    let unit = FrequencyUnit::parse_or_default(&sweep.unit);
    let values = match &sweep.frequencies {
        FrequencySpec::Range { range, points } => linear_grid(range[0], range[1], *points),
        FrequencySpec::List { values } => values.clone(),
    };
    values.into_iter().map(|f| unit.to_hz(f)).collect()
}

/// Parse every selector in the job, failing on the first unknown key.
pub fn resolve_targets(job: &JobConfig) -> Result<Vec<Target>> {
    if job.targets.is_empty() {
        anyhow::bail!("No [[target]] entries in configuration");
    }

    let strategy: CorrectionStrategy = job
        .calibration
        .strategy
        .parse()
        .context("Invalid [calibration] strategy")?;

    job.targets
        .iter()
        .enumerate()
        .map(|(i, target)| match target {
            TargetConfig::Medium {
                medium,
                compositions,
            } => {
                if compositions.is_empty() {
                    anyhow::bail!("Target {}: medium '{}' has no compositions", i + 1, medium);
                }
                Ok(Target::Medium {
                    medium: medium
                        .parse()
                        .with_context(|| format!("Target {}", i + 1))?,
                    strategy,
                    compositions: compositions.clone(),
                })
            }
            TargetConfig::Tissue { tissue, mode } => Ok(Target::Tissue {
                tissue: tissue
                    .parse()
                    .with_context(|| format!("Target {}", i + 1))?,
                mode: mode.parse().with_context(|| format!("Target {}", i + 1))?,
            }),
        })
        .collect()
}

/// Check a job end to end without evaluating it.
pub fn validate_job(job: &JobConfig) -> Result<()> {
    let grid = frequency_grid_hz(&job.sweep);
    if grid.is_empty() {
        anyhow::bail!("Frequency grid is empty");
    }
    if let Some(f) = grid.iter().find(|f| !(**f > 0.0)) {
        anyhow::bail!("Frequency grid contains a non-positive value ({} Hz)", f);
    }
    resolve_targets(job)?;
    Ok(())
}

/// Evaluate every target over the job's frequency grid.
pub fn run_sweep(job: &JobConfig) -> Result<Vec<TargetOutput>> {
    validate_job(job)?;
    let frequencies = frequency_grid_hz(&job.sweep);
    let targets = resolve_targets(job)?;
    println!(
        "Sweeping {} target(s) over {} frequencies ({:.4}–{:.4} GHz)",
        targets.len(),
        frequencies.len(),
        frequencies[0] / HZ_PER_GHZ,
        frequencies[frequencies.len() - 1] / HZ_PER_GHZ,
    );

    let mut outputs = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        let rows = evaluate_target(target, &frequencies)
            .with_context(|| format!("Target {} ({})", i + 1, target.label()))?;
        println!("  [{}/{}] {}: {} rows", i + 1, targets.len(), target.label(), rows.len());
        outputs.push(TargetOutput {
            name: format!("{:02}_{}", i + 1, target.stem()),
            label: target.label(),
            rows,
        });
    }

    info!("Sweep finished: {} target(s)", outputs.len());
    Ok(outputs)
}

fn evaluate_target(target: &Target, frequencies_hz: &[f64]) -> Result<Vec<SweepRow>> {
    match target {
        Target::Medium {
            medium,
            strategy,
            compositions,
        } => {
            let mut rows = Vec::with_capacity(compositions.len() * frequencies_hz.len());
            for &composition in compositions {
                debug!("{} at {} mg/dL", medium, composition);
                for &frequency_hz in frequencies_hz {
                    rows.push(SweepRow {
                        frequency_hz,
                        composition_mgdl: Some(composition),
                        properties: medium_properties(frequency_hz, *medium, *strategy, composition)?,
                    });
                }
            }
            Ok(rows)
        }
        Target::Tissue { tissue, mode } => Ok(tissue_sweep(*tissue, *mode, frequencies_hz)?
            .into_iter()
            .map(|p| SweepRow {
                frequency_hz: p.frequency_hz,
                composition_mgdl: None,
                properties: p.properties,
            })
            .collect()),
    }
}

/// Write one target's rows to a CSV file with a metadata header.
pub fn write_target_csv(output: &TargetOutput, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    writeln!(file, "# Biodielectric property sweep")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# target: {}", output.label)?;
    writeln!(file, "# sweep unit: {}", FrequencyUnit::parse_or_default(&job.sweep.unit))?;
    writeln!(file, "#")?;

    let has_composition = output.rows.iter().any(|r| r.composition_mgdl.is_some());
    if has_composition {
        writeln!(
            file,
            "frequency_ghz,composition_mgdl,epsilon_real,epsilon_imag,conductivity_s_per_m,loss_tangent"
        )?;
    } else {
        writeln!(
            file,
            "frequency_ghz,epsilon_real,epsilon_imag,conductivity_s_per_m,loss_tangent"
        )?;
    }

    for row in &output.rows {
        let p = &row.properties;
        match row.composition_mgdl {
            Some(c) if has_composition => writeln!(
                file,
                "{:.6},{:.2},{:.6},{:.6},{:.6},{:.6}",
                row.frequency_hz / HZ_PER_GHZ,
                c,
                p.epsilon_real,
                p.epsilon_imag,
                p.conductivity,
                p.loss_tangent
            )?,
            _ => writeln!(
                file,
                "{:.6},{:.6},{:.6},{:.6},{:.6}",
                row.frequency_hz / HZ_PER_GHZ,
                p.epsilon_real,
                p.epsilon_imag,
                p.conductivity,
                p.loss_tangent
            )?,
        }
    }

    println!("CSV written to: {}", path.display());
    Ok(())
}

/// Write every target's rows to a single JSON file.
pub fn write_results_json(outputs: &[TargetOutput], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(outputs)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("JSON written to: {}", path.display());
    Ok(())
}
