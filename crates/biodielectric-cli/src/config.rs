//! TOML configuration deserialisation for sweep jobs.

use serde::Deserialize;

/// Top-level sweep job.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Frequency grid of the sweep.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// "Hz", "kHz", "MHz" or "GHz". Unknown units are read as GHz.
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_frequencies")]
    pub frequencies: FrequencySpec,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            frequencies: default_frequencies(),
        }
    }
}

fn default_unit() -> String {
    "GHz".into()
}

fn default_frequencies() -> FrequencySpec {
    FrequencySpec::Range {
        range: [0.5, 10.0],
        points: 20,
    }
}

/// Frequency specification: either a range or explicit list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

/// Correction applied to plasma and water targets.
#[derive(Debug, Deserialize)]
pub struct CalibrationConfig {
    /// "residual" (default) or "coefficient".
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

fn default_strategy() -> String {
    "residual".into()
}

/// A single medium or tissue to sweep.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetConfig {
    Medium {
        /// "plasma" or "water".
        medium: String,
        /// Glucose concentrations in mg/dL.
        #[serde(default = "default_compositions")]
        compositions: Vec<f64>,
    },
    Tissue {
        /// "skin", "fat", "muscle", "blood" or "bone".
        tissue: String,
        /// "cole-cole" (default) or "table".
        #[serde(default = "default_mode")]
        mode: String,
    },
}

fn default_compositions() -> Vec<f64> {
    vec![72.0, 216.0, 330.0, 600.0]
}

fn default_mode() -> String {
    "cole-cole".into()
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save each target as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save all results as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses() {
        let job: JobConfig = toml::from_str(
            r#"
            [sweep]
            unit = "MHz"
            frequencies = { range = [433.0, 1575.0], points = 5 }

            [calibration]
            strategy = "coefficient"

            [[target]]
            kind = "medium"
            medium = "plasma"
            compositions = [72.0, 150.0]

            [[target]]
            kind = "tissue"
            tissue = "skin"
            mode = "table"

            [output]
            directory = "./results"
            save_json = true
            "#,
        )
        .unwrap();

        assert_eq!(job.sweep.unit, "MHz");
        assert_eq!(
            job.sweep.frequencies,
            FrequencySpec::Range {
                range: [433.0, 1575.0],
                points: 5
            }
        );
        assert_eq!(job.calibration.strategy, "coefficient");
        assert_eq!(job.targets.len(), 2);
        assert_eq!(
            job.targets[0],
            TargetConfig::Medium {
                medium: "plasma".into(),
                compositions: vec![72.0, 150.0]
            }
        );
        assert_eq!(
            job.targets[1],
            TargetConfig::Tissue {
                tissue: "skin".into(),
                mode: "table".into()
            }
        );
        assert_eq!(job.output.directory, "./results");
        assert!(job.output.save_csv);
        assert!(job.output.save_json);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let job: JobConfig = toml::from_str(
            r#"
            [[target]]
            kind = "tissue"
            tissue = "muscle"

            [[target]]
            kind = "medium"
            medium = "water"
            "#,
        )
        .unwrap();

        assert_eq!(job.sweep.unit, "GHz");
        assert_eq!(job.sweep.frequencies, default_frequencies());
        assert_eq!(job.calibration.strategy, "residual");
        assert_eq!(
            job.targets[0],
            TargetConfig::Tissue {
                tissue: "muscle".into(),
                mode: "cole-cole".into()
            }
        );
        match &job.targets[1] {
            TargetConfig::Medium { compositions, .. } => {
                assert_eq!(compositions, &vec![72.0, 216.0, 330.0, 600.0])
            }
            other => panic!("expected medium target, got {:?}", other),
        }
        assert_eq!(job.output.directory, "./output");
    }

    #[test]
    fn test_explicit_frequency_list() {
        let job: JobConfig = toml::from_str(
            r#"
            [sweep]
            frequencies = { values = [0.433, 1.575, 2.45] }
            "#,
        )
        .unwrap();
        assert_eq!(
            job.sweep.frequencies,
            FrequencySpec::List {
                values: vec![0.433, 1.575, 2.45]
            }
        );
        assert!(job.targets.is_empty());
    }

    #[test]
    fn test_unknown_target_kind_rejected() {
        let result: Result<JobConfig, _> = toml::from_str(
            r#"
            [[target]]
            kind = "organ"
            tissue = "liver"
            "#,
        );
        assert!(result.is_err());
    }
}
