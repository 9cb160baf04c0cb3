//! Job files
//!
//! A job file describes one reconstruction: the two slices as produced by a
//! pattern-file reader, the unit they were reported in, and optional
//! per-job overrides of the configured method.
//!
//! ```yaml
//! unit: dBi
//! method: CrossWeighted
//! vertical:
//!   angles: [0, 45, 90, 135, 180]
//!   gains: [-20, -6, 0, -6, -20]
//! horizontal:
//!   angles: [0, 90, 180, 270]
//!   gains: [0, -10, -20, -10]
//! ```
//!
//! `horizontal` may also be a single number (omnidirectional in azimuth) or
//! left out entirely; `phi` then sets the azimuth grid. A sampled cut carries
//! its own angles, so `phi` next to it is rejected.

use anyhow::{bail, Context, Result};
use patrecon_core::{GainUnit, HorizontalInput, ReconOptions, ReconstructionMethod, Slice};
use serde::Deserialize;
use std::path::Path;

/// Horizontal cut as written in a job file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HorizontalSpec {
    /// Omnidirectional at this gain
    Scalar(f64),
    /// Sampled azimuth cut
    Sampled(Slice),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    pub vertical: Slice,
    #[serde(default)]
    pub horizontal: Option<HorizontalSpec>,
    /// Azimuth grid for scalar or missing horizontal cuts
    #[serde(default)]
    pub phi: Option<Vec<f64>>,
    /// Gain unit as reported by the pattern file
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub cross_weighted_k: Option<f64>,
}

impl Job {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid job file {}", path.display()))
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let job: Job = serde_yaml::from_str(yaml)?;
        if matches!(job.horizontal, Some(HorizontalSpec::Sampled(_))) && job.phi.is_some() {
            bail!("`phi` only applies to a scalar or missing horizontal cut");
        }
        Ok(job)
    }

    pub fn horizontal_input(&self) -> HorizontalInput {
        match &self.horizontal {
            Some(HorizontalSpec::Sampled(slice)) => HorizontalInput::Sampled(slice.clone()),
            Some(HorizontalSpec::Scalar(gain)) => HorizontalInput::Omni {
                gain: *gain,
                phi: self.phi.clone(),
            },
            None => HorizontalInput::Absent {
                phi: self.phi.clone(),
            },
        }
    }

    /// Layer the job's overrides on top of configured options.
    pub fn apply_overrides(&self, mut options: ReconOptions) -> Result<ReconOptions> {
        if let Some(unit) = &self.unit {
            options.unit = unit.parse::<GainUnit>()?;
        }
        if let Some(method) = &self.method {
            options.method = method.parse::<ReconstructionMethod>()?;
        }
        if let Some(k) = self.cross_weighted_k {
            options.cross_weighted_k = k;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLED: &str = r#"
unit: dBd
method: cross_weighted
vertical:
  angles: [0, 45, 90, 135, 180]
  gains: [-20, -6, 0, -6, -20]
horizontal:
  angles: [0, 90, 180, 270]
  gains: [0, -10, -20, -10]
"#;

    #[test]
    fn test_parse_sampled_job() {
        let job = Job::parse(SAMPLED).unwrap();
        assert_eq!(job.vertical.len(), 5);
        assert!(matches!(
            job.horizontal_input(),
            HorizontalInput::Sampled(ref s) if s.len() == 4
        ));

        let opts = job.apply_overrides(ReconOptions::default()).unwrap();
        assert_eq!(opts.method, ReconstructionMethod::CrossWeighted);
        assert_eq!(opts.unit, GainUnit::Dbd);
    }

    #[test]
    fn test_parse_scalar_horizontal() {
        let yaml = r#"
vertical: { angles: [0, 90, 180], gains: [-10, 3, -10] }
horizontal: 3.0
phi: [0, 120, 240]
"#;
        let job = Job::parse(yaml).unwrap();
        assert_eq!(
            job.horizontal_input(),
            HorizontalInput::Omni {
                gain: 3.0,
                phi: Some(vec![0.0, 120.0, 240.0])
            }
        );
    }

    #[test]
    fn test_missing_horizontal() {
        let job = Job::parse("vertical: { angles: [90], gains: [0] }").unwrap();
        assert_eq!(job.horizontal_input(), HorizontalInput::Absent { phi: None });
    }

    #[test]
    fn test_bad_overrides() {
        let job = Job::parse("vertical: { angles: [90], gains: [0] }\nmethod: Stacking").unwrap();
        let err = job.apply_overrides(ReconOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown method: Stacking"));

        let job = Job::parse("vertical: { angles: [90], gains: [0] }\nunit: dBm").unwrap();
        assert!(job.apply_overrides(ReconOptions::default()).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, SAMPLED).unwrap();
        let job = Job::load(&path).unwrap();
        assert_eq!(job.unit.as_deref(), Some("dBd"));

        let err = Job::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read job file"));
    }

    #[test]
    fn test_phi_with_sampled_horizontal_is_rejected() {
        let yaml = format!("{}phi: [0, 90, 180, 270]\n", SAMPLED);
        let err = Job::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("`phi` only applies"));
    }
}
