//! Reconstruction parameters
//!
//! [`ReconOptions`] bundles everything that steers a reconstruction apart
//! from the slices themselves: the combination method, the Cross-Weighted
//! exponent, the validation tolerances and the unit label of the gains.

use crate::types::{ReconError, ReconResult};
use crate::units::GainUnit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default Cross-Weighted normalization exponent
pub const DEFAULT_CROSS_WEIGHTED_K: f64 = 2.0;

/// Formula used to combine the two slice grids
///
/// Deserializes through [`FromStr`], so config files accept the same tokens
/// as job files (`CrossWeighted`, `cross_weighted`, `cross-weighted`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ReconstructionMethod {
    /// Sum of the dB grids (product of linear gains)
    #[default]
    Summing,
    /// Linear-domain cross-weighted blend of the two grids
    CrossWeighted,
}

impl ReconstructionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ReconstructionMethod::Summing => "Summing",
            ReconstructionMethod::CrossWeighted => "CrossWeighted",
        }
    }
}

impl fmt::Display for ReconstructionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReconstructionMethod {
    type Err = ReconError;

    fn from_str(s: &str) -> ReconResult<Self> {
        let token: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match token.as_str() {
            "summing" => Ok(ReconstructionMethod::Summing),
            "crossweighted" => Ok(ReconstructionMethod::CrossWeighted),
            _ => Err(ReconError::UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReconstructionMethod {
    type Error = ReconError;

    fn try_from(s: String) -> ReconResult<Self> {
        s.parse()
    }
}

/// Validation tolerances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Largest allowed distance from boresight to the nearest sample, degrees
    pub nearest_angle_from_boresight_deg: f64,
    /// Largest allowed excess of a slice maximum over its boresight gain, dB
    pub gain_max_vs_boresight_db: f64,
    /// Boresight disagreement between slices that triggers a warning, dB
    pub intersect_warn_db: f64,
    /// Boresight disagreement between slices that is rejected, dB
    pub intersect_error_db: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            nearest_angle_from_boresight_deg: 10.0,
            gain_max_vs_boresight_db: 3.0,
            intersect_warn_db: 1.0,
            intersect_error_db: 3.0,
        }
    }
}

impl ToleranceConfig {
    /// The (warn, error) threshold pair for cross-slice agreement.
    pub fn intersect_thresholds(&self) -> (f64, f64) {
        (self.intersect_warn_db, self.intersect_error_db)
    }

    pub fn with_intersect_thresholds(mut self, warn_db: f64, error_db: f64) -> Self {
        self.intersect_warn_db = warn_db;
        self.intersect_error_db = error_db;
        self
    }

    /// Reject negative or non-finite tolerances and a warn threshold above
    /// the error threshold.
    pub fn check(&self) -> ReconResult<()> {
        let fields = [
            ("nearest_angle_from_boresight_deg", self.nearest_angle_from_boresight_deg),
            ("gain_max_vs_boresight_db", self.gain_max_vs_boresight_db),
            ("intersect_warn_db", self.intersect_warn_db),
            ("intersect_error_db", self.intersect_error_db),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ReconError::InvalidParameter {
                    name,
                    reason: format!("must be a finite, non-negative value, got {}", value),
                });
            }
        }
        if self.intersect_warn_db > self.intersect_error_db {
            return Err(ReconError::InvalidParameter {
                name: "intersect_warn_db",
                reason: format!(
                    "warn threshold {} exceeds error threshold {}",
                    self.intersect_warn_db, self.intersect_error_db
                ),
            });
        }
        Ok(())
    }
}

/// Parameters of one reconstruction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconOptions {
    pub method: ReconstructionMethod,
    /// Exponent `k` of the Cross-Weighted denominator `cbrt(w1^k + w2^k)`
    pub cross_weighted_k: f64,
    pub tolerances: ToleranceConfig,
    /// Unit label carried to the output pattern
    pub unit: GainUnit,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            method: ReconstructionMethod::default(),
            cross_weighted_k: DEFAULT_CROSS_WEIGHTED_K,
            tolerances: ToleranceConfig::default(),
            unit: GainUnit::default(),
        }
    }
}

impl ReconOptions {
    /// Create a new builder for reconstruction options
    pub fn builder() -> ReconOptionsBuilder {
        ReconOptionsBuilder::default()
    }

    /// Check parameters that do not depend on the slices.
    pub fn check(&self) -> ReconResult<()> {
        if !self.cross_weighted_k.is_finite() {
            return Err(ReconError::InvalidParameter {
                name: "cross_weighted_k",
                reason: format!("must be finite, got {}", self.cross_weighted_k),
            });
        }
        self.tolerances.check()
    }
}

/// Builder for ReconOptions
#[derive(Default)]
pub struct ReconOptionsBuilder {
    options: ReconOptions,
}

impl ReconOptionsBuilder {
    pub fn method(mut self, method: ReconstructionMethod) -> Self {
        self.options.method = method;
        self
    }

    pub fn cross_weighted_k(mut self, k: f64) -> Self {
        self.options.cross_weighted_k = k;
        self
    }

    pub fn tolerances(mut self, tolerances: ToleranceConfig) -> Self {
        self.options.tolerances = tolerances;
        self
    }

    pub fn nearest_angle_from_boresight(mut self, deg: f64) -> Self {
        self.options.tolerances.nearest_angle_from_boresight_deg = deg;
        self
    }

    pub fn gain_max_vs_boresight(mut self, db: f64) -> Self {
        self.options.tolerances.gain_max_vs_boresight_db = db;
        self
    }

    pub fn intersect_thresholds(mut self, warn_db: f64, error_db: f64) -> Self {
        self.options.tolerances = self
            .options
            .tolerances
            .with_intersect_thresholds(warn_db, error_db);
        self
    }

    pub fn unit(mut self, unit: GainUnit) -> Self {
        self.options.unit = unit;
        self
    }

    pub fn build(self) -> ReconOptions {
        self.options
    }
}
