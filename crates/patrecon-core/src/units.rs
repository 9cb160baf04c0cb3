//! Gain units reported alongside pattern slices
//!
//! Pattern files report gain either against an isotropic radiator (dBi), a
//! half-wave dipole (dBd), or as a bare relative level (dB). Reconstruction
//! treats all of them as plain dB numbers; the unit only labels the output.

use crate::types::{ReconError, ReconResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gain of a lossless half-wave dipole over an isotropic radiator, in dB
pub const DIPOLE_GAIN_DBI: f64 = 2.15;

/// Unit a gain series is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GainUnit {
    /// Decibels relative to an isotropic radiator
    #[default]
    #[serde(rename = "dBi")]
    Dbi,
    /// Decibels relative to a half-wave dipole
    #[serde(rename = "dBd")]
    Dbd,
    /// Relative decibels with no absolute reference
    #[serde(rename = "dB")]
    Db,
}

impl GainUnit {
    /// Offset to add to a value in this unit to express it in dBi.
    ///
    /// `None` for relative dB, which has no absolute reference.
    pub fn offset_to_dbi(&self) -> Option<f64> {
        match self {
            GainUnit::Dbi => Some(0.0),
            GainUnit::Dbd => Some(DIPOLE_GAIN_DBI),
            GainUnit::Db => None,
        }
    }

    /// Copy of `gains` expressed in dBi, `None` for relative dB.
    pub fn to_dbi(&self, gains: &[f64]) -> Option<Vec<f64>> {
        self.offset_to_dbi()
            .map(|offset| gains.iter().map(|g| g + offset).collect())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GainUnit::Dbi => "dBi",
            GainUnit::Dbd => "dBd",
            GainUnit::Db => "dB",
        }
    }
}

impl fmt::Display for GainUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GainUnit {
    type Err = ReconError;

    fn from_str(s: &str) -> ReconResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dbi" => Ok(GainUnit::Dbi),
            "dbd" => Ok(GainUnit::Dbd),
            "db" => Ok(GainUnit::Db),
            _ => Err(ReconError::UnknownGainUnit(s.to_string())),
        }
    }
}
