//! Core types for pattern reconstruction
//!
//! A measured antenna pattern enters the pipeline as two orthogonal *slices*:
//! planar cuts through the main beam.
//!
//! ```text
//!              z (θ = 0)
//!              ^
//!              |   vertical slice: gain(θ) in the x-z plane
//!              |
//!              +--------> x  boresight (θ = 90°, φ = 0°)
//!             /
//!            /   horizontal slice: gain(φ) in the x-y plane
//!           y
//! ```
//!
//! Each slice pairs an angle series (degrees) with a gain series (dB). The
//! horizontal cut can also be described by a single scalar gain when the
//! antenna is omnidirectional in azimuth.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Angles in degrees. Need not be sorted or uniformly spaced.
pub type AngleSeries = Vec<f64>;

/// Gain values in dB, paired positionally with an [`AngleSeries`].
pub type GainSeries = Vec<f64>;

/// Result type for reconstruction operations
pub type ReconResult<T> = Result<T, ReconError>;

/// Which of the two principal-plane cuts a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceKind {
    /// Elevation cut, indexed by θ
    Vertical,
    /// Azimuth cut, indexed by φ
    Horizontal,
}

impl SliceKind {
    /// Boresight angle of this cut in degrees.
    pub fn boresight_deg(&self) -> f64 {
        match self {
            SliceKind::Vertical => crate::angles::THETA_BORESIGHT_DEG,
            SliceKind::Horizontal => crate::angles::PHI_BORESIGHT_DEG,
        }
    }

    /// Short plane tag as used in error messages ("el"/"az").
    pub fn plane(&self) -> &'static str {
        match self {
            SliceKind::Vertical => "el",
            SliceKind::Horizontal => "az",
        }
    }
}

impl fmt::Display for SliceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceKind::Vertical => write!(f, "vertical"),
            SliceKind::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Errors that can occur while reconstructing a pattern
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconError {
    #[error("Dimensions of {slice} gains ({gains}) and angles ({angles}) do not match")]
    DimensionMismatch {
        slice: SliceKind,
        angles: usize,
        gains: usize,
    },

    #[error("The {0} slice contains no samples")]
    EmptySlice(SliceKind),

    #[error("Non-finite {what} at index {index} of the {slice} slice")]
    NonFiniteValue {
        slice: SliceKind,
        what: &'static str,
        index: usize,
    },

    #[error("Repeated angles with unequal values in {}: {angle_deg}", .slice.plane())]
    InconsistentDuplicateAngle { slice: SliceKind, angle_deg: f64 },

    #[error("No angles near boresight in {slice} slice (nearest {nearest_deg:.4}°, tolerance: {tolerance_deg}°)")]
    NoBoresightCoverage {
        slice: SliceKind,
        nearest_deg: f64,
        tolerance_deg: f64,
    },

    #[error("{slice} slice maximum exceeds its boresight gain by {excess_db:.3} dB (tolerance: {tolerance_db} dB)")]
    BoresightNotNearPeak {
        slice: SliceKind,
        excess_db: f64,
        tolerance_db: f64,
    },

    #[error("Gain difference at slice intersection is {difference_db:.3} dB (tolerance: {tolerance_db} dB)")]
    SliceIntersectionMismatch {
        difference_db: f64,
        tolerance_db: f64,
    },

    #[error("Vertical grid is {}x{} but horizontal grid is {}x{}", .vertical.0, .vertical.1, .horizontal.0, .horizontal.1)]
    GridShapeMismatch {
        vertical: (usize, usize),
        horizontal: (usize, usize),
    },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown gain unit: {0}. Expected dBi, dBd or dB")]
    UnknownGainUnit(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Non-fatal conditions raised during validation.
///
/// Warnings never abort a reconstruction; they are returned alongside the
/// result and also emitted as `tracing` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconWarning {
    /// The two slices disagree at boresight by more than the soft threshold.
    SliceIntersectionDivergence { difference_db: f64, warn_db: f64 },
}

impl fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconWarning::SliceIntersectionDivergence {
                difference_db,
                warn_db,
            } => write!(
                f,
                "Gain difference at slice intersection is significant: {:.3} dB (warn above {} dB)",
                difference_db, warn_db
            ),
        }
    }
}

/// One orthogonal pattern cut: angles (degrees) paired with gains (dB).
///
/// Construction does not check lengths; mismatches are reported by the
/// validator so that the error names the offending slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub angles: AngleSeries,
    pub gains: GainSeries,
}

impl Slice {
    pub fn new(angles: impl Into<AngleSeries>, gains: impl Into<GainSeries>) -> Self {
        Self {
            angles: angles.into(),
            gains: gains.into(),
        }
    }

    /// Constant gain over the given angles (azimuthal omnidirectionality).
    pub fn constant(angles: impl Into<AngleSeries>, gain: f64) -> Self {
        let angles = angles.into();
        let gains = vec![gain; angles.len()];
        Self { angles, gains }
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Largest gain value, `NEG_INFINITY` for an empty slice.
    pub fn max_gain(&self) -> f64 {
        self.gains.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Copy of this slice with `offset` added to every gain.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            angles: self.angles.clone(),
            gains: self.gains.iter().map(|g| g + offset).collect(),
        }
    }
}

/// How the horizontal cut is supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum HorizontalInput {
    /// A measured azimuth cut.
    Sampled(Slice),
    /// Omnidirectional in azimuth at a fixed gain.
    ///
    /// Materialized over `phi`, or the default φ grid when `None`.
    Omni { gain: f64, phi: Option<AngleSeries> },
    /// No horizontal information: omnidirectional at the vertical peak gain.
    Absent { phi: Option<AngleSeries> },
}

impl HorizontalInput {
    /// Turn the input into a concrete slice.
    ///
    /// `vertical_peak` is used for [`HorizontalInput::Absent`].
    pub fn materialize(self, vertical_peak: f64) -> Slice {
        match self {
            HorizontalInput::Sampled(slice) => slice,
            HorizontalInput::Omni { gain, phi } => {
                Slice::constant(phi.unwrap_or_else(crate::angles::default_phi_grid), gain)
            }
            HorizontalInput::Absent { phi } => Slice::constant(
                phi.unwrap_or_else(crate::angles::default_phi_grid),
                vertical_peak,
            ),
        }
    }
}

impl From<Slice> for HorizontalInput {
    fn from(slice: Slice) -> Self {
        HorizontalInput::Sampled(slice)
    }
}
