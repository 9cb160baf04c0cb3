//! Reconstruction pipeline
//!
//! ```text
//! slices → validate → normalize → mesh → combine → denormalize → Pattern3D
//! ```
//!
//! Every stage is a pure function over immutable inputs; nothing is kept
//! between calls, so a reconstruction can run from any number of threads.

use crate::angles::nearest_index;
use crate::combine::combine;
use crate::grid::Grid;
use crate::mesh::preprocess;
use crate::normalize::{denormalize, normalize};
use crate::options::{ReconOptions, ReconstructionMethod};
use crate::types::{AngleSeries, HorizontalInput, ReconResult, ReconWarning, Slice};
use crate::units::GainUnit;
use crate::validate::validate;
use serde::{Deserialize, Serialize};

/// A reconstructed 3D pattern on the (θ_out × φ_out) grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern3D {
    /// Gain per (θ, φ), rows along `theta`, columns along `phi`
    pub gain: Grid,
    /// θ of each row, degrees
    pub theta: AngleSeries,
    /// φ of each column, degrees
    pub phi: AngleSeries,
    pub unit: GainUnit,
}

impl Pattern3D {
    /// Gain at the grid point nearest to (θ, φ).
    ///
    /// Picks the closest stored sample on each axis; no interpolation.
    pub fn gain_at(&self, theta_deg: f64, phi_deg: f64) -> Option<f64> {
        let (row, _) = nearest_index(&self.theta, theta_deg)?;
        let (col, _) = nearest_index(&self.phi, phi_deg)?;
        self.gain.get(row, col)
    }

    /// Peak gain and the (θ, φ) where it occurs.
    pub fn peak(&self) -> Option<(f64, f64, f64)> {
        self.gain
            .max()
            .map(|(g, r, c)| (g, self.theta[r], self.phi[c]))
    }
}

/// Result of a successful reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub pattern: Pattern3D,
    /// Joint peak of the input slices that was removed and restored, dB
    pub max_directivity: f64,
    pub method: ReconstructionMethod,
    /// Non-fatal validation findings
    pub warnings: Vec<ReconWarning>,
}

/// Reconstruct a 3D pattern from a vertical and a horizontal slice.
///
/// The horizontal slice may be measured, a scalar (omnidirectional) or
/// absent, see [`HorizontalInput`].
pub fn reconstruct(
    vertical: &Slice,
    horizontal: impl Into<HorizontalInput>,
    options: &ReconOptions,
) -> ReconResult<Reconstruction> {
    options.check()?;

    let horizontal = horizontal.into().materialize(vertical.max_gain());

    let warnings = validate(vertical, &horizontal, &options.tolerances)?;

    let normalized = normalize(vertical, &horizontal);
    let mesh = preprocess(&normalized.vertical, &normalized.horizontal);
    let combined = combine(
        options.method,
        &mesh.vertical,
        &mesh.horizontal,
        options.cross_weighted_k,
    )?;
    let gain = denormalize(&combined, normalized.max_directivity);

    tracing::debug!(
        method = %options.method,
        max_directivity = normalized.max_directivity,
        rows = gain.rows(),
        cols = gain.cols(),
        warnings = warnings.len(),
        "reconstructed 3D pattern"
    );

    Ok(Reconstruction {
        pattern: Pattern3D {
            gain,
            theta: mesh.theta_out,
            phi: mesh.phi_out,
            unit: options.unit,
        },
        max_directivity: normalized.max_directivity,
        method: options.method,
        warnings,
    })
}

/// Reconstruct from raw arrays.
///
/// `horizontal_gain` of `None` means omnidirectional at the vertical peak;
/// `phi` of `None` selects the default 0..=360° grid in 5° steps. A
/// horizontal gain of length one is treated as a scalar (omnidirectional)
/// level unless `phi` also has exactly one element.
pub fn reconstruct_slices(
    vertical_gain: &[f64],
    theta: &[f64],
    horizontal_gain: Option<&[f64]>,
    phi: Option<&[f64]>,
    options: &ReconOptions,
) -> ReconResult<Reconstruction> {
    let vertical = Slice::new(theta.to_vec(), vertical_gain.to_vec());
    let phi = phi.map(<[f64]>::to_vec);

    let horizontal = match (horizontal_gain, phi) {
        (None, phi) => HorizontalInput::Absent { phi },
        (Some([gain]), phi) if phi.as_ref().map_or(true, |p| p.len() != 1) => {
            HorizontalInput::Omni { gain: *gain, phi }
        }
        (Some(gains), Some(phi)) => HorizontalInput::Sampled(Slice::new(phi, gains.to_vec())),
        (Some(gains), None) => HorizontalInput::Sampled(Slice::new(
            crate::angles::default_phi_grid(),
            gains.to_vec(),
        )),
    };

    reconstruct(&vertical, horizontal, options)
}
