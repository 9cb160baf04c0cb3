//! Mesh preprocessing
//!
//! Expands two normalized slices into a pair of equally shaped grids over
//! (θ, φ). Only the θ half-plane `[0, 180]` (after wrapping into `[0, 360)`)
//! is physically distinct; the remaining θ samples describe the same points
//! of the sphere and are dropped. Every φ sample is kept.
//!
//! ```text
//!            φ0   φ1   φ2            φ0   φ1   φ2
//!   θ0  V = [v0   v0   v0 ]   H = [ h0   h1   h2 ]
//!   θ1      [v1   v1   v1 ]       [ h0   h1   h2 ]
//! ```

use crate::angles::wrap_deg;
use crate::grid::Grid;
use crate::types::{AngleSeries, Slice};

/// Largest wrapped θ that is kept, degrees
pub const THETA_HALF_PLANE_MAX_DEG: f64 = 180.0;

/// Output of [`preprocess`]: the two broadcast grids and their axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertical gains broadcast along φ, `|θ_out| × |φ_out|`
    pub vertical: Grid,
    /// Horizontal gains broadcast along θ, `|θ_out| × |φ_out|`
    pub horizontal: Grid,
    /// θ values of the grid rows (as given, not wrapped)
    pub theta_out: AngleSeries,
    /// φ values of the grid columns (as given, not wrapped)
    pub phi_out: AngleSeries,
}

/// Wrap every angle into `[0, 360)`.
pub fn wrap_angles(angles: &[f64]) -> Vec<f64> {
    angles.iter().map(|&a| wrap_deg(a)).collect()
}

/// Indices of θ samples in the half-plane `[0, 180]` after wrapping.
pub fn half_plane_indices(theta: &[f64]) -> Vec<usize> {
    wrap_angles(theta)
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t <= THETA_HALF_PLANE_MAX_DEG)
        .map(|(i, _)| i)
        .collect()
}

/// Outer-product expansion of the two slices.
///
/// Expects normalized slices with matching angle/gain lengths.
pub fn preprocess(vertical: &Slice, horizontal: &Slice) -> Mesh {
    let theta_in = vertical.len();
    let idx_theta = half_plane_indices(&vertical.angles);

    let theta_out: AngleSeries = idx_theta.iter().map(|&i| vertical.angles[i]).collect();
    let vert_gains: Vec<f64> = idx_theta.iter().map(|&i| vertical.gains[i]).collect();
    let phi_out = horizontal.angles.clone();
    let horiz_gains = &horizontal.gains;

    let rows = theta_out.len();
    let cols = phi_out.len();

    let vertical = Grid::from_fn(rows, cols, |r, _| vert_gains[r]);
    let horizontal = Grid::from_fn(rows, cols, |_, c| horiz_gains[c]);

    tracing::debug!(
        theta_in,
        theta_out = rows,
        phi_out = cols,
        "built reconstruction mesh"
    );

    Mesh {
        vertical,
        horizontal,
        theta_out,
        phi_out,
    }
}
