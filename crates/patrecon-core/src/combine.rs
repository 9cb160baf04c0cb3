//! Slice combination formulas
//!
//! Both formulas take the normalized vertical grid `V` and horizontal grid `H`
//! (dB, both ≤ 0) and produce a normalized 3D pattern of the same shape.
//!
//! ## Summing
//!
//! ```text
//! P = V + H
//! ```
//!
//! Adding in dB multiplies the linear gains. Accurate for pencil beams,
//! pessimistic away from the principal planes.
//!
//! ## Cross-Weighted
//!
//! ```text
//! v  = 10^(V/10)        h  = 10^(H/10)
//! w1 = v (1 - h)        w2 = h (1 - v)
//! P  = (H w1 + V w2) / cbrt(w1^k + w2^k)
//! ```
//!
//! Each slice is weighted by how strong the *other* slice is not, so the
//! locally stronger cut dominates. Where both slices sit at the peak
//! (`v = h = 1`) both weights vanish and the ratio is 0/0; the pattern is
//! defined as 0 dB there.

use crate::grid::Grid;
use crate::options::ReconstructionMethod;
use crate::types::{ReconError, ReconResult};

/// dB to linear power ratio.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Combine two normalized grids with the chosen method.
///
/// `k` is only used by [`ReconstructionMethod::CrossWeighted`].
pub fn combine(
    method: ReconstructionMethod,
    vertical: &Grid,
    horizontal: &Grid,
    k: f64,
) -> ReconResult<Grid> {
    let combined = match method {
        ReconstructionMethod::Summing => vertical.zip_map(horizontal, summing),
        ReconstructionMethod::CrossWeighted => {
            vertical.zip_map(horizontal, |v, h| cross_weighted(v, h, k))
        }
    };

    combined.ok_or(ReconError::GridShapeMismatch {
        vertical: vertical.shape(),
        horizontal: horizontal.shape(),
    })
}

/// Summing combination of one (V, H) cell.
#[inline]
pub fn summing(vert_db: f64, horiz_db: f64) -> f64 {
    vert_db + horiz_db
}

/// Cross-Weighted combination of one (V, H) cell.
#[inline]
pub fn cross_weighted(vert_db: f64, horiz_db: f64, k: f64) -> f64 {
    let v = db_to_linear(vert_db);
    let h = db_to_linear(horiz_db);
    let w1 = v * (1.0 - h);
    let w2 = h * (1.0 - v);

    if w1 == 0.0 && w2 == 0.0 {
        return 0.0;
    }

    (horiz_db * w1 + vert_db * w2) / (w1.powf(k) + w2.powf(k)).cbrt()
}
