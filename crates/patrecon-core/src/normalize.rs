//! Normalization by the global peak
//!
//! Both slices are shifted by the largest gain found in either of them, so
//! the combination formulas work on values ≤ 0 dB (linear weights in
//! `(0, 1]`). The same offset is added back once the grids are combined.

use crate::grid::Grid;
use crate::types::Slice;

/// Slices shifted so the joint maximum is exactly 0 dB.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSlices {
    pub vertical: Slice,
    pub horizontal: Slice,
    /// Offset that was subtracted from every gain, dB
    pub max_directivity: f64,
}

/// Largest gain across both slices.
pub fn max_directivity(vertical: &Slice, horizontal: &Slice) -> f64 {
    vertical.max_gain().max(horizontal.max_gain())
}

/// Subtract the joint maximum from both slices.
pub fn normalize(vertical: &Slice, horizontal: &Slice) -> NormalizedSlices {
    let max_directivity = max_directivity(vertical, horizontal);
    NormalizedSlices {
        vertical: vertical.shifted(-max_directivity),
        horizontal: horizontal.shifted(-max_directivity),
        max_directivity,
    }
}

/// Restore absolute gain on a combined grid.
pub fn denormalize(pattern: &Grid, max_directivity: f64) -> Grid {
    pattern.map(|v| v + max_directivity)
}
