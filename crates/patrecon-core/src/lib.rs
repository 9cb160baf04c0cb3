//! # 3D Antenna Pattern Reconstruction
//!
//! This crate reconstructs an approximate full-sphere antenna radiation
//! pattern from two orthogonal planar cuts through the main beam: a vertical
//! (elevation, θ) slice and a horizontal (azimuth, φ) slice.
//!
//! ## Overview
//!
//! Measuring a full 3D pattern is expensive; two principal-plane cuts are
//! cheap. Published heuristics combine the cuts into a 3D estimate:
//!
//! - **Summing**: add the normalized dB slices (multiply linear gains)
//! - **Cross-Weighted**: blend the slices with linear weights derived from
//!   each other, favouring the locally stronger cut
//!
//! ## Pipeline
//!
//! ```text
//! vertical (θ, dB) ─┐
//!                   ├─ validate → normalize → mesh → combine → denormalize → Pattern3D
//! horizontal (φ, dB)┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use patrecon_core::{reconstruct, ReconOptions, ReconstructionMethod, Slice};
//!
//! let vertical = Slice::new(
//!     vec![0.0, 45.0, 90.0, 135.0, 180.0],
//!     vec![-20.0, -6.0, 0.0, -6.0, -20.0],
//! );
//! let horizontal = Slice::new(
//!     vec![0.0, 90.0, 180.0, 270.0],
//!     vec![0.0, -10.0, -20.0, -10.0],
//! );
//!
//! let options = ReconOptions::builder()
//!     .method(ReconstructionMethod::Summing)
//!     .build();
//!
//! let result = reconstruct(&vertical, horizontal, &options).unwrap();
//! assert_eq!(result.pattern.gain_at(90.0, 0.0), Some(0.0));
//! assert!(result.warnings.is_empty());
//! ```

pub mod angles;
pub mod combine;
pub mod config;
pub mod grid;
pub mod mesh;
pub mod normalize;
pub mod observe;
pub mod options;
pub mod reconstruct;
pub mod types;
pub mod units;
pub mod validate;

// Re-export main types
pub use config::{ConfigError, PatreconConfig};
pub use grid::Grid;
pub use options::{ReconOptions, ReconstructionMethod, ToleranceConfig};
pub use reconstruct::{reconstruct, reconstruct_slices, Pattern3D, Reconstruction};
pub use types::{
    AngleSeries, GainSeries, HorizontalInput, ReconError, ReconResult, ReconWarning, Slice,
    SliceKind,
};
pub use units::GainUnit;
pub use validate::validate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::options::{ReconOptions, ReconstructionMethod, ToleranceConfig};
    pub use crate::reconstruct::{reconstruct, Pattern3D, Reconstruction};
    pub use crate::types::{HorizontalInput, ReconError, ReconResult, Slice};
    pub use crate::units::GainUnit;
}
