//! Input validation
//!
//! The reconstruction heuristics only make sense for two cuts through the
//! same main beam. Before any math runs, the slices are checked in a fixed
//! order and the first failing check aborts:
//!
//! 1. angle/gain series lengths agree
//! 2. slices are non-empty and finite
//! 3. repeated (rounded) angles carry identical gains
//! 4. each slice has a sample near boresight
//! 5. each slice peaks near its boresight sample
//! 6. both slices agree at the shared boresight point
//!
//! The last check has a soft threshold that only produces a
//! [`ReconWarning`]. Validation does not depend on the combination method.

use crate::angles::{nearest_index, round_half_even};
use crate::options::ToleranceConfig;
use crate::types::{ReconError, ReconResult, ReconWarning, Slice, SliceKind};
use std::collections::BTreeMap;

/// Gains of both slices at their sample nearest boresight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoresightGains {
    pub vertical_db: f64,
    pub horizontal_db: f64,
}

impl BoresightGains {
    pub fn difference_db(&self) -> f64 {
        (self.vertical_db - self.horizontal_db).abs()
    }
}

/// Run every check on a pair of slices.
///
/// Returns the non-fatal warnings raised along the way.
pub fn validate(
    vertical: &Slice,
    horizontal: &Slice,
    tolerances: &ToleranceConfig,
) -> ReconResult<Vec<ReconWarning>> {
    check_dimensions(vertical, SliceKind::Vertical)?;
    check_dimensions(horizontal, SliceKind::Horizontal)?;

    check_finite(vertical, SliceKind::Vertical)?;
    check_finite(horizontal, SliceKind::Horizontal)?;

    check_repeated_points(vertical, SliceKind::Vertical)?;
    check_repeated_points(horizontal, SliceKind::Horizontal)?;

    let tol_angle = tolerances.nearest_angle_from_boresight_deg;
    let v_idx = check_boresight_coverage(vertical, SliceKind::Vertical, tol_angle)?;
    let h_idx = check_boresight_coverage(horizontal, SliceKind::Horizontal, tol_angle)?;

    let tol_gain = tolerances.gain_max_vs_boresight_db;
    check_peak_near_boresight(vertical, SliceKind::Vertical, v_idx, tol_gain)?;
    check_peak_near_boresight(horizontal, SliceKind::Horizontal, h_idx, tol_gain)?;

    let gains = BoresightGains {
        vertical_db: vertical.gains[v_idx],
        horizontal_db: horizontal.gains[h_idx],
    };
    let warnings = check_slice_intersection(&gains, tolerances)?
        .into_iter()
        .collect();

    Ok(warnings)
}

/// Angle and gain series of a slice must have the same length.
pub fn check_dimensions(slice: &Slice, kind: SliceKind) -> ReconResult<()> {
    if slice.angles.len() != slice.gains.len() {
        return Err(ReconError::DimensionMismatch {
            slice: kind,
            angles: slice.angles.len(),
            gains: slice.gains.len(),
        });
    }
    Ok(())
}

/// Slices must have at least one sample and contain only finite numbers.
pub fn check_finite(slice: &Slice, kind: SliceKind) -> ReconResult<()> {
    if slice.is_empty() {
        return Err(ReconError::EmptySlice(kind));
    }
    for (what, values) in [("angle", &slice.angles), ("gain", &slice.gains)] {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ReconError::NonFiniteValue {
                slice: kind,
                what,
                index,
            });
        }
    }
    Ok(())
}

/// Samples whose angles round to the same whole degree must agree in gain.
///
/// Halves round to the even degree, so 10.0 and 10.5 share a group.
/// Reports the smallest offending rounded angle.
pub fn check_repeated_points(slice: &Slice, kind: SliceKind) -> ReconResult<()> {
    // Rounded angles are finite integers here, so i64 keys are exact.
    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for (&angle, &gain) in slice.angles.iter().zip(&slice.gains) {
        groups.entry(round_half_even(angle) as i64).or_default().push(gain);
    }

    for (angle, gains) in &groups {
        let first = gains[0];
        if gains.iter().any(|&g| g != first) {
            return Err(ReconError::InconsistentDuplicateAngle {
                slice: kind,
                angle_deg: *angle as f64,
            });
        }
    }
    Ok(())
}

/// The slice must have a sample within `tolerance_deg` of its boresight.
///
/// Returns the index of the nearest sample.
pub fn check_boresight_coverage(
    slice: &Slice,
    kind: SliceKind,
    tolerance_deg: f64,
) -> ReconResult<usize> {
    let (idx, nearest_deg) =
        nearest_index(&slice.angles, kind.boresight_deg()).ok_or(ReconError::EmptySlice(kind))?;

    if nearest_deg > tolerance_deg {
        return Err(ReconError::NoBoresightCoverage {
            slice: kind,
            nearest_deg,
            tolerance_deg,
        });
    }
    Ok(idx)
}

/// The slice maximum may exceed the gain at the boresight sample by at most
/// `tolerance_db`.
pub fn check_peak_near_boresight(
    slice: &Slice,
    kind: SliceKind,
    boresight_idx: usize,
    tolerance_db: f64,
) -> ReconResult<()> {
    let excess_db = slice.max_gain() - slice.gains[boresight_idx];
    if excess_db > tolerance_db {
        return Err(ReconError::BoresightNotNearPeak {
            slice: kind,
            excess_db,
            tolerance_db,
        });
    }
    Ok(())
}

/// Compare the two slices where they intersect.
///
/// Fails above the error threshold, warns above the warn threshold.
pub fn check_slice_intersection(
    gains: &BoresightGains,
    tolerances: &ToleranceConfig,
) -> ReconResult<Option<ReconWarning>> {
    let (warn_db, error_db) = tolerances.intersect_thresholds();
    let difference_db = gains.difference_db();

    if difference_db > error_db {
        return Err(ReconError::SliceIntersectionMismatch {
            difference_db,
            tolerance_db: error_db,
        });
    }

    if difference_db > warn_db {
        let warning = ReconWarning::SliceIntersectionDivergence {
            difference_db,
            warn_db,
        };
        tracing::warn!(
            difference_db,
            warn_db,
            error_db,
            "{}",
            warning
        );
        return Ok(Some(warning));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertical() -> Slice {
        Slice::new(
            vec![0.0, 45.0, 90.0, 135.0, 180.0],
            vec![-20.0, -6.0, 0.0, -6.0, -20.0],
        )
    }

    fn horizontal() -> Slice {
        Slice::new(vec![0.0, 90.0, 180.0, 270.0], vec![0.0, -10.0, -20.0, -10.0])
    }

    #[test]
    fn test_valid_pair_has_no_warnings() {
        let warnings = validate(&vertical(), &horizontal(), &ToleranceConfig::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let v = Slice::new(vec![0.0, 90.0], vec![0.0]);
        let err = validate(&v, &horizontal(), &ToleranceConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ReconError::DimensionMismatch {
                slice: SliceKind::Vertical,
                angles: 2,
                gains: 1
            }
        );

        let h = Slice::new(vec![0.0, 90.0, 180.0], vec![0.0, -1.0]);
        let err = validate(&vertical(), &h, &ToleranceConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ReconError::DimensionMismatch {
                slice: SliceKind::Horizontal,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_and_non_finite() {
        let empty = Slice::new(Vec::new(), Vec::new());
        assert_eq!(
            check_finite(&empty, SliceKind::Vertical),
            Err(ReconError::EmptySlice(SliceKind::Vertical))
        );

        let nan = Slice::new(vec![0.0, 90.0], vec![0.0, f64::NAN]);
        assert_eq!(
            check_finite(&nan, SliceKind::Horizontal),
            Err(ReconError::NonFiniteValue {
                slice: SliceKind::Horizontal,
                what: "gain",
                index: 1
            })
        );
    }

    #[test]
    fn test_repeated_angles_with_different_gains() {
        let s = Slice::new(vec![10.0, 10.4, 90.0], vec![-1.0, -2.0, 0.0]);
        assert_eq!(
            check_repeated_points(&s, SliceKind::Vertical),
            Err(ReconError::InconsistentDuplicateAngle {
                slice: SliceKind::Vertical,
                angle_deg: 10.0
            })
        );
    }

    #[test]
    fn test_repeated_angles_with_equal_gains() {
        let s = Slice::new(vec![10.0, 10.4, 90.0], vec![-1.0, -1.0, 0.0]);
        assert!(check_repeated_points(&s, SliceKind::Vertical).is_ok());
    }

    #[test]
    fn test_repeated_angle_reports_smallest() {
        let s = Slice::new(
            vec![200.0, 199.6, 30.0, 30.2],
            vec![0.0, 1.0, 0.0, 1.0],
        );
        let err = check_repeated_points(&s, SliceKind::Horizontal).unwrap_err();
        assert_eq!(
            err,
            ReconError::InconsistentDuplicateAngle {
                slice: SliceKind::Horizontal,
                angle_deg: 30.0
            }
        );
    }

    #[test]
    fn test_coverage_boundary() {
        let on_boundary = Slice::new(vec![0.0, 80.0, 180.0], vec![-10.0, 0.0, -10.0]);
        assert_eq!(
            check_boresight_coverage(&on_boundary, SliceKind::Vertical, 10.0),
            Ok(1)
        );

        let beyond = Slice::new(vec![0.0, 100.0001, 180.0], vec![-10.0, 0.0, -10.0]);
        let err = check_boresight_coverage(&beyond, SliceKind::Vertical, 10.0).unwrap_err();
        match err {
            ReconError::NoBoresightCoverage {
                slice,
                nearest_deg,
                tolerance_deg,
            } => {
                assert_eq!(slice, SliceKind::Vertical);
                assert_relative_eq!(nearest_deg, 10.0001, epsilon = 1e-9);
                assert_eq!(tolerance_deg, 10.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_horizontal_coverage_wraps() {
        // 355° is 5° from boresight at φ = 0
        let h = Slice::new(vec![90.0, 180.0, 270.0, 355.0], vec![-10.0, -20.0, -10.0, 0.0]);
        assert_eq!(
            check_boresight_coverage(&h, SliceKind::Horizontal, 10.0),
            Ok(3)
        );

        let far = Slice::new(vec![90.0, 180.0, 270.0], vec![0.0, 0.0, 0.0]);
        assert!(matches!(
            check_boresight_coverage(&far, SliceKind::Horizontal, 10.0),
            Err(ReconError::NoBoresightCoverage {
                slice: SliceKind::Horizontal,
                ..
            })
        ));
    }

    #[test]
    fn test_peak_away_from_boresight() {
        // Peak at θ = 45° is 5 dB above boresight
        let v = Slice::new(vec![0.0, 45.0, 90.0, 135.0], vec![-20.0, 5.0, 0.0, -6.0]);
        let err = validate(&v, &horizontal(), &ToleranceConfig::default()).unwrap_err();
        match err {
            ReconError::BoresightNotNearPeak {
                slice, excess_db, ..
            } => {
                assert_eq!(slice, SliceKind::Vertical);
                assert_relative_eq!(excess_db, 5.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_intersection_warning() {
        let h = Slice::new(vec![0.0, 90.0, 180.0, 270.0], vec![-2.0, -10.0, -20.0, -10.0]);
        let warnings = validate(&vertical(), &h, &ToleranceConfig::default()).unwrap();
        assert_eq!(
            warnings,
            vec![ReconWarning::SliceIntersectionDivergence {
                difference_db: 2.0,
                warn_db: 1.0
            }]
        );
    }

    #[test]
    fn test_intersection_mismatch() {
        let gains = BoresightGains {
            vertical_db: 5.0,
            horizontal_db: 1.5,
        };
        let err = check_slice_intersection(&gains, &ToleranceConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ReconError::SliceIntersectionMismatch { tolerance_db, .. } if tolerance_db == 3.0
        ));
    }

    #[test]
    fn test_intersection_at_thresholds_is_quiet() {
        let tol = ToleranceConfig::default();
        let gains = BoresightGains {
            vertical_db: 1.0,
            horizontal_db: 0.0,
        };
        assert_eq!(check_slice_intersection(&gains, &tol), Ok(None));
    }

    #[test]
    fn test_repeated_angles_round_half_to_even() {
        let v = Slice::new(vec![10.0, 10.5, 90.0], vec![-1.0, -2.0, 0.0]);
        assert_eq!(
            check_repeated_points(&v, SliceKind::Vertical),
            Err(ReconError::InconsistentDuplicateAngle {
                slice: SliceKind::Vertical,
                angle_deg: 10.0
            })
        );

        // 10.5 goes to 10, 11.4 to 11: different groups
        let v = Slice::new(vec![10.5, 11.4, 90.0], vec![-1.0, -2.0, 0.0]);
        assert_eq!(check_repeated_points(&v, SliceKind::Vertical), Ok(()));
    }

    #[test]
    fn test_boresight_sample_found_across_zero_azimuth() {
        let h = Slice::new(vec![358.0, 3.0, 180.0], vec![-0.5, -4.0, -20.0]);
        let idx = check_boresight_coverage(&h, SliceKind::Horizontal, 10.0).unwrap();
        assert_eq!(idx, 0);

        // Vertical boresight 0 dB vs the 358° sample at -0.5 dB: no warning.
        // The 3° sample (-4 dB) would have been a mismatch.
        let warnings = validate(&vertical(), &h, &ToleranceConfig::default()).unwrap();
        assert!(warnings.is_empty());
    }
}
