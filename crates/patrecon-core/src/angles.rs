//! Angle conventions and helpers
//!
//! Spherical coordinates follow the usual antenna-measurement convention:
//! θ is the polar angle from zenith, φ the azimuth from the x-axis. Boresight
//! (main beam direction) is θ = 90°, φ = 0°. All angles are in degrees.

/// Polar angle of boresight in degrees
pub const THETA_BORESIGHT_DEG: f64 = 90.0;
/// Azimuth of boresight in degrees
pub const PHI_BORESIGHT_DEG: f64 = 0.0;
/// Step of the default azimuth grid in degrees
pub const DEFAULT_PHI_STEP_DEG: f64 = 5.0;

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn wrap_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Circular distance between two angles, in `[0, 180]`.
#[inline]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = wrap_deg(a - b);
    d.min(360.0 - d)
}

/// Round to the nearest whole degree, ties to the even neighbour.
///
/// 10.5 rounds to 10 and 11.5 to 12.
#[inline]
pub fn round_half_even(angle: f64) -> f64 {
    let rounded = angle.round();
    if (angle - angle.trunc()).abs() == 0.5 {
        2.0 * (angle / 2.0).round()
    } else {
        rounded
    }
}

/// Index and distance of the sample nearest to `target`.
///
/// Ties resolve to the first index. Returns `None` for an empty series.
pub fn nearest_index(angles: &[f64], target: f64) -> Option<(usize, f64)> {
    angles
        .iter()
        .map(|&a| angular_distance(a, target))
        .enumerate()
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
}

/// Default azimuth grid: 0, 5, 10, ..., 360 degrees (73 samples).
pub fn default_phi_grid() -> Vec<f64> {
    let steps = (360.0 / DEFAULT_PHI_STEP_DEG).round() as usize;
    (0..=steps).map(|i| i as f64 * DEFAULT_PHI_STEP_DEG).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_deg() {
        assert_relative_eq!(wrap_deg(0.0), 0.0);
        assert_relative_eq!(wrap_deg(360.0), 0.0);
        assert_relative_eq!(wrap_deg(-90.0), 270.0);
        assert_relative_eq!(wrap_deg(725.0), 5.0);
        assert!(wrap_deg(-1e-20) < 360.0);
    }

    #[test]
    fn test_angular_distance_is_circular() {
        assert_relative_eq!(angular_distance(80.0, 90.0), 10.0);
        assert_relative_eq!(angular_distance(100.0, 90.0), 10.0);
        assert_relative_eq!(angular_distance(355.0, 0.0), 5.0);
        assert_relative_eq!(angular_distance(-5.0, 0.0), 5.0);
        assert_relative_eq!(angular_distance(270.0, 90.0), 180.0);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(10.5), 10.0);
        assert_eq!(round_half_even(11.5), 12.0);
        assert_eq!(round_half_even(-10.5), -10.0);
        assert_eq!(round_half_even(10.4), 10.0);
        assert_eq!(round_half_even(10.6), 11.0);
        assert_eq!(round_half_even(359.5), 360.0);
    }

    #[test]
    fn test_nearest_index_across_zero() {
        let (idx, d) = nearest_index(&[358.0, 3.0], PHI_BORESIGHT_DEG).unwrap();
        assert_eq!(idx, 0);
        assert_relative_eq!(d, 2.0);
    }

    #[test]
    fn test_nearest_index() {
        let phi = [90.0, 180.0, 350.0, 270.0];
        let (idx, d) = nearest_index(&phi, 0.0).unwrap();
        assert_eq!(idx, 2);
        assert_relative_eq!(d, 10.0);
        assert!(nearest_index(&[], 0.0).is_none());
    }

    #[test]
    fn test_nearest_index_tie_prefers_first() {
        let theta = [80.0, 100.0];
        let (idx, _) = nearest_index(&theta, 90.0).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_default_phi_grid() {
        let phi = default_phi_grid();
        assert_eq!(phi.len(), 73);
        assert_eq!(phi[1], 5.0);
        assert_eq!(*phi.last().unwrap(), 360.0);
    }
}
