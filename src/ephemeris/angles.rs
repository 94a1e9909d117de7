//! Circular arithmetic on angles.

use std::f64::consts::{PI, TAU};

/// Normalize an angle in degrees to `[0, 360)`.
pub fn reduce_deg(x: f64) -> f64 {
    let r = x.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Normalize an angle in radians to `[0, 2π)`.
pub fn reduce_rad(x: f64) -> f64 {
    let r = x.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Shortest distance between two longitudes in degrees, `[0, 180]`.
pub fn shortest_arc_deg(a: f64, b: f64) -> f64 {
    let d = reduce_deg(a - b);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Shortest distance between two angles in radians, `[0, π]`.
pub fn shortest_arc_rad(a: f64, b: f64) -> f64 {
    let d = reduce_rad(a - b);
    if d > PI {
        TAU - d
    } else {
        d
    }
}

/// Signed difference `b - a` in degrees, normalized to `[-180, 180)`.
pub fn diff_angle(a: f64, b: f64) -> f64 {
    let d = reduce_deg(b - a);
    if d >= 180.0 {
        d - 360.0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reduce_deg() {
        assert_abs_diff_eq!(reduce_deg(370.0), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reduce_deg(-10.0), 350.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reduce_deg(720.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reduce_rad() {
        assert_abs_diff_eq!(reduce_rad(-PI / 2.0), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(reduce_rad(3.0 * PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_shortest_arc_across_zero() {
        assert_abs_diff_eq!(shortest_arc_deg(358.0, 6.0), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_arc_deg(6.0, 358.0), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_arc_deg(312.0, 46.0), 94.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_arc_deg(0.0, 180.0), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shortest_arc_rad() {
        let got = shortest_arc_rad(0.1, TAU - 0.1);
        assert_abs_diff_eq!(got, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_angle_sign() {
        assert_abs_diff_eq!(diff_angle(358.0, 6.0), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(diff_angle(6.0, 358.0), -8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(diff_angle(10.0, 20.0), 10.0, epsilon = 1e-12);
    }
}
