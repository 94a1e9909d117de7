//! Sensitive points: calculated, non-physical chart points.
//!
//! All calculations here are in radians.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use super::angles::reduce_rad;

/// Kinds of sensitive points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SensitivePoint {
    Ascendant,
    Midheaven,
    EastPoint,
    Vertex,
}

impl fmt::Display for SensitivePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensitivePoint::Ascendant => "Ascendant",
            SensitivePoint::Midheaven => "Midheaven",
            SensitivePoint::EastPoint => "EastPoint",
            SensitivePoint::Vertex => "Vertex",
        };
        write!(f, "{}", name)
    }
}

/// Longitudes of the sensitive points of a chart, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SensitivePoints {
    pub asc: f64,
    pub mc: f64,
    pub vertex: f64,
    pub east_point: f64,
}

impl SensitivePoints {
    /// Calculate all points from radian inputs, returning degrees.
    pub fn calculate(ramc: f64, eps: f64, theta: f64) -> Self {
        Self {
            asc: ascendant(ramc, eps, theta).to_degrees(),
            mc: midheaven(ramc, eps).to_degrees(),
            vertex: vertex(ramc, eps, theta).to_degrees(),
            east_point: east_point(ramc, eps).to_degrees(),
        }
    }

    pub fn get(&self, point: SensitivePoint) -> f64 {
        match point {
            SensitivePoint::Ascendant => self.asc,
            SensitivePoint::Midheaven => self.mc,
            SensitivePoint::EastPoint => self.east_point,
            SensitivePoint::Vertex => self.vertex,
        }
    }
}

/// Midheaven (Medium Coeli): the highest intersection of the meridian and the ecliptic.
///
/// * `ramc` - right ascension of the meridian
/// * `eps` - obliquity of the ecliptic
pub fn midheaven(ramc: f64, eps: f64) -> f64 {
    let mut x = ramc.tan().atan2(eps.cos());
    if x < 0.0 {
        x += PI;
    }
    if ramc.sin() < 0.0 {
        x += PI;
    }
    reduce_rad(x)
}

/// Ascendant: the point of the zodiac rising on the eastern horizon.
///
/// * `theta` - geographic latitude, positive northwards
pub fn ascendant(ramc: f64, eps: f64, theta: f64) -> f64 {
    reduce_rad(
        ramc.cos()
            .atan2(-ramc.sin() * eps.cos() - theta.tan() * eps.sin()),
    )
}

/// Vertex: the westernmost intersection of the ecliptic with the prime vertical.
pub fn vertex(ramc: f64, eps: f64, theta: f64) -> f64 {
    ascendant(ramc + PI, eps, FRAC_PI_2 - theta)
}

/// East Point (equatorial ascendant): the degree rising at the equator.
pub fn east_point(ramc: f64, eps: f64) -> f64 {
    reduce_rad(ramc.cos().atan2(-ramc.sin() * eps.cos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const THETA: f64 = 55.75;
    const EPS: f64 = 23.44425561111111;
    const RAMC: f64 = 345.5553345833333;

    #[test]
    fn test_midheaven() {
        let got = midheaven(RAMC.to_radians(), EPS.to_radians()).to_degrees();
        assert_abs_diff_eq!(got, 344.3172222222222, epsilon = 1e-3);
    }

    #[test]
    fn test_ascendant() {
        let got = ascendant(RAMC.to_radians(), EPS.to_radians(), THETA.to_radians()).to_degrees();
        assert_abs_diff_eq!(got, 110.15722222222222, epsilon = 1e-4);
    }

    #[test]
    fn test_vertex() {
        let got = vertex(RAMC.to_radians(), EPS.to_radians(), THETA.to_radians()).to_degrees();
        assert_abs_diff_eq!(got, 242.70361111111112, epsilon = 1e-4);
    }

    #[test]
    fn test_east_point() {
        let got = east_point(RAMC.to_radians(), EPS.to_radians()).to_degrees();
        assert_abs_diff_eq!(got, 76.70363, epsilon = 1e-4);
    }

    #[test]
    fn test_midheaven_in_each_quadrant() {
        // With zero obliquity the MC coincides with the RAMC
        for ramc in [10.0_f64, 100.0, 190.0, 280.0] {
            let got = midheaven(ramc.to_radians(), 0.0).to_degrees();
            assert_abs_diff_eq!(got, ramc, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_calculate_collects_degrees() {
        let points = SensitivePoints::calculate(
            RAMC.to_radians(),
            EPS.to_radians(),
            THETA.to_radians(),
        );
        assert_abs_diff_eq!(points.get(SensitivePoint::Ascendant), 110.1572, epsilon = 1e-3);
        assert_abs_diff_eq!(points.get(SensitivePoint::Midheaven), 344.3172, epsilon = 1e-3);
        assert_abs_diff_eq!(points.get(SensitivePoint::Vertex), 242.7036, epsilon = 1e-3);
        assert_abs_diff_eq!(points.get(SensitivePoint::EastPoint), 76.7036, epsilon = 1e-3);
    }
}
