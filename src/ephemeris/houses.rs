//! Astrological house systems
//!
//! Quadrant-based systems (Placidus, Koch, Regiomontanus, Campanus,
//! Topocentric), the Morinus system and three equal systems.
//!
//! Inputs are in radians, resulting cusps are arc-degrees.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use super::angles::{reduce_deg, reduce_rad, shortest_arc_rad};
use super::points::{ascendant, midheaven};
use crate::error::{AstrologerError, Result};

const HALF_SECOND: f64 = 0.5 / 3600.0;
const R30: f64 = PI / 6.0;
const R60: f64 = PI / 3.0;
const R120: f64 = 2.0 * PI / 3.0;
const R150: f64 = 5.0 * PI / 6.0;

/// (house, divisor, initial offset from RAMC)
const PLACIDUS_ARGS: [(u8, f64, f64); 4] = [
    (10, 3.0, R30),
    (11, 1.5, R60),
    (1, 1.5, R120),
    (2, 3.0, R150),
];
const PLACIDUS_DELTA: f64 = 1e-4;
const PLACIDUS_MAX_ITERATIONS: usize = 100;
const TOPOCENTRIC_ARGS: [(f64, f64); 4] = [(-R60, 1.0), (-R30, 2.0), (R30, 2.0), (R60, 1.0)];

/// House systems
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum HousesSystem {
    #[default]
    Placidus,
    Koch,
    Regiomontanus,
    Campanus,
    Topocentric,
    Morinus,
    EqualSignCusp,
    EqualAsc,
    EqualMc,
}

impl HousesSystem {
    pub fn all() -> &'static [HousesSystem] {
        &[
            HousesSystem::Placidus,
            HousesSystem::Koch,
            HousesSystem::Regiomontanus,
            HousesSystem::Campanus,
            HousesSystem::Topocentric,
            HousesSystem::Morinus,
            HousesSystem::EqualSignCusp,
            HousesSystem::EqualAsc,
            HousesSystem::EqualMc,
        ]
    }

    /// Whether cusps are derived by dividing the quadrants between the angles
    pub fn is_quadrant(&self) -> bool {
        matches!(
            self,
            HousesSystem::Placidus
                | HousesSystem::Koch
                | HousesSystem::Regiomontanus
                | HousesSystem::Campanus
                | HousesSystem::Topocentric
        )
    }
}

impl fmt::Display for HousesSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HousesSystem::Placidus => "Placidus",
            HousesSystem::Koch => "Koch",
            HousesSystem::Regiomontanus => "Regio-Montanus",
            HousesSystem::Campanus => "Campanus",
            HousesSystem::Topocentric => "Topocentric",
            HousesSystem::Morinus => "Morinus",
            HousesSystem::EqualSignCusp => "Equal (Sign-Cusp)",
            HousesSystem::EqualAsc => "Equal from Asc",
            HousesSystem::EqualMc => "Equal from MC",
        };
        write!(f, "{}", name)
    }
}

/// Base cusps (11, 12, 2, 3) by the Placidus semi-arc method, in radians.
pub fn placidus_cusps(ramc: f64, eps: f64, theta: f64) -> [f64; 4] {
    let tt = theta.tan() * eps.tan();
    let cs_eps = eps.cos();
    let mut cusps = [0.0; 4];

    for (slot, (house, f, x0)) in PLACIDUS_ARGS.iter().enumerate() {
        let (k, r) = if matches!(house, 10 | 11) {
            (-1.0, ramc)
        } else {
            (1.0, ramc + PI)
        };
        let mut last_x = x0 + ramc;
        for _ in 0..PLACIDUS_MAX_ITERATIONS {
            let x = r - k * (k * last_x.sin() * tt).acos() / f;
            if shortest_arc_rad(x, last_x).abs() < PLACIDUS_DELTA {
                break;
            }
            last_x = x;
        }
        cusps[slot] = reduce_rad(last_x.sin().atan2(cs_eps * last_x.cos()));
    }

    cusps
}

/// Base cusps (11, 12, 2, 3) by the Koch method, in radians.
pub fn koch_cusps(ramc: f64, eps: f64, theta: f64, mc: f64) -> [f64; 4] {
    let k = (theta.tan() * (mc.sin() * eps.sin()).asin().tan()).asin();
    let k1 = k / 3.0;
    let k2 = k1 * 2.0;
    [-R60 - k2, -R30 - k1, R30 + k1, R60 + k2].map(|x| ascendant(ramc + x, eps, theta))
}

/// Base cusps (11, 12, 2, 3) by the Regiomontanus method, in radians.
pub fn regiomontanus_cusps(ramc: f64, eps: f64, theta: f64) -> [f64; 4] {
    let tn_theta = theta.tan();
    [R30, R60, R120, R150].map(|h| {
        let rh = ramc + h;
        let r = (h.sin() * tn_theta).atan2(rh.cos());
        reduce_rad((r.cos() * rh.tan()).atan2((r + eps).cos()))
    })
}

/// Base cusps (11, 12, 2, 3) by the Campanus method, in radians.
pub fn campanus_cusps(ramc: f64, eps: f64, theta: f64) -> [f64; 4] {
    let rm90 = ramc + FRAC_PI_2;
    let (sn_the, cs_the) = theta.sin_cos();
    [R30, R60, R120, R150].map(|h| {
        let sn_h = h.sin();
        let d = rm90 - h.cos().atan2(sn_h * cs_the);
        let c = (sn_the * sn_h).asin().tan().atan2(d.cos());
        reduce_rad((d.tan() * c.cos()).atan2((c + eps).cos()))
    })
}

/// Base cusps (11, 12, 2, 3) by the Topocentric (Polich-Page) method, in radians.
pub fn topocentric_cusps(ramc: f64, eps: f64, theta: f64) -> [f64; 4] {
    let tn_the = theta.tan();
    TOPOCENTRIC_ARGS.map(|(x, n)| ascendant(ramc + x, eps, (n * tn_the).atan2(3.0)))
}

/// Cusps 1-12 of a quadrant system, in arc-degrees.
///
/// `asc` and `mc` are calculated when not supplied. Fails above the polar
/// circles, where the ecliptic does not cross every quadrant, and for
/// systems that are not quadrant-based.
pub fn quadrant_cusps(
    system: HousesSystem,
    ramc: f64,
    eps: f64,
    theta: f64,
    asc: Option<f64>,
    mc: Option<f64>,
) -> Result<[f64; 12]> {
    if theta.abs() > FRAC_PI_2 - eps.abs() {
        return Err(AstrologerError::HighLatitude {
            latitude: theta.to_degrees(),
        });
    }

    let mc = mc.unwrap_or_else(|| midheaven(ramc, eps));
    let asc = asc.unwrap_or_else(|| ascendant(ramc, eps, theta));

    let base = match system {
        HousesSystem::Placidus => placidus_cusps(ramc, eps, theta),
        HousesSystem::Koch => koch_cusps(ramc, eps, theta, mc),
        HousesSystem::Regiomontanus => regiomontanus_cusps(ramc, eps, theta),
        HousesSystem::Campanus => campanus_cusps(ramc, eps, theta),
        HousesSystem::Topocentric => topocentric_cusps(ramc, eps, theta),
        other => return Err(AstrologerError::NotQuadrantSystem(other)),
    };

    let cusps = [
        asc,
        base[2],
        base[3],
        reduce_rad(mc + PI),
        reduce_rad(base[0] + PI),
        reduce_rad(base[1] + PI),
        reduce_rad(asc + PI),
        reduce_rad(base[2] + PI),
        reduce_rad(base[3] + PI),
        mc,
        base[0],
        base[1],
    ];
    Ok(cusps.map(f64::to_degrees))
}

/// Cusps 1-12 of the Morinus system, in arc-degrees.
pub fn morinus_cusps(ramc: f64, eps: f64) -> [f64; 12] {
    let cs_eps = eps.cos();
    std::array::from_fn(|i| {
        let r = ramc + R60 + R30 * (i + 1) as f64;
        reduce_deg((r.sin() * cs_eps).atan2(r.cos()).to_degrees())
    })
}

/// Equal cusps 30° apart, the cusp `start_n` (zero-based) placed at `start_x` radians.
pub fn equal_cusps(start_n: usize, start_x: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for i in 0..12 {
        let n = (start_n + i) % 12;
        cusps[n] = reduce_rad(start_x + R30 * i as f64).to_degrees();
    }
    cusps
}

/// Sign-cusp system: every house coincides with a sign.
pub fn signcusp_cusps() -> [f64; 12] {
    equal_cusps(0, 0.0)
}

/// Equal houses counted from the Ascendant (radians).
pub fn equal_asc_cusps(asc: f64) -> [f64; 12] {
    equal_cusps(0, asc)
}

/// Equal houses with the Midheaven (radians) on the 10th cusp.
pub fn equal_mc_cusps(mc: f64) -> [f64; 12] {
    equal_cusps(9, mc)
}

/// Cusps 1-12 in arc-degrees for any house system.
pub fn cusps_for(
    system: HousesSystem,
    ramc: f64,
    eps: f64,
    theta: f64,
    asc: Option<f64>,
    mc: Option<f64>,
) -> Result<[f64; 12]> {
    match system {
        HousesSystem::Placidus
        | HousesSystem::Koch
        | HousesSystem::Regiomontanus
        | HousesSystem::Campanus
        | HousesSystem::Topocentric => quadrant_cusps(system, ramc, eps, theta, asc, mc),
        HousesSystem::Morinus => Ok(morinus_cusps(ramc, eps)),
        HousesSystem::EqualAsc => Ok(equal_asc_cusps(
            asc.unwrap_or_else(|| ascendant(ramc, eps, theta)),
        )),
        HousesSystem::EqualMc => Ok(equal_mc_cusps(mc.unwrap_or_else(|| midheaven(ramc, eps)))),
        HousesSystem::EqualSignCusp => Ok(signcusp_cusps()),
    }
}

/// Zero-based index of the house containing longitude `x` (degrees).
///
/// A point within half an arc-second before a cusp counts as being on it.
pub fn in_house(x: f64, cusps: &[f64]) -> usize {
    let r = reduce_deg(x + HALF_SECOND);
    let len = cusps.len();

    for i in 0..len {
        let a = cusps[i];
        let b = cusps[(i + 1) % len];

        // Handle wrap-around at 360°/0°
        if (a <= r && r < b) || (a > b && (r >= a || r < b)) {
            return i;
        }
    }

    0
}
