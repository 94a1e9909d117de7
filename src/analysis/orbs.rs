//! Aspect orbs
//!
//! There are different ways to decide whether two objects are in aspect,
//! that is, how much leeway is allowed around the exact aspect angle.

use serde::{Deserialize, Serialize};

use crate::ephemeris::shortest_arc_deg;
use crate::models::{Aspect, AspectInfo, AspectType, ChartObjectInfo, ChartObjectType};

/// A rule for detecting aspects
pub trait OrbsMethod {
    fn name(&self) -> &'static str;

    /// Check whether two objects form `aspect`.
    ///
    /// `arc` may carry the precomputed angular distance between the objects
    /// when several aspects are checked for the same pair.
    fn is_aspect(
        &self,
        source: &ChartObjectInfo,
        target: &ChartObjectInfo,
        aspect: Aspect,
        arc: Option<f64>,
    ) -> Option<AspectInfo>;
}

fn arc_between(source: &ChartObjectInfo, target: &ChartObjectInfo, arc: Option<f64>) -> f64 {
    arc.unwrap_or_else(|| shortest_arc_deg(source.longitude(), target.longitude()))
}

/// Claude Dariot method, based on the bodies in aspect.
///
/// Dariot (1533-1594) introduced "moieties" (mean values): the orb of an
/// aspect is the mean of the moieties of both bodies, whatever the aspect.
/// This became the standard of European Renaissance astrologers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dariot;

impl Dariot {
    pub const DEFAULT_MOIETY: f64 = 4.0;

    /// Moiety of an object, arc-degrees
    pub fn moiety(object: ChartObjectType) -> f64 {
        match object {
            ChartObjectType::Moon => 12.0,
            ChartObjectType::Sun => 15.0,
            ChartObjectType::Mercury => 7.0,
            ChartObjectType::Venus => 7.0,
            ChartObjectType::Mars => 8.0,
            ChartObjectType::Jupiter => 9.0,
            ChartObjectType::Saturn => 9.0,
            ChartObjectType::Uranus => 6.0,
            ChartObjectType::Neptune => 6.0,
            ChartObjectType::Pluto => 5.0,
            ChartObjectType::Node => Self::DEFAULT_MOIETY,
        }
    }

    /// Orb between two objects, arc-degrees
    pub fn calculate_orb(&self, src: ChartObjectType, dst: ChartObjectType) -> f64 {
        (Self::moiety(src) + Self::moiety(dst)) / 2.0
    }

    /// Check an aspect against a ready orb
    pub fn check_aspect(&self, aspect: Aspect, orb: f64, arc: f64) -> Option<AspectInfo> {
        let info = AspectInfo::new(aspect, arc);
        (info.delta <= orb).then_some(info)
    }
}

impl OrbsMethod for Dariot {
    fn name(&self) -> &'static str {
        "Classic (Claude Dariot)"
    }

    fn is_aspect(
        &self,
        source: &ChartObjectInfo,
        target: &ChartObjectInfo,
        aspect: Aspect,
        arc: Option<f64>,
    ) -> Option<AspectInfo> {
        let arc = arc_between(source, target, arc);
        let orb = self.calculate_orb(source.object_type, target.object_type);
        self.check_aspect(aspect, orb, arc)
    }
}

/// Orbs based on the nature of the aspects.
///
/// Ranges are from "Encyclopaedia of Astrology" by Nicholas deVore.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeVore;

impl DeVore {
    /// Inclusive range of arcs accepted for an aspect
    pub fn range(aspect: Aspect) -> (f64, f64) {
        match aspect {
            Aspect::Conjunction => (-10.0, 6.0),
            Aspect::Vigintile => (17.5, 18.5),
            Aspect::Quindecile => (23.5, 24.5),
            Aspect::Semisextile => (28.0, 31.0),
            Aspect::Decile => (35.5, 36.5),
            Aspect::Sextile => (56.0, 63.0),
            Aspect::Semisquare => (42.0, 49.0),
            Aspect::Quintile => (71.5, 72.5),
            Aspect::Square => (84.0, 96.0),
            Aspect::Tridecile => (107.5, 108.5),
            Aspect::Trine => (113.0, 125.0),
            Aspect::Sesquiquadrate => (132.0, 137.0),
            Aspect::Biquintile => (143.5, 144.5),
            Aspect::Quincunx => (148.0, 151.0),
            Aspect::Opposition => (174.0, 186.0),
        }
    }
}

impl OrbsMethod for DeVore {
    fn name(&self) -> &'static str {
        "By Aspect (Nicholas deVore)"
    }

    fn is_aspect(
        &self,
        source: &ChartObjectInfo,
        target: &ChartObjectInfo,
        aspect: Aspect,
        arc: Option<f64>,
    ) -> Option<AspectInfo> {
        let arc = arc_between(source, target, arc);
        let (low, high) = Self::range(aspect);
        (low <= arc && arc <= high).then(|| AspectInfo::new(aspect, arc))
    }
}

/// Dariot orbs scaled down for minor and Kepler aspects.
#[derive(Debug, Clone, Copy)]
pub struct ClassicWithAspectRatio {
    pub minor_coeff: f64,
    pub kepler_coeff: f64,
}

impl ClassicWithAspectRatio {
    pub const DEFAULT_MINOR_COEFF: f64 = 0.6;
    pub const DEFAULT_KEPLER_COEFF: f64 = 0.5;

    pub fn new(minor_coeff: f64, kepler_coeff: f64) -> Self {
        Self {
            minor_coeff,
            kepler_coeff,
        }
    }
}

impl Default for ClassicWithAspectRatio {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MINOR_COEFF, Self::DEFAULT_KEPLER_COEFF)
    }
}

impl OrbsMethod for ClassicWithAspectRatio {
    fn name(&self) -> &'static str {
        "Classic with regard to Aspect type"
    }

    fn is_aspect(
        &self,
        source: &ChartObjectInfo,
        target: &ChartObjectInfo,
        aspect: Aspect,
        arc: Option<f64>,
    ) -> Option<AspectInfo> {
        let arc = arc_between(source, target, arc);
        let orb = Dariot.calculate_orb(source.object_type, target.object_type);
        let orb = match aspect.aspect_type() {
            AspectType::Major => orb,
            AspectType::Minor => orb * self.minor_coeff,
            AspectType::Kepler => orb * self.kepler_coeff,
        };
        Dariot.check_aspect(aspect, orb, arc)
    }
}

fn default_minor_coeff() -> f64 {
    ClassicWithAspectRatio::DEFAULT_MINOR_COEFF
}

fn default_kepler_coeff() -> f64 {
    ClassicWithAspectRatio::DEFAULT_KEPLER_COEFF
}

/// Serializable choice of orbs method, as stored in chart settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Orbs {
    Dariot,
    DeVore,
    ClassicWithAspectRatio {
        #[serde(default = "default_minor_coeff")]
        minor_coeff: f64,
        #[serde(default = "default_kepler_coeff")]
        kepler_coeff: f64,
    },
}

impl Default for Orbs {
    fn default() -> Self {
        Orbs::ClassicWithAspectRatio {
            minor_coeff: ClassicWithAspectRatio::DEFAULT_MINOR_COEFF,
            kepler_coeff: ClassicWithAspectRatio::DEFAULT_KEPLER_COEFF,
        }
    }
}

impl OrbsMethod for Orbs {
    fn name(&self) -> &'static str {
        match self {
            Orbs::Dariot => Dariot.name(),
            Orbs::DeVore => DeVore.name(),
            Orbs::ClassicWithAspectRatio { .. } => ClassicWithAspectRatio::default().name(),
        }
    }

    fn is_aspect(
        &self,
        source: &ChartObjectInfo,
        target: &ChartObjectInfo,
        aspect: Aspect,
        arc: Option<f64>,
    ) -> Option<AspectInfo> {
        match *self {
            Orbs::Dariot => Dariot.is_aspect(source, target, aspect, arc),
            Orbs::DeVore => DeVore.is_aspect(source, target, aspect, arc),
            Orbs::ClassicWithAspectRatio {
                minor_coeff,
                kepler_coeff,
            } => ClassicWithAspectRatio::new(minor_coeff, kepler_coeff)
                .is_aspect(source, target, aspect, arc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(object_type: ChartObjectType, lambda: f64) -> ChartObjectInfo {
        ChartObjectInfo::at_longitude(object_type, lambda)
    }

    /// Cases every method agrees on
    fn common_cases() -> Vec<(ChartObjectInfo, ChartObjectInfo, Aspect, Option<AspectInfo>)> {
        vec![
            (
                obj(ChartObjectType::Moon, 310.0),
                obj(ChartObjectType::Sun, 312.0),
                Aspect::Conjunction,
                Some(AspectInfo {
                    aspect: Aspect::Conjunction,
                    arc: 2.0,
                    delta: 2.0,
                }),
            ),
            (
                obj(ChartObjectType::Moon, 310.0),
                obj(ChartObjectType::Mercury, 295.0),
                Aspect::Conjunction,
                None,
            ),
            (
                obj(ChartObjectType::Moon, 310.0),
                obj(ChartObjectType::Sun, 312.0),
                Aspect::Opposition,
                None,
            ),
            (
                obj(ChartObjectType::Sun, 312.0),
                obj(ChartObjectType::Jupiter, 46.0),
                Aspect::Square,
                Some(AspectInfo {
                    aspect: Aspect::Square,
                    arc: 94.0,
                    delta: 4.0,
                }),
            ),
        ]
    }

    fn check(method: &dyn OrbsMethod) {
        for (source, target, aspect, expected) in common_cases() {
            assert_eq!(
                method.is_aspect(&source, &target, aspect, None),
                expected,
                "{} {:?}-{:?} {}",
                method.name(),
                source.object_type,
                target.object_type,
                aspect
            );
        }
    }

    #[test]
    fn test_dariot() {
        check(&Dariot);
    }

    #[test]
    fn test_devore() {
        check(&DeVore);
    }

    #[test]
    fn test_classic_with_aspect_ratio() {
        check(&ClassicWithAspectRatio::default());
    }

    #[test]
    fn test_orbs_selector_delegates() {
        check(&Orbs::Dariot);
        check(&Orbs::DeVore);
        check(&Orbs::default());
    }

    #[test]
    fn test_dariot_orb_is_mean_of_moieties() {
        assert_eq!(Dariot.calculate_orb(ChartObjectType::Moon, ChartObjectType::Mercury), 9.5);
        assert_eq!(Dariot.calculate_orb(ChartObjectType::Node, ChartObjectType::Pluto), 4.5);
    }

    #[test]
    fn test_aspect_ratio_narrows_minor_aspects() {
        // Sun-Moon orb is 13.5; a semisextile 10° off is inside it but outside 60% of it
        let sun = obj(ChartObjectType::Sun, 0.0);
        let moon = obj(ChartObjectType::Moon, 40.0);
        assert!(Dariot.is_aspect(&sun, &moon, Aspect::Semisextile, None).is_some());
        assert!(ClassicWithAspectRatio::default()
            .is_aspect(&sun, &moon, Aspect::Semisextile, None)
            .is_none());
    }

    #[test]
    fn test_precomputed_arc_is_used() {
        let sun = obj(ChartObjectType::Sun, 0.0);
        let moon = obj(ChartObjectType::Moon, 0.0);
        let info = DeVore.is_aspect(&sun, &moon, Aspect::Trine, Some(120.0)).unwrap();
        assert_eq!(info.delta, 0.0);
    }

    #[test]
    fn test_orbs_settings_json() {
        let json = r#"{"method": "classic_with_aspect_ratio", "minor_coeff": 0.8}"#;
        let orbs: Orbs = serde_json::from_str(json).unwrap();
        assert_eq!(
            orbs,
            Orbs::ClassicWithAspectRatio {
                minor_coeff: 0.8,
                kepler_coeff: 0.5
            }
        );
        let orbs: Orbs = serde_json::from_str(r#"{"method": "de_vore"}"#).unwrap();
        assert_eq!(orbs, Orbs::DeVore);
    }
}
