use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

use super::Influence;

/// Category of an aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Major,
    Minor,
    Kepler,
}

impl AspectType {
    fn bit(&self) -> u8 {
        match self {
            AspectType::Major => 0b001,
            AspectType::Minor => 0b010,
            AspectType::Kepler => 0b100,
        }
    }
}

/// A set of aspect categories
///
/// Serialized as a list, e.g. `["major", "minor"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<AspectType>", into = "Vec<AspectType>")]
pub struct AspectTypes(u8);

impl AspectTypes {
    pub const NONE: AspectTypes = AspectTypes(0);
    pub const MAJOR: AspectTypes = AspectTypes(0b001);
    pub const MINOR: AspectTypes = AspectTypes(0b010);
    pub const KEPLER: AspectTypes = AspectTypes(0b100);
    pub const CLASSIC: AspectTypes = AspectTypes(0b011);
    pub const ALL: AspectTypes = AspectTypes(0b111);

    pub fn contains(&self, aspect_type: AspectType) -> bool {
        self.0 & aspect_type.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for AspectTypes {
    fn default() -> Self {
        AspectTypes::MAJOR
    }
}

impl From<AspectType> for AspectTypes {
    fn from(value: AspectType) -> Self {
        AspectTypes(value.bit())
    }
}

impl From<Vec<AspectType>> for AspectTypes {
    fn from(value: Vec<AspectType>) -> Self {
        value.into_iter().fold(AspectTypes::NONE, |acc, t| acc | t)
    }
}

impl From<AspectTypes> for Vec<AspectType> {
    fn from(value: AspectTypes) -> Self {
        [AspectType::Major, AspectType::Minor, AspectType::Kepler]
            .into_iter()
            .filter(|t| value.contains(*t))
            .collect()
    }
}

impl<T: Into<AspectTypes>> BitOr<T> for AspectTypes {
    type Output = AspectTypes;

    fn bitor(self, rhs: T) -> AspectTypes {
        AspectTypes(self.0 | rhs.into().0)
    }
}

impl BitOr for AspectType {
    type Output = AspectTypes;

    fn bitor(self, rhs: AspectType) -> AspectTypes {
        AspectTypes(self.bit() | rhs.bit())
    }
}

/// Astrological aspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Conjunction,
    Vigintile,
    Quindecile,
    Semisextile,
    Decile,
    Sextile,
    Semisquare,
    Quintile,
    Square,
    Tridecile,
    Trine,
    Sesquiquadrate,
    Biquintile,
    Quincunx,
    Opposition,
}

impl Aspect {
    /// All aspects in the order they are tried
    pub fn all() -> &'static [Aspect] {
        &[
            Aspect::Conjunction,
            Aspect::Vigintile,
            Aspect::Quindecile,
            Aspect::Semisextile,
            Aspect::Decile,
            Aspect::Sextile,
            Aspect::Semisquare,
            Aspect::Quintile,
            Aspect::Square,
            Aspect::Tridecile,
            Aspect::Trine,
            Aspect::Sesquiquadrate,
            Aspect::Biquintile,
            Aspect::Quincunx,
            Aspect::Opposition,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "Conjunction",
            Aspect::Vigintile => "Vigintile",
            Aspect::Quindecile => "Quindecile",
            Aspect::Semisextile => "Semisextile",
            Aspect::Decile => "Decile",
            Aspect::Sextile => "Sextile",
            Aspect::Semisquare => "Semisquare",
            Aspect::Quintile => "Quintile",
            Aspect::Square => "Square",
            Aspect::Tridecile => "Tridecile",
            Aspect::Trine => "Trine",
            Aspect::Sesquiquadrate => "Sesquiquadrate",
            Aspect::Biquintile => "Biquintile",
            Aspect::Quincunx => "Quincunx",
            Aspect::Opposition => "Opposition",
        }
    }

    /// Three-letter abbreviation
    pub fn brief(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "cnj",
            Aspect::Vigintile => "vgt",
            Aspect::Quindecile => "qdc",
            Aspect::Semisextile => "ssx",
            Aspect::Decile => "dcl",
            Aspect::Sextile => "sxt",
            Aspect::Semisquare => "ssq",
            Aspect::Quintile => "qui",
            Aspect::Square => "sqr",
            Aspect::Tridecile => "tdc",
            Aspect::Trine => "tri",
            Aspect::Sesquiquadrate => "sqq",
            Aspect::Biquintile => "bqu",
            Aspect::Quincunx => "qcx",
            Aspect::Opposition => "opp",
        }
    }

    /// Exact angle of the aspect, degrees
    pub fn value(&self) -> f64 {
        match self {
            Aspect::Conjunction => 0.0,
            Aspect::Vigintile => 18.0,
            Aspect::Quindecile => 24.0,
            Aspect::Semisextile => 30.0,
            Aspect::Decile => 36.0,
            Aspect::Sextile => 60.0,
            Aspect::Semisquare => 45.0,
            Aspect::Quintile => 72.0,
            Aspect::Square => 90.0,
            Aspect::Tridecile => 108.0,
            Aspect::Trine => 120.0,
            Aspect::Sesquiquadrate => 135.0,
            Aspect::Biquintile => 144.0,
            Aspect::Quincunx => 150.0,
            Aspect::Opposition => 180.0,
        }
    }

    pub fn influence(&self) -> Influence {
        match self {
            Aspect::Semisextile | Aspect::Sextile | Aspect::Tridecile | Aspect::Trine => {
                Influence::Positive
            }
            Aspect::Semisquare
            | Aspect::Square
            | Aspect::Sesquiquadrate
            | Aspect::Quincunx
            | Aspect::Opposition => Influence::Negative,
            _ => Influence::Neutral,
        }
    }

    pub fn aspect_type(&self) -> AspectType {
        match self {
            Aspect::Conjunction
            | Aspect::Sextile
            | Aspect::Square
            | Aspect::Trine
            | Aspect::Opposition => {
                AspectType::Major
            }
            Aspect::Semisextile
            | Aspect::Semisquare
            | Aspect::Tridecile
            | Aspect::Sesquiquadrate
            | Aspect::Quincunx => AspectType::Minor,
            _ => AspectType::Kepler,
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Aspect details
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AspectInfo {
    pub aspect: Aspect,
    /// Angular distance between the bodies, degrees
    pub arc: f64,
    /// Difference between the actual distance and the exact aspect value, degrees
    pub delta: f64,
}

impl AspectInfo {
    pub fn new(aspect: Aspect, arc: f64) -> Self {
        Self {
            aspect,
            arc,
            delta: (arc - aspect.value()).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_aspects_exclude_kepler() {
        let classic = AspectType::Major | AspectType::Minor;
        assert_eq!(classic, AspectTypes::CLASSIC);
        assert!(!classic.contains(AspectType::Kepler));
        assert!(classic.contains(AspectType::Minor));
    }

    #[test]
    fn test_aspect_types_serialize_as_list() {
        let json = serde_json::to_string(&(AspectTypes::MAJOR | AspectType::Kepler)).unwrap();
        assert_eq!(json, r#"["major","kepler"]"#);
        let back: AspectTypes = serde_json::from_str(r#"["minor"]"#).unwrap();
        assert_eq!(back, AspectTypes::MINOR);
    }

    #[test]
    fn test_aspect_catalogue() {
        assert_eq!(Aspect::all().len(), 15);
        let majors: Vec<_> = Aspect::all()
            .iter()
            .filter(|a| a.aspect_type() == AspectType::Major)
            .collect();
        assert_eq!(majors.len(), 5);
        assert_eq!(Aspect::Trine.influence(), Influence::Positive);
        assert_eq!(Aspect::Quincunx.influence(), Influence::Negative);
        assert_eq!(Aspect::Quintile.influence(), Influence::Neutral);
        assert_eq!(Aspect::Biquintile.brief(), "bqu");
        assert_eq!(Aspect::Tridecile.value(), 108.0);
    }

    #[test]
    fn test_aspect_info_delta() {
        let info = AspectInfo::new(Aspect::Square, 94.0);
        assert_eq!(info.delta, 4.0);
    }
}
