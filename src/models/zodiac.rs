use serde::{Deserialize, Serialize};
use std::fmt;

/// Astrological influence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Influence {
    Neutral,
    Negative,
    Positive,
}

/// Elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Triplicity {
    Fire,
    Earth,
    Air,
    Water,
}

impl Triplicity {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            Triplicity::Fire => "Fire",
            Triplicity::Earth => "Earth",
            Triplicity::Air => "Air",
            Triplicity::Water => "Water",
        }
    }
}

/// Modalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Quadruplicity {
    Cardinal,
    Fixed,
    Mutable,
}

impl Quadruplicity {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            Quadruplicity::Cardinal => "Cardinal",
            Quadruplicity::Fixed => "Fixed",
            Quadruplicity::Mutable => "Mutable",
        }
    }
}

/// Zodiac signs in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

const SIGN_TITLES: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo", "Libra", "Scorpio", "Sagittarius",
    "Capricorn", "Aquarius", "Pisces",
];

impl ZodiacSign {
    pub fn all() -> &'static [ZodiacSign] {
        &SIGNS
    }

    /// Sign containing an ecliptic longitude, degrees
    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index((longitude.rem_euclid(360.0) / 30.0) as usize)
    }

    /// Sign by index, 0 = Aries; wraps past Pisces
    pub fn from_index(index: usize) -> Self {
        SIGNS[index % 12]
    }

    /// Longitude where the sign begins
    pub fn start_degree(&self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn title(&self) -> &'static str {
        SIGN_TITLES[self.index()]
    }

    /// Element: signs cycle Fire, Earth, Air, Water from Aries
    pub fn triplicity(&self) -> Triplicity {
        match self.index() % 4 {
            0 => Triplicity::Fire,
            1 => Triplicity::Earth,
            2 => Triplicity::Air,
            _ => Triplicity::Water,
        }
    }

    /// Modality: signs cycle Cardinal, Fixed, Mutable from Aries
    pub fn quadruplicity(&self) -> Quadruplicity {
        match self.index() % 3 {
            0 => Quadruplicity::Cardinal,
            1 => Quadruplicity::Fixed,
            _ => Quadruplicity::Mutable,
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A position in the zodiac with sign and degree
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ZodiacPosition {
    pub sign: ZodiacSign,
    /// Degree within the sign (0-29.999...)
    pub degree: f64,
    /// Full ecliptic longitude (0-360)
    pub longitude: f64,
}

impl ZodiacPosition {
    pub fn from_longitude(longitude: f64) -> Self {
        let longitude = longitude.rem_euclid(360.0);
        let sign = ZodiacSign::from_longitude(longitude);
        Self {
            sign,
            degree: longitude - sign.start_degree(),
            longitude,
        }
    }

    /// Whole degrees and sign, e.g. "28° Scorpio"
    pub fn format_degree_sign(&self) -> String {
        format!("{}° {}", self.degree.floor() as i32, self.sign)
    }
}
