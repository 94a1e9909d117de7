use serde::{Deserialize, Serialize};
use std::fmt;

use super::ZodiacPosition;

/// Celestial bodies and points placed in a chart
///
/// Declaration order is the order in which a chart lists its objects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartObjectType {
    Moon,
    Sun,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// Ascending lunar node
    Node,
}

impl ChartObjectType {
    /// Get all chart objects for iteration
    pub fn all() -> &'static [ChartObjectType] {
        &[
            ChartObjectType::Moon,
            ChartObjectType::Sun,
            ChartObjectType::Mercury,
            ChartObjectType::Venus,
            ChartObjectType::Mars,
            ChartObjectType::Jupiter,
            ChartObjectType::Saturn,
            ChartObjectType::Uranus,
            ChartObjectType::Neptune,
            ChartObjectType::Pluto,
            ChartObjectType::Node,
        ]
    }

    /// Get Swiss Ephemeris body ID
    pub fn swe_id(&self, true_node: bool) -> i32 {
        match self {
            ChartObjectType::Sun => 0,     // SE_SUN
            ChartObjectType::Moon => 1,    // SE_MOON
            ChartObjectType::Mercury => 2, // SE_MERCURY
            ChartObjectType::Venus => 3,   // SE_VENUS
            ChartObjectType::Mars => 4,    // SE_MARS
            ChartObjectType::Jupiter => 5, // SE_JUPITER
            ChartObjectType::Saturn => 6,  // SE_SATURN
            ChartObjectType::Uranus => 7,  // SE_URANUS
            ChartObjectType::Neptune => 8, // SE_NEPTUNE
            ChartObjectType::Pluto => 9,   // SE_PLUTO
            ChartObjectType::Node if true_node => 11, // SE_TRUE_NODE
            ChartObjectType::Node => 10,   // SE_MEAN_NODE
        }
    }
}

impl fmt::Display for ChartObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartObjectType::Moon => "Moon",
            ChartObjectType::Sun => "Sun",
            ChartObjectType::Mercury => "Mercury",
            ChartObjectType::Venus => "Venus",
            ChartObjectType::Mars => "Mars",
            ChartObjectType::Jupiter => "Jupiter",
            ChartObjectType::Saturn => "Saturn",
            ChartObjectType::Uranus => "Uranus",
            ChartObjectType::Neptune => "Neptune",
            ChartObjectType::Pluto => "Pluto",
            ChartObjectType::Node => "Node",
        };
        write!(f, "{}", name)
    }
}

/// Ecliptic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EclipticPosition {
    /// Longitude, degrees
    pub lambda: f64,
    /// Latitude, degrees
    #[serde(default)]
    pub beta: f64,
    /// Distance, AU
    #[serde(default)]
    pub delta: f64,
}

impl EclipticPosition {
    pub fn from_longitude(lambda: f64) -> Self {
        Self {
            lambda,
            ..Default::default()
        }
    }
}

/// Object position in a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChartObjectInfo {
    #[serde(rename = "type")]
    pub object_type: ChartObjectType,
    pub position: EclipticPosition,
    /// Daily motion in longitude, degrees
    #[serde(default)]
    pub daily_motion: f64,
    /// Zero-based index of the occupied house
    #[serde(default)]
    pub house: usize,
}

impl ChartObjectInfo {
    pub fn new(object_type: ChartObjectType, position: EclipticPosition) -> Self {
        Self {
            object_type,
            position,
            daily_motion: 0.0,
            house: 0,
        }
    }

    /// Shorthand for an object known only by its longitude
    pub fn at_longitude(object_type: ChartObjectType, lambda: f64) -> Self {
        Self::new(object_type, EclipticPosition::from_longitude(lambda))
    }

    pub fn longitude(&self) -> f64 {
        self.position.lambda
    }

    pub fn is_retrograde(&self) -> bool {
        self.daily_motion < 0.0
    }

    pub fn zodiac_position(&self) -> ZodiacPosition {
        ZodiacPosition::from_longitude(self.position.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZodiacSign;

    #[test]
    fn test_objects_order() {
        let mut objects = ChartObjectType::all().to_vec();
        objects.sort();
        assert_eq!(objects, ChartObjectType::all());
        assert_eq!(objects.first(), Some(&ChartObjectType::Moon));
        assert_eq!(objects.last(), Some(&ChartObjectType::Node));
    }

    #[test]
    fn test_node_id_follows_setting() {
        assert_eq!(ChartObjectType::Node.swe_id(true), 11);
        assert_eq!(ChartObjectType::Node.swe_id(false), 10);
        assert_eq!(ChartObjectType::Moon.swe_id(false), 1);
    }

    #[test]
    fn test_object_info_defaults() {
        let info = ChartObjectInfo::at_longitude(ChartObjectType::Mars, 177.9662);
        assert_eq!(info.house, 0);
        assert!(!info.is_retrograde());
        assert_eq!(info.zodiac_position().sign, ZodiacSign::Virgo);
    }

    #[test]
    fn test_object_info_deserializes_with_defaults() {
        let info: ChartObjectInfo =
            serde_json::from_str(r#"{"type": "sun", "position": {"lambda": 312.0}}"#).unwrap();
        assert_eq!(info.object_type, ChartObjectType::Sun);
        assert_eq!(info.position.lambda, 312.0);
        assert_eq!(info.daily_motion, 0.0);
    }
}
