//! Astrological charts

pub mod radix;

pub use radix::Radix;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::analysis::Orbs;
use crate::ephemeris::{HousesSystem, SensitivePoints};
use crate::models::{AspectInfo, AspectTypes, ChartObjectInfo, ChartObjectType};

/// Aspects of every object to the others, stored symmetrically
pub type AspectsTable = BTreeMap<ChartObjectType, BTreeMap<ChartObjectType, AspectInfo>>;

/// Chart objects keyed by type, in chart order
pub type ObjectsMap = BTreeMap<ChartObjectType, ChartObjectInfo>;

/// Kinds of charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Radix,
    Transits,
    Directions,
    SolarReturn,
    LunarReturn,
    Relocation,
    Synastry,
    Composite,
    Relationship,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartType::Radix => "Radix",
            ChartType::Transits => "Transits",
            ChartType::Directions => "Directions",
            ChartType::SolarReturn => "Solar Return",
            ChartType::LunarReturn => "Lunar Return",
            ChartType::Relocation => "Relocation",
            ChartType::Synastry => "Synastry",
            ChartType::Composite => "Composite",
            ChartType::Relationship => "Relationship",
        };
        write!(f, "{}", name)
    }
}

/// Geographic place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Place {
    pub name: String,
    /// Latitude in degrees, positive northwards
    pub latitude: f64,
    /// Longitude in degrees, positive eastwards
    pub longitude: f64,
}

/// Chart calculation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub houses: HousesSystem,
    pub orbs: Orbs,
    pub aspect_types: AspectTypes,
    /// True rather than mean lunar node
    pub true_node: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            houses: HousesSystem::Placidus,
            orbs: Orbs::default(),
            aspect_types: AspectTypes::MAJOR,
            true_node: true,
        }
    }
}

/// Common interface of all chart kinds
pub trait Chart {
    fn name(&self) -> &str;

    fn chart_type(&self) -> ChartType;

    fn objects(&self) -> &ObjectsMap;

    fn aspects(&self) -> &AspectsTable;

    /// House cusps 1-12, arc-degrees
    fn houses(&self) -> &[f64; 12];

    fn settings(&self) -> &Settings;

    /// Sensitive points, arc-degrees
    fn points(&self) -> &SensitivePoints;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.houses, HousesSystem::Placidus);
        assert_eq!(settings.aspect_types, AspectTypes::MAJOR);
        assert!(settings.true_node);
        assert!(matches!(settings.orbs, Orbs::ClassicWithAspectRatio { .. }));
    }

    #[test]
    fn test_partial_settings_json() {
        let json = r#"{"houses": "koch", "aspect_types": ["major", "minor"]}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.houses, HousesSystem::Koch);
        assert_eq!(settings.aspect_types, AspectTypes::CLASSIC);
        assert!(settings.true_node);
    }
}
