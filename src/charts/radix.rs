//! Birth chart

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AspectsTable, Chart, ChartType, ObjectsMap, Place, Settings};
use crate::analysis::{find_closest_aspect, stelliums};
use crate::ephemeris::{
    calc_obliquity, calc_object_position, cusps_for, in_house, sidereal_time, SensitivePoints,
    DJD_EPOCH,
};
use crate::error::Result;
use crate::models::{AspectInfo, ChartObjectInfo, ChartObjectType};

/// Birth chart, calculated in full on construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Radix {
    name: String,
    /// Julian Day (UT) of birth
    julian_day: f64,
    place: Place,
    settings: Settings,
    /// Local sidereal time, hours
    sidereal_time: f64,
    /// True obliquity of the ecliptic, degrees
    obliquity: f64,
    points: SensitivePoints,
    houses: [f64; 12],
    objects: ObjectsMap,
    aspects: AspectsTable,
}

impl Radix {
    pub fn new(
        name: impl Into<String>,
        julian_day: f64,
        place: Place,
        settings: Settings,
    ) -> Result<Self> {
        let name = name.into();
        let lst = sidereal_time(julian_day, place.longitude);
        let obliquity = calc_obliquity(julian_day)?;

        let ramc = (lst * 15.0).to_radians();
        let eps = obliquity.to_radians();
        let theta = place.latitude.to_radians();

        let points = SensitivePoints::calculate(ramc, eps, theta);
        let houses = cusps_for(
            settings.houses,
            ramc,
            eps,
            theta,
            Some(points.asc.to_radians()),
            Some(points.mc.to_radians()),
        )?;

        let mut objects = ObjectsMap::new();
        for object_type in ChartObjectType::all() {
            let pos = calc_object_position(*object_type, julian_day, settings.true_node)?;
            objects.insert(
                *object_type,
                ChartObjectInfo {
                    object_type: *object_type,
                    position: pos.to_ecliptic_position(),
                    daily_motion: pos.speed_longitude,
                    house: in_house(pos.longitude, &houses),
                },
            );
        }

        let aspects = calculate_aspects(&objects, &settings);

        tracing::debug!(
            chart = %name,
            julian_day,
            houses = %settings.houses,
            aspects = aspects.len(),
            "radix calculated"
        );

        Ok(Self {
            name,
            julian_day,
            place,
            settings,
            sidereal_time: lst,
            obliquity,
            points,
            houses,
            objects,
            aspects,
        })
    }

    /// Date and time of birth as a Julian Day (UT)
    pub fn julian_day(&self) -> f64 {
        self.julian_day
    }

    /// Days since 1900 January 0.5
    pub fn djd(&self) -> f64 {
        self.julian_day - DJD_EPOCH
    }

    /// Birth place
    pub fn place(&self) -> &Place {
        &self.place
    }

    /// Local sidereal time, hours
    pub fn sidereal_time(&self) -> f64 {
        self.sidereal_time
    }

    /// True obliquity of the ecliptic, degrees
    pub fn obliquity(&self) -> f64 {
        self.obliquity
    }

    pub fn object(&self, object_type: ChartObjectType) -> Option<&ChartObjectInfo> {
        self.objects.get(&object_type)
    }

    pub fn aspect_between(&self, a: ChartObjectType, b: ChartObjectType) -> Option<&AspectInfo> {
        self.aspects.get(&a).and_then(|row| row.get(&b))
    }

    /// Groups of objects no more than `gap` degrees apart
    pub fn stelliums(&self, gap: f64) -> Vec<Vec<ChartObjectInfo>> {
        let objects: Vec<ChartObjectInfo> = self.objects.values().cloned().collect();
        stelliums(&objects, gap)
    }
}

impl Chart for Radix {
    fn name(&self) -> &str {
        &self.name
    }

    fn chart_type(&self) -> ChartType {
        ChartType::Radix
    }

    fn objects(&self) -> &ObjectsMap {
        &self.objects
    }

    fn aspects(&self) -> &AspectsTable {
        &self.aspects
    }

    fn houses(&self) -> &[f64; 12] {
        &self.houses
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn points(&self) -> &SensitivePoints {
        &self.points
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Closest aspect for every unordered pair of objects
fn calculate_aspects(objects: &ObjectsMap, settings: &Settings) -> AspectsTable {
    let mut aspects = AspectsTable::new();
    let list: Vec<&ChartObjectInfo> = objects.values().collect();

    for (i, src) in list.iter().enumerate() {
        for dst in &list[i + 1..] {
            let found = find_closest_aspect(src, dst, &settings.orbs, settings.aspect_types);
            if let Some(info) = found {
                aspects
                    .entry(src.object_type)
                    .or_default()
                    .insert(dst.object_type, info);
                aspects
                    .entry(dst.object_type)
                    .or_default()
                    .insert(src.object_type, info);
            }
        }
    }

    aspects
}
