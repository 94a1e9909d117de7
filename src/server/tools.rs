//! MCP Server tools for astrological calculations

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    schemars::{self, schema_for},
    service::RequestContext,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analysis::{find_closest_aspect, Orbs, DEFAULT_GAP};
use crate::charts::{Chart, Place, Radix, Settings};
use crate::config::Config;
use crate::ephemeris::{
    cusps_for, julian_day_to_datetime, local_datetime_to_julian_day, HousesSystem, SensitivePoint,
    SensitivePoints,
};
use crate::error::{AstrologerError, Result};
use crate::models::{AspectType, AspectTypes, ChartObjectInfo, ChartObjectType, ZodiacPosition};
use crate::storage::Storage;

/// Input for calculating a birth chart
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct CalculateChartInput {
    #[schemars(description = "Name of the chart (usually the person's name)")]
    pub name: String,
    #[schemars(description = "Birth date in YYYY-MM-DD format")]
    pub birth_date: String,
    #[schemars(description = "Birth time in HH:MM or HH:MM:SS format")]
    pub birth_time: String,
    #[schemars(description = "Timezone identifier (e.g., 'Europe/Moscow')")]
    pub timezone: String,
    #[schemars(description = "Birth place name")]
    pub place_name: String,
    #[schemars(description = "Latitude of birth place in degrees, positive northwards")]
    pub latitude: f64,
    #[schemars(description = "Longitude of birth place in degrees, positive eastwards")]
    pub longitude: f64,
    #[schemars(description = "Houses system (default: placidus)")]
    pub house_system: Option<HousesSystem>,
    #[schemars(description = "Orbs method (default: classic_with_aspect_ratio)")]
    pub orbs: Option<Orbs>,
    #[schemars(description = "Aspect categories to search for: major, minor, kepler (default: major)")]
    pub aspect_types: Option<Vec<AspectType>>,
    #[schemars(description = "Use the true lunar node instead of the mean one (default: true)")]
    pub true_node: Option<bool>,
    #[schemars(description = "Save the chart for later use (default: true)")]
    pub store: Option<bool>,
}

/// Input for getting a stored chart
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GetChartInput {
    #[schemars(description = "Name of the chart to retrieve")]
    pub name: String,
}

/// Input for listing stored charts
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ListChartsInput {
    #[schemars(description = "Only list charts whose name contains this text (case-insensitive)")]
    pub query: Option<String>,
}

/// Input for deleting a stored chart
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DeleteChartInput {
    #[schemars(description = "Name of the chart to delete")]
    pub name: String,
}

/// Input for house cusps calculation
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct CalculateHousesInput {
    #[schemars(description = "Right ascension of the meridian in degrees")]
    pub ramc: f64,
    #[schemars(description = "Obliquity of the ecliptic in degrees")]
    pub obliquity: f64,
    #[schemars(description = "Geographic latitude in degrees")]
    pub latitude: f64,
    #[schemars(description = "Houses system (default: placidus)")]
    pub system: Option<HousesSystem>,
}

/// Input for sensitive points calculation
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SensitivePointsInput {
    #[schemars(description = "Right ascension of the meridian in degrees")]
    pub ramc: f64,
    #[schemars(description = "Obliquity of the ecliptic in degrees")]
    pub obliquity: f64,
    #[schemars(description = "Geographic latitude in degrees")]
    pub latitude: f64,
}

/// A chart object at a given position
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ObjectInput {
    #[serde(rename = "type")]
    #[schemars(description = "Object type (sun, moon, mercury, ..., node)")]
    pub object_type: ChartObjectType,
    #[schemars(description = "Ecliptic longitude in degrees")]
    pub longitude: f64,
}

/// Input for finding an aspect between two objects
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct FindAspectInput {
    pub source: ObjectInput,
    pub target: ObjectInput,
    #[schemars(description = "Orbs method (default: classic_with_aspect_ratio)")]
    pub orbs: Option<Orbs>,
    #[schemars(description = "Aspect categories to search for (default: major)")]
    pub aspect_types: Option<Vec<AspectType>>,
}

/// Input for finding stelliums in a stored chart
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct FindStelliumsInput {
    #[schemars(description = "Name of the stored chart")]
    pub name: String,
    #[schemars(description = "Maximal gap between neighbouring objects in degrees (default: 10)")]
    pub gap: Option<f64>,
}

fn schema_to_value<T: schemars::JsonSchema>() -> Arc<serde_json::Map<String, Value>> {
    let schema = schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| AstrologerError::InvalidDate(format!("{}: {}. Expected YYYY-MM-DD", s, e)))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| AstrologerError::InvalidTime(format!("{}: {}. Expected HH:MM[:SS]", s, e)))
}

fn position_json(longitude: f64) -> Value {
    let pos = ZodiacPosition::from_longitude(longitude);
    json!({
        "longitude": pos.longitude,
        "sign": pos.sign,
        "degree": pos.degree,
        "formatted": pos.format_degree_sign(),
    })
}

fn object_json(object: &ChartObjectInfo) -> Value {
    json!({
        "type": object.object_type,
        "name": object.object_type.to_string(),
        "position": position_json(object.longitude()),
        "latitude": object.position.beta,
        "distance": object.position.delta,
        "daily_motion": object.daily_motion,
        "retrograde": object.is_retrograde(),
        "house": object.house + 1,
    })
}

fn points_json(points: &SensitivePoints) -> Value {
    let entries: serde_json::Map<String, Value> = [
        SensitivePoint::Ascendant,
        SensitivePoint::Midheaven,
        SensitivePoint::EastPoint,
        SensitivePoint::Vertex,
    ]
    .iter()
    .map(|p| (p.to_string(), position_json(points.get(*p))))
    .collect();
    Value::Object(entries)
}

fn cusps_json(system: HousesSystem, cusps: &[f64; 12]) -> Value {
    json!({
        "system": system,
        "title": system.to_string(),
        "cusps": cusps.iter().map(|c| position_json(*c)).collect::<Vec<_>>(),
    })
}

fn chart_json(chart: &Radix) -> Value {
    let aspects: Vec<Value> = chart
        .aspects()
        .iter()
        .flat_map(|(a, row)| row.iter().map(move |(b, info)| (*a, *b, info)))
        .filter(|(a, b, _)| a < b)
        .map(|(a, b, info)| {
            json!({
                "source": a,
                "target": b,
                "aspect": info.aspect,
                "title": info.aspect.title(),
                "arc": info.arc,
                "delta": info.delta,
            })
        })
        .collect();

    let mut body = json!({
        "name": chart.name(),
        "chart_type": chart.chart_type(),
        "julian_day": chart.julian_day(),
        "place": chart.place(),
        "settings": chart.settings(),
        "sidereal_time": chart.sidereal_time(),
        "obliquity": chart.obliquity(),
        "points": points_json(chart.points()),
        "houses": cusps_json(chart.settings().houses, chart.houses()),
        "objects": chart.objects().values().map(object_json).collect::<Vec<_>>(),
        "aspects": aspects,
    });
    if let Some(datetime) = julian_day_to_datetime(chart.julian_day()) {
        body["datetime_utc"] = json!(datetime.to_string());
    }
    body
}

/// MCP Server for astrological calculations
#[derive(Clone)]
pub struct AstrologerServer {
    storage: Arc<Storage>,
    defaults: Settings,
}

impl AstrologerServer {
    pub fn new(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.charts_path())?;
        Ok(Self::with_storage(storage, config.defaults))
    }

    pub fn with_storage(storage: Storage, defaults: Settings) -> Self {
        Self {
            storage: Arc::new(storage),
            defaults,
        }
    }

    fn calculate_chart(&self, input: CalculateChartInput) -> Result<Value> {
        let date = parse_date(&input.birth_date)?;
        let time = parse_time(&input.birth_time)?;
        let julian_day = local_datetime_to_julian_day(date, time, &input.timezone)?;

        let settings = Settings {
            houses: input.house_system.unwrap_or(self.defaults.houses),
            orbs: input.orbs.unwrap_or(self.defaults.orbs),
            aspect_types: input
                .aspect_types
                .map(AspectTypes::from)
                .unwrap_or(self.defaults.aspect_types),
            true_node: input.true_node.unwrap_or(self.defaults.true_node),
        };
        let place = Place {
            name: input.place_name,
            latitude: input.latitude,
            longitude: input.longitude,
        };

        let chart = Radix::new(input.name, julian_day, place, settings)?;
        let body = chart_json(&chart);

        let stored = input.store.unwrap_or(true);
        if stored {
            self.storage.save_chart(chart)?;
        }

        Ok(json!({
            "success": true,
            "stored": stored,
            "chart": body,
        }))
    }

    fn get_chart(&self, input: GetChartInput) -> Result<Value> {
        let chart = self.storage.get_chart(&input.name)?;
        Ok(json!({
            "success": true,
            "chart": chart_json(&chart),
        }))
    }

    fn list_charts(&self, input: ListChartsInput) -> Result<Value> {
        let names = match input.query {
            Some(query) => self.storage.search_charts(&query)?,
            None => self.storage.list_charts()?,
        };
        Ok(json!({
            "success": true,
            "count": names.len(),
            "charts": names,
        }))
    }

    fn delete_chart(&self, input: DeleteChartInput) -> Result<Value> {
        if !self.storage.delete_chart(&input.name)? {
            return Err(AstrologerError::ChartNotFound(input.name));
        }
        Ok(json!({
            "success": true,
            "message": format!("Chart '{}' deleted", input.name),
        }))
    }

    fn calculate_houses(&self, input: CalculateHousesInput) -> Result<Value> {
        let system = input.system.unwrap_or(self.defaults.houses);
        let ramc = input.ramc.to_radians();
        let eps = input.obliquity.to_radians();
        let theta = input.latitude.to_radians();

        let points = SensitivePoints::calculate(ramc, eps, theta);
        let cusps = cusps_for(
            system,
            ramc,
            eps,
            theta,
            Some(points.asc.to_radians()),
            Some(points.mc.to_radians()),
        )?;

        Ok(json!({
            "success": true,
            "houses": cusps_json(system, &cusps),
        }))
    }

    fn sensitive_points(&self, input: SensitivePointsInput) -> Result<Value> {
        let points = SensitivePoints::calculate(
            input.ramc.to_radians(),
            input.obliquity.to_radians(),
            input.latitude.to_radians(),
        );
        Ok(json!({
            "success": true,
            "points": points_json(&points),
        }))
    }

    fn find_aspect(&self, input: FindAspectInput) -> Result<Value> {
        let source =
            ChartObjectInfo::at_longitude(input.source.object_type, input.source.longitude);
        let target =
            ChartObjectInfo::at_longitude(input.target.object_type, input.target.longitude);
        let orbs = input.orbs.unwrap_or(self.defaults.orbs);
        let types = input
            .aspect_types
            .map(AspectTypes::from)
            .unwrap_or(self.defaults.aspect_types);

        let aspect = find_closest_aspect(&source, &target, &orbs, types).map(|info| {
            json!({
                "aspect": info.aspect,
                "title": info.aspect.title(),
                "brief": info.aspect.brief(),
                "influence": info.aspect.influence(),
                "arc": info.arc,
                "delta": info.delta,
            })
        });

        Ok(json!({
            "success": true,
            "found": aspect.is_some(),
            "aspect": aspect,
        }))
    }

    fn find_stelliums(&self, input: FindStelliumsInput) -> Result<Value> {
        let chart = self.storage.get_chart(&input.name)?;
        let gap = input.gap.unwrap_or(DEFAULT_GAP);

        let groups: Vec<Value> = chart
            .stelliums(gap)
            .iter()
            .map(|group| {
                json!({
                    "size": group.len(),
                    "objects": group.iter().map(object_json).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({
            "success": true,
            "name": chart.name(),
            "gap": gap,
            "stelliums": groups,
        }))
    }

    fn get_tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "calculate_chart",
                "Calculate a birth chart: planetary positions, houses, sensitive points and aspects. The chart is saved under its name unless store is false.",
                schema_to_value::<CalculateChartInput>(),
            ),
            Tool::new(
                "get_chart",
                "Get a stored chart by name.",
                schema_to_value::<GetChartInput>(),
            ),
            Tool::new(
                "list_charts",
                "List stored charts by name, optionally filtered by a case-insensitive query.",
                schema_to_value::<ListChartsInput>(),
            ),
            Tool::new(
                "delete_chart",
                "Delete a stored chart.",
                schema_to_value::<DeleteChartInput>(),
            ),
            Tool::new(
                "calculate_houses",
                "Calculate house cusps from the right ascension of the meridian, obliquity and latitude.",
                schema_to_value::<CalculateHousesInput>(),
            ),
            Tool::new(
                "sensitive_points",
                "Calculate Ascendant, Midheaven, East Point and Vertex from the right ascension of the meridian, obliquity and latitude.",
                schema_to_value::<SensitivePointsInput>(),
            ),
            Tool::new(
                "find_aspect",
                "Find the closest aspect between two chart objects at given longitudes.",
                schema_to_value::<FindAspectInput>(),
            ),
            Tool::new(
                "find_stelliums",
                "Group the objects of a stored chart into stelliums: runs of objects no more than gap degrees apart.",
                schema_to_value::<FindStelliumsInput>(),
            ),
        ]
    }
}

fn respond(result: Result<Value>) -> String {
    let value = result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Tool call failed");
        json!({
            "success": false,
            "error": e.to_string(),
        })
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn parse_args<T: serde::de::DeserializeOwned>(
    args: Value,
) -> std::result::Result<T, rmcp::ErrorData> {
    serde_json::from_value(args).map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))
}

impl ServerHandler for AstrologerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Astrologer - MCP Server for astrological charts. Calculate a birth chart with \
                 calculate_chart, then inspect it with get_chart or find_stelliums. \
                 calculate_houses, sensitive_points and find_aspect work on raw values."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, rmcp::ErrorData> {
        Ok(ListToolsResult {
            tools: self.get_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, rmcp::ErrorData> {
        let args: Value = Value::Object(request.arguments.clone().unwrap_or_default());
        tracing::debug!(tool = %request.name, "Tool called");

        let result = match request.name.as_ref() {
            "calculate_chart" => self.calculate_chart(parse_args(args)?),
            "get_chart" => self.get_chart(parse_args(args)?),
            "list_charts" => self.list_charts(parse_args(args)?),
            "delete_chart" => self.delete_chart(parse_args(args)?),
            "calculate_houses" => self.calculate_houses(parse_args(args)?),
            "sensitive_points" => self.sensitive_points(parse_args(args)?),
            "find_aspect" => self.find_aspect(parse_args(args)?),
            "find_stelliums" => self.find_stelliums(parse_args(args)?),
            _ => {
                return Err(rmcp::ErrorData::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                ))
            }
        };

        Ok(CallToolResult::success(vec![Content::text(respond(result))]))
    }
}
