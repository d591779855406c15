use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::WeatherError;

// ============================================================================
// National Weather Service API Models
// ============================================================================

/// `GET /points/{lat},{lon}`
#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    pub properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointsProperties {
    /// Absolute URL of the gridpoint forecast; null for points without coverage
    pub forecast: Option<String>,
}

/// Gridpoint forecast resource referenced by [`PointsProperties::forecast`]
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    pub periods: Vec<UpstreamPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPeriod {
    pub name: String,
    /// Whole degrees. A fractional value fails the decode.
    pub temperature: i32,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
}

/// `GET /alerts/active?area={state}`
#[derive(Debug, Deserialize)]
pub struct AlertResponse {
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
pub struct AlertFeature {
    #[serde(default, deserialize_with = "lenient")]
    pub properties: AlertProperties,
}

/// Every field is optional upstream; absent, null or mistyped values become empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct AlertProperties {
    #[serde(default, deserialize_with = "lenient")]
    pub event: String,
    #[serde(default, rename = "areaDesc", deserialize_with = "lenient")]
    pub area_desc: String,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub instruction: String,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

// ============================================================================
// Normalized Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: i32,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
}

impl From<UpstreamPeriod> for ForecastPeriod {
    fn from(period: UpstreamPeriod) -> Self {
        Self {
            name: period.name,
            temperature: period.temperature,
            temperature_unit: period.temperature_unit,
            wind_speed: period.wind_speed,
            wind_direction: period.wind_direction,
            short_forecast: period.short_forecast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertRecord {
    pub event: String,
    pub area: String,
    pub severity: String,
    pub description: String,
    pub instructions: String,
}

impl From<AlertProperties> for AlertRecord {
    fn from(props: AlertProperties) -> Self {
        Self {
            event: props.event,
            area: props.area_desc,
            severity: props.severity,
            description: props.description,
            instructions: props.instruction,
        }
    }
}

// ============================================================================
// Validated Inputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Only finiteness is checked; range errors are left to the upstream.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(WeatherError::validation(format!(
                "coordinates must be finite numbers, got ({latitude}, {longitude})"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Points lookup path. api.weather.gov redirects requests with more than four decimals.
    pub fn points_path(&self) -> String {
        format!("/points/{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Two upper-case ASCII letters, e.g. `CA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        if raw.chars().count() != 2 {
            return Err(WeatherError::validation(format!(
                "state must be a two-letter code, got {raw:?}"
            )));
        }
        if !raw.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(WeatherError::validation(format!(
                "state must be upper-case ASCII letters, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetAlertsRequest {
    /// US state to get alerts for (e.g., 'CA')
    pub state: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetForecastRequest {
    /// Latitude of the location
    pub latitude: f64,
    /// Longitude of the location
    pub longitude: f64,
}
