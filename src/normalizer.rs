use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::constants::FORECAST_PERIOD_LIMIT;
use crate::error::WeatherError;
use crate::models::{
    AlertRecord, AlertResponse, Coordinate, ForecastPeriod, ForecastResponse, PointsResponse,
    RegionCode,
};
use crate::upstream::WeatherApi;

/// Points lookup followed by the forecast it references. Either step failing
/// fails the whole call.
pub async fn normalize_forecast(
    api: &dyn WeatherApi,
    coordinate: Coordinate,
) -> Result<Vec<ForecastPeriod>, WeatherError> {
    let points = api.fetch(&coordinate.points_path(), &[]).await?;
    let reference = forecast_reference(points)?;

    let forecast = api.fetch(&reference, &[]).await?;
    decode_forecast(forecast)
}

pub async fn normalize_alerts(
    api: &dyn WeatherApi,
    region: &RegionCode,
) -> Result<Vec<AlertRecord>, WeatherError> {
    let raw = api
        .fetch("/alerts/active", &[("area", region.as_str())])
        .await?;
    decode_alerts(raw)
}

/// URL of the forecast resource named by a points payload
pub fn forecast_reference(raw: Value) -> Result<String, WeatherError> {
    let points: PointsResponse = decode(raw, "point metadata")?;
    match points.properties.forecast {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(WeatherError::normalization(
            "point metadata has no forecast resource for this location",
        )),
    }
}

/// First [`FORECAST_PERIOD_LIMIT`] periods, in upstream order
pub fn decode_forecast(raw: Value) -> Result<Vec<ForecastPeriod>, WeatherError> {
    let forecast: ForecastResponse = decode(raw, "forecast")?;
    Ok(forecast
        .properties
        .periods
        .into_iter()
        .take(FORECAST_PERIOD_LIMIT)
        .map(ForecastPeriod::from)
        .collect())
}

pub fn decode_alerts(raw: Value) -> Result<Vec<AlertRecord>, WeatherError> {
    let alerts: AlertResponse = decode(raw, "alerts")?;
    Ok(alerts
        .features
        .into_iter()
        .map(|feature| AlertRecord::from(feature.properties))
        .collect())
}

fn decode<T: DeserializeOwned>(raw: Value, what: &str) -> Result<T, WeatherError> {
    serde_json::from_value(raw).map_err(|e| WeatherError::normalization(format!("{what}: {e}")))
}
