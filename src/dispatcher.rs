use std::sync::Arc;

use crate::constants::{NO_ALERTS_MESSAGE, NO_PERIODS_MESSAGE};
use crate::envelope::{EnvelopeData, ResponseEnvelope};
use crate::error::WeatherError;
use crate::models::{Coordinate, RegionCode};
use crate::normalizer::{normalize_alerts, normalize_forecast};
use crate::upstream::WeatherApi;

/// Stateless entry point shared by the HTTP and MCP transports
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn WeatherApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> ResponseEnvelope {
        tracing::info!(latitude, longitude, "Getting forecast");

        let result = async {
            let coordinate = Coordinate::new(latitude, longitude)?;
            let periods = normalize_forecast(self.api.as_ref(), coordinate).await?;
            Ok::<_, WeatherError>(if periods.is_empty() {
                EnvelopeData::Message(NO_PERIODS_MESSAGE.to_string())
            } else {
                EnvelopeData::Forecast(periods)
            })
        }
        .await;

        into_envelope("forecast", result)
    }

    pub async fn get_alerts(&self, state: &str) -> ResponseEnvelope {
        tracing::info!(state, "Getting alerts");

        let result = async {
            let region = RegionCode::parse(state)?;
            let alerts = normalize_alerts(self.api.as_ref(), &region).await?;
            Ok::<_, WeatherError>(if alerts.is_empty() {
                EnvelopeData::Message(NO_ALERTS_MESSAGE.to_string())
            } else {
                EnvelopeData::Alerts(alerts)
            })
        }
        .await;

        into_envelope("alerts", result)
    }
}

fn into_envelope(verb: &str, result: Result<EnvelopeData, WeatherError>) -> ResponseEnvelope {
    match result {
        Ok(data) => ResponseEnvelope::ok(data),
        Err(err) => {
            match &err {
                WeatherError::Internal(detail) => {
                    tracing::error!(verb, %detail, "Internal failure while handling request");
                }
                WeatherError::Validation(_) => tracing::info!(verb, error = %err, "Rejected request"),
                _ => tracing::warn!(verb, status = ?err.status(), error = %err, "Request failed"),
            }
            ResponseEnvelope::failure(err.client_message())
        }
    }
}
