use serde::Serialize;

use crate::models::{AlertRecord, ForecastPeriod};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData {
    Forecast(Vec<ForecastPeriod>),
    Alerts(Vec<AlertRecord>),
    /// Explanatory text, used when nothing was found
    Message(String),
}

/// Exactly one of `data` and `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    success: bool,
    data: Option<EnvelopeData>,
    error: Option<String>,
}

impl ResponseEnvelope {
    pub fn ok(data: EnvelopeData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&EnvelopeData> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
