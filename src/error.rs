use thiserror::Error;

use crate::constants::INTERNAL_ERROR_MESSAGE;

/// Failure raised anywhere between input validation and envelope construction.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Caller input rejected before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport failure, timeout or non-success status from the upstream API
    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Upstream payload did not have the expected shape
    #[error("Unexpected upstream payload: {0}")]
    Normalization(String),

    /// Defect inside this service
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WeatherError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn normalization<S: Into<String>>(message: S) -> Self {
        Self::Normalization(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Message safe to hand back to callers. Internal details stay in the logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            WeatherError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Upstream HTTP status, when the failure carried one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}
