/// Default user agent sent to the upstream API (api.weather.gov rejects anonymous clients)
pub const USER_AGENT: &str = "WeatherMCP/0.1.0";

/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Media type requested from the upstream API
pub const GEO_JSON: &str = "application/geo+json";

/// Default bound on a single outbound call, in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Maximum number of forecast periods returned to callers
pub const FORECAST_PERIOD_LIMIT: usize = 5;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "weather-mcp-server";

pub const NO_ALERTS_MESSAGE: &str = "No active alerts for this state.";

pub const NO_PERIODS_MESSAGE: &str = "No forecast periods available for this location.";

/// Message returned in place of internal failure details
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub const FORECAST_TOOL_DESCRIPTION: &str = "Get weather forecast for a location";

pub const ALERTS_TOOL_DESCRIPTION: &str = "Get weather alerts for a US state";
