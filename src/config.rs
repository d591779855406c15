use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::constants::{DEFAULT_UPSTREAM_TIMEOUT_SECS, NWS_API_BASE, USER_AGENT};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Parser)]
#[command(
    name = "weather-mcp-server",
    version,
    about = "Forecast and alert envelopes over the National Weather Service API"
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Serve the same tools as an MCP server over stdio
    Stdio,
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Address to bind the HTTP server to
    #[arg(long, env = "MCP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "MCP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Raise the default log level to debug
    #[arg(long, env = "MCP_DEBUG")]
    pub debug: bool,

    /// Base URL of the upstream weather API
    #[arg(long, env = "MCP_WEATHER_API_BASE_URL", default_value = NWS_API_BASE)]
    pub weather_api_base_url: String,

    /// User-Agent sent upstream; api.weather.gov asks for contact details here
    #[arg(long, env = "MCP_USER_AGENT", default_value = USER_AGENT)]
    pub user_agent: String,

    /// error, warn, info, debug or trace. RUST_LOG takes precedence.
    #[arg(long, env = "MCP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also append logs to this file
    #[arg(long, env = "MCP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Comma separated CORS origins; `*` allows any
    #[arg(long, env = "MCP_ALLOW_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub allow_origins: Vec<String>,

    /// Bound on each outbound call, in seconds
    #[arg(long, env = "MCP_UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            weather_api_base_url: NWS_API_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            log_level: "info".to_string(),
            log_file: None,
            allow_origins: vec!["*".to_string()],
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.upstream_timeout_secs == 0 || self.upstream_timeout_secs > 300 {
            bail!(
                "Upstream timeout must be between 1 and 300 seconds, got {}",
                self.upstream_timeout_secs
            );
        }

        if !self.weather_api_base_url.starts_with("http://")
            && !self.weather_api_base_url.starts_with("https://")
        {
            bail!(
                "Weather API base URL must be an HTTP or HTTPS URL, got '{}'",
                self.weather_api_base_url
            );
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.user_agent.trim().is_empty() {
            bail!("User agent cannot be empty; the upstream API requires one");
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured level, lifted to `debug` when the debug flag is set
    pub fn effective_log_level(&self) -> String {
        let level = self.log_level.to_lowercase();
        if self.debug && matches!(level.as_str(), "error" | "warn" | "info") {
            "debug".to_string()
        } else {
            level
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.weather_api_base_url.trim_end_matches('/')
    }
}
