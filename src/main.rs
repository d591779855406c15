use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use weather_mcp_server::config::{Cli, Command};
use weather_mcp_server::dispatcher::Dispatcher;
use weather_mcp_server::logging::init_tracing;
use weather_mcp_server::service::{serve_stdio, WeatherTools};
use weather_mcp_server::upstream::NwsClient;
use weather_mcp_server::http;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.settings.validate()?;
    init_tracing(&cli.settings)?;

    let api = Arc::new(NwsClient::new(&cli.settings)?);
    let dispatcher = Arc::new(Dispatcher::new(api));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => http::serve(&cli.settings, dispatcher).await,
        Command::Stdio => serve_stdio(WeatherTools::new(dispatcher)).await,
    }
}
