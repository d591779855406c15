use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServiceExt,
    ErrorData as McpError,
};

use crate::constants::{INTERNAL_ERROR_MESSAGE, SERVICE_NAME};
use crate::dispatcher::Dispatcher;
use crate::envelope::ResponseEnvelope;
use crate::models::{GetAlertsRequest, GetForecastRequest};

/// MCP face of the [`Dispatcher`]; every tool answers with the envelope as JSON text
#[derive(Clone)]
pub struct WeatherTools {
    dispatcher: Arc<Dispatcher>,
    tool_router: ToolRouter<Self>,
}

impl WeatherTools {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }

    fn envelope_result(envelope: &ResponseEnvelope) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string(envelope).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize envelope");
            McpError::internal_error(INTERNAL_ERROR_MESSAGE, None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for WeatherTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVICE_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Forecasts and active alerts from the National Weather Service API. \
                Every tool returns a JSON envelope with `success`, `data` and `error`."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherTools {
    #[tool(description = "Get weather alerts for a US state. Provide a two-letter state code (e.g., 'CA' for California, 'NY' for New York).")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let envelope = self.dispatcher.get_alerts(&request.state).await;
        Self::envelope_result(&envelope)
    }

    #[tool(description = "Get weather forecast for a location. Provide latitude and longitude (e.g., latitude: 39.7456, longitude: -97.0892). Returns up to five forecast periods.")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        let envelope = self
            .dispatcher
            .get_forecast(request.latitude, request.longitude)
            .await;
        Self::envelope_result(&envelope)
    }
}

/// Runs the MCP server on stdin/stdout until the client disconnects
pub async fn serve_stdio(tools: WeatherTools) -> Result<()> {
    tracing::info!("Starting MCP weather server on stdio");

    let server = tools.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
