use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::Settings;
use crate::constants::{
    ALERTS_TOOL_DESCRIPTION, FORECAST_TOOL_DESCRIPTION, INTERNAL_ERROR_MESSAGE, SERVICE_NAME,
};
use crate::dispatcher::Dispatcher;
use crate::envelope::ResponseEnvelope;
use crate::error::WeatherError;
use crate::models::{GetAlertsRequest, GetForecastRequest};
use crate::prompts::{self, PromptRequest, PromptResponse, PROMPT_TEMPLATES};

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// Routes without CORS; see [`app`] for the served stack
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/forecast", post(forecast))
        .route("/alerts", post(alerts))
        .route("/health", get(health_check))
        .route("/tools", get(tools))
        .route("/prompts", get(list_prompts))
        .route("/prompts/get", post(get_prompt))
        .route("/prompts/categories", get(prompt_categories))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(AppState { dispatcher })
}

pub fn app(settings: &Settings, dispatcher: Arc<Dispatcher>) -> Result<Router> {
    Ok(router(dispatcher).layer(cors_layer(&settings.allow_origins)?))
}

pub async fn serve(settings: &Settings, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let app = app(settings, dispatcher)?;

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        debug = settings.debug,
        upstream = %settings.base_url(),
        "Starting Weather MCP Server on http://{addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(AnyOrigin).allow_headers(AnyOrigin);
    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return Ok(cors.allow_origin(AnyOrigin));
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o.trim()).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(cors.allow_origin(origins))
}

/// POST /forecast
async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<GetForecastRequest>, JsonRejection>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    match payload {
        Ok(Json(request)) => {
            let envelope = state
                .dispatcher
                .get_forecast(request.latitude, request.longitude)
                .await;
            (StatusCode::OK, Json(envelope))
        }
        Err(rejection) => rejected(rejection),
    }
}

/// POST /alerts
async fn alerts(
    State(state): State<AppState>,
    payload: Result<Json<GetAlertsRequest>, JsonRejection>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    match payload {
        Ok(Json(request)) => {
            let envelope = state.dispatcher.get_alerts(&request.state).await;
            (StatusCode::OK, Json(envelope))
        }
        Err(rejection) => rejected(rejection),
    }
}

fn rejected(rejection: JsonRejection) -> (StatusCode, Json<ResponseEnvelope>) {
    let err = WeatherError::validation(rejection.body_text());
    tracing::info!(status = %rejection.status(), error = %err, "Rejected request body");
    (
        rejection.status(),
        Json(ResponseEnvelope::failure(err.client_message())),
    )
}

/// GET /health. Never touches the upstream.
async fn health_check() -> Json<Value> {
    Json(json!({"status": "healthy", "service": SERVICE_NAME}))
}

/// GET /tools
async fn tools() -> Json<Value> {
    Json(tool_catalogue())
}

pub fn tool_catalogue() -> Value {
    json!({
        "tools": [
            {
                "name": "get_forecast",
                "description": FORECAST_TOOL_DESCRIPTION,
                "parameters": schemars::schema_for!(GetForecastRequest),
            },
            {
                "name": "get_alerts",
                "description": ALERTS_TOOL_DESCRIPTION,
                "parameters": schemars::schema_for!(GetAlertsRequest),
            },
        ]
    })
}

/// GET /prompts
async fn list_prompts() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {"templates": PROMPT_TEMPLATES, "total": PROMPT_TEMPLATES.len()},
    }))
}

/// POST /prompts/get
async fn get_prompt(payload: Result<Json<PromptRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejected(rejection).into_response(),
    };

    match prompts::lookup(&request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            tracing::info!(name = %request.name, error = %err, "Prompt lookup failed");
            let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(PromptResponse::failure(&err))).into_response()
        }
    }
}

/// GET /prompts/categories
async fn prompt_categories() -> Json<Value> {
    Json(json!({"success": true, "data": prompts::categories()}))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(%detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ResponseEnvelope::failure(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
