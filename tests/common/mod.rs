#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use weather_mcp_server::config::Settings;
use weather_mcp_server::dispatcher::Dispatcher;
use weather_mcp_server::http::router;
use weather_mcp_server::upstream::NwsClient;

/// Alerts for this area are answered after [`SLOW_DELAY`]
pub const SLOW_AREA: &str = "SL";
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    (listener, format!("http://{addr}"))
}

pub fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
}

#[derive(Clone)]
struct FakeState {
    base: String,
    calls: Arc<AtomicUsize>,
}

/// In-process stand-in for api.weather.gov
pub struct FakeUpstream {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let (listener, base_url) = bind().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let state = FakeState {
            base: base_url.clone(),
            calls: calls.clone(),
        };

        let app = Router::new()
            .route("/points/{coords}", get(points))
            .route("/gridpoints/{office}/{grid}/forecast", get(forecast))
            .route("/alerts/active", get(alerts))
            .with_state(state);
        serve(listener, app);

        Self { base_url, calls }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Starts the service against `upstream_base` and returns its base URL
pub async fn spawn_app(upstream_base: &str, timeout_secs: u64) -> String {
    let settings = Settings {
        weather_api_base_url: upstream_base.to_string(),
        upstream_timeout_secs: timeout_secs,
        ..Settings::default()
    };
    let api = Arc::new(NwsClient::new(&settings).expect("client"));
    let dispatcher = Arc::new(Dispatcher::new(api));

    let (listener, base_url) = bind().await;
    serve(listener, router(dispatcher));
    base_url
}

fn problem(status: StatusCode, detail: &str) -> axum::response::Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/problem+json")],
        Json(json!({"title": status.canonical_reason(), "detail": detail, "status": status.as_u16()})),
    )
        .into_response()
}

/// api.weather.gov refuses requests without a User-Agent
fn check_headers(headers: &HeaderMap) -> Option<axum::response::Response> {
    let has_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    let accepts_geo_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/geo+json"));
    if has_agent && accepts_geo_json {
        None
    } else {
        Some(problem(StatusCode::FORBIDDEN, "missing User-Agent or Accept header"))
    }
}

async fn points(
    State(state): State<FakeState>,
    Path(coords): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(rejection) = check_headers(&headers) {
        return rejection;
    }

    let grid = match coords.as_str() {
        "39.7456,-97.0892" => "TOP/31,80",
        "41.0000,-100.0000" => "LBF/1,1",
        "45.0000,-120.0000" => "PDT/9,9",
        _ => return problem(StatusCode::NOT_FOUND, "Unable to provide data for requested point"),
    };

    Json(json!({
        "id": format!("{}/points/{coords}", state.base),
        "type": "Feature",
        "properties": {
            "forecast": format!("{}/gridpoints/{grid}/forecast", state.base),
            "forecastHourly": format!("{}/gridpoints/{grid}/forecast/hourly", state.base),
        }
    }))
    .into_response()
}

async fn forecast(
    State(state): State<FakeState>,
    Path((office, _grid)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(rejection) = check_headers(&headers) {
        return rejection;
    }

    match office.as_str() {
        "TOP" => Json(forecast_fixture(&["This Afternoon", "Tonight", "Friday"])).into_response(),
        "LBF" => Json(forecast_fixture(&[
            "Today", "Tonight", "Monday", "Monday Night", "Tuesday", "Tuesday Night", "Wednesday",
        ]))
        .into_response(),
        _ => problem(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected Problem"),
    }
}

pub fn forecast_fixture(names: &[&str]) -> Value {
    let periods: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "number": i + 1,
                "name": name,
                "startTime": "2026-10-16T14:00:00-05:00",
                "isDaytime": i % 2 == 0,
                "temperature": 70 - 5 * i as i32,
                "temperatureUnit": "F",
                "windSpeed": format!("{} mph", 5 + i),
                "windDirection": "S",
                "shortForecast": "Partly Cloudy",
                "detailedForecast": "Partly cloudy, with a light south wind."
            })
        })
        .collect();
    json!({"type": "Feature", "properties": {"units": "us", "periods": periods}})
}

#[derive(Deserialize)]
struct AlertsQuery {
    area: String,
}

async fn alerts(
    State(state): State<FakeState>,
    Query(query): Query<AlertsQuery>,
    headers: HeaderMap,
) -> axum::response::Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(rejection) = check_headers(&headers) {
        return rejection;
    }

    match query.area.as_str() {
        "XX" => Json(json!({"type": "FeatureCollection", "features": []})).into_response(),
        "KS" => Json(json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {
                    "event": "Tornado Warning",
                    "areaDesc": "Riley, KS",
                    "severity": "Extreme",
                    "description": "A tornado was observed near Manhattan.",
                    "instruction": "Take cover now."
                }},
                {"properties": {
                    "event": "Wind Advisory",
                    "areaDesc": "Geary, KS",
                    "severity": "Minor",
                    "description": "Southwest winds 25 to 35 mph."
                }}
            ]
        }))
        .into_response(),
        "NV" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        SLOW_AREA => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(json!({"features": []})).into_response()
        }
        _ => problem(StatusCode::SERVICE_UNAVAILABLE, "upstream overloaded"),
    }
}
