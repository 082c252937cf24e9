use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{parse_bounded, parse_non_empty};
use crate::contact::ContactSubmission;
use crate::telemetry::{self, log_event, LogLevel, DEFAULT_LOG_LEVEL};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_CONTACT_MAX_BODY_BYTES: usize = 8 * 1024;

const PORT_BOUNDS: (u16, u16) = (1, u16::MAX);
const CONTACT_MAX_BODY_BYTES_BOUNDS: (usize, usize) = (256, 64 * 1024);
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug)]
struct ServerConfig {
    port: u16,
    dist_dir: PathBuf,
    contact_max_body_bytes: usize,
    log_level: LogLevel,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_bounded(lookup("PORT").as_deref(), DEFAULT_PORT, PORT_BOUNDS);
        let dist_dir = parse_non_empty(lookup("DIST_DIR").as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let contact_max_body_bytes = parse_bounded(
            lookup("CONTACT_MAX_BODY_BYTES").as_deref(),
            DEFAULT_CONTACT_MAX_BODY_BYTES,
            CONTACT_MAX_BODY_BYTES_BOUNDS,
        );
        let log_level = lookup("LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            contact_max_body_bytes,
            log_level,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

#[derive(Debug, Serialize)]
struct ContactReply {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    telemetry::set_min_level(config.log_level);

    let bind_address = format!("0.0.0.0:{}", config.port);
    let index = config.dist_dir.join("index.html");
    let static_service = ServeDir::new(&config.dist_dir).not_found_service(ServeFile::new(index));

    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let app = Router::new()
        .route("/api/contact", post(submit_contact))
        .layer(DefaultBodyLimit::max(config.contact_max_body_bytes))
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        LogLevel::Info,
        "server_listening",
        json!({
            "address": bind_address,
            "dist_dir": config.dist_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<ContactSubmission>,
) -> axum::response::Response {
    let request_id = resolve_request_id(&headers);

    if let Err(reason) = submission.validate(state.config.contact_max_body_bytes) {
        log_event(
            LogLevel::Info,
            "contact_submission_rejected",
            json!({
                "request_id": request_id,
                "reason": reason,
                "fields": submission.shape(),
            }),
        );
        return reply(
            StatusCode::BAD_REQUEST,
            ContactReply {
                ok: false,
                error: Some(reason),
            },
            &request_id,
        );
    }

    log_event(
        LogLevel::Info,
        "contact_submission_received",
        json!({
            "request_id": request_id,
            "fields": submission.shape(),
        }),
    );

    reply(
        StatusCode::OK,
        ContactReply {
            ok: true,
            error: None,
        },
        &request_id,
    )
}

fn reply(status: StatusCode, payload: ContactReply, request_id: &str) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(status, headers, Json(payload), request_id)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> axum::response::Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}
