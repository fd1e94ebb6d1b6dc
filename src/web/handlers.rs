//! HTTP request handlers.

use super::AppState;
use crate::registry::{HostInput, RegistryError};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

// ============================================================================
// Errors
// ============================================================================

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn registry_error_response(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
        RegistryError::DuplicateKey(_) => StatusCode::CONFLICT,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::Parse(_) | RegistryError::Io(_) => {
            tracing::error!("Registry access failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.to_string())
}

fn bad_json_response(rejection: JsonRejection) -> Response {
    tracing::debug!("Rejected request body: {}", rejection);
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

// ============================================================================
// API: Status
// ============================================================================

pub async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.status.aggregate() {
        Ok(report) => Json(report).into_response(),
        Err(e) => registry_error_response(e),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub config_file: bool,
    pub hosts_count: usize,
}

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let hosts = match state.hosts.list() {
        Ok(hosts) => hosts,
        Err(e) => return registry_error_response(e),
    };

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        config_file: state.hosts.store().exists(),
        hosts_count: hosts.len(),
    })
    .into_response()
}

// ============================================================================
// API: Hosts
// ============================================================================

pub async fn handle_get_hosts(State(state): State<AppState>) -> impl IntoResponse {
    match state.hosts.list() {
        Ok(hosts) => Json(hosts).into_response(),
        Err(e) => registry_error_response(e),
    }
}

pub async fn handle_get_host(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> impl IntoResponse {
    match state.hosts.find_by_ip(&ip) {
        Ok(Some(host)) => Json(host).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Host not found"),
        Err(e) => registry_error_response(e),
    }
}

pub async fn handle_create_host(
    State(state): State<AppState>,
    payload: Result<Json<HostInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_json_response(rejection),
    };

    match state.hosts.add(input) {
        Ok(host) => (StatusCode::CREATED, Json(host)).into_response(),
        Err(e) => registry_error_response(e),
    }
}

pub async fn handle_update_host(
    State(state): State<AppState>,
    Path(ip): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_json_response(rejection),
    };

    // Emptiness is judged on the body as sent, so unknown or null keys still count.
    match body.as_object() {
        Some(fields) if !fields.is_empty() => {}
        _ => return error_response(StatusCode::BAD_REQUEST, "No data provided"),
    }
    let input: HostInput = match serde_json::from_value(body) {
        Ok(input) => input,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.hosts.update(&ip, input) {
        Ok(host) => Json(host).into_response(),
        Err(e) => registry_error_response(e),
    }
}

pub async fn handle_delete_host(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> impl IntoResponse {
    match state.hosts.delete(&ip) {
        Ok(true) => Json(json!({ "success": true })).into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Host not found"),
        Err(e) => registry_error_response(e),
    }
}
