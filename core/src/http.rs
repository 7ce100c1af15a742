//! # HTTP Adapter
//!
//! * `GET /`: liveness, fixed plain-text body.
//! * `POST /trigger-report`: `X-API-KEY` header plus a multipart `reportFile` part.
//!
//! Every non-200 answer of the webhook is `{"error": "..."}`.
//!
//! The `reportFile` part is taken whether or not its `Content-Disposition`
//! carries a `filename`. A strict file-upload check would answer 400 for a
//! plain form field; this server accepts it.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{Instrument, debug, info_span, warn};

use informes_common::error::{ErrorClass, ReportError};

use crate::service::{ReportService, Stage};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REPORT_FIELD: &str = "reportFile";
pub const HEALTH_MESSAGE: &str = "API del Dashboard de Informes funcionando correctamente.";
pub const SUCCESS_MESSAGE: &str = "Informe procesado y desplegado con éxito";

#[derive(Clone)]
pub struct AppState {
    service: Arc<ReportService>,
}

impl AppState {
    pub fn new(service: ReportService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/trigger-report", post(trigger_report_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_MESSAGE)
}

async fn trigger_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let span = info_span!("trigger_report");
    async move {
        debug!(stage = ?Stage::Received);
        let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        if let Err(err) = state.service.authorize(api_key) {
            return error_response(&err);
        }

        let upload = match multipart {
            Ok(multipart) => match read_report_field(multipart).await {
                Ok(upload) => upload,
                Err(err) => {
                    warn!("Unreadable multipart body: {err}");
                    let body = Json(json!({ "error": err.body_text() }));
                    return (err.status(), body).into_response();
                }
            },
            Err(rejection) => {
                warn!("Request body is not multipart: {rejection}");
                None
            }
        };

        match state.service.submit(upload).await {
            Ok(_) => (StatusCode::OK, Json(json!({ "message": SUCCESS_MESSAGE }))).into_response(),
            Err(err) => error_response(&err),
        }
    }
    .instrument(span)
    .await
}

/// Returns the bytes of the first `reportFile` part, skipping every other part.
async fn read_report_field(mut multipart: Multipart) -> Result<Option<Vec<u8>>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(REPORT_FIELD) {
            return Ok(Some(field.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}

pub fn error_status(err: &ReportError) -> StatusCode {
    match err.class() {
        ErrorClass::Auth => StatusCode::UNAUTHORIZED,
        ErrorClass::Validation => StatusCode::BAD_REQUEST,
        ErrorClass::Failure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &ReportError) -> Response {
    (error_status(err), Json(json!({ "error": err.to_string() }))).into_response()
}
