use crate::metrics::{QUERIES_TOTAL, QUERY_MATCHED_ROWS, QUERY_SECONDS, UPLOAD_VALIDATIONS_TOTAL};
use axum::http::StatusCode;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use offenseboard_core::{
    AccountStatus, ConsoleError, Driver, FilterSpec, LicenseStatus, Offense, OffenseStatus,
    QueryEngine, Record, Role, Severity, Tone, UploadCandidate, User,
};
use offenseboard_storage::RecordSource;
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/offenses/query", post(query_offenses))
        .route("/v1/offenses/:id", get(get_offense))
        .route("/v1/users/query", post(query_users))
        .route("/v1/drivers/query", post(query_drivers))
        .route("/v1/filters/reset/:entity", get(reset_filters))
        .route("/v1/labels", get(labels))
        .route("/v1/uploads/validate", post(validate_upload))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn error_response(e: ConsoleError) -> Response {
    let status = match &e {
        ConsoleError::NotFound(_) => StatusCode::NOT_FOUND,
        ConsoleError::Invalid(_) => StatusCode::BAD_REQUEST,
        ConsoleError::Upload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ConsoleError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        warn!(error = %e, "request failed");
    }
    let body = match &e {
        ConsoleError::Upload(u) => json!({"error": e.to_string(), "reason": u.reason()}),
        _ => json!({"error": e.to_string()}),
    };
    (status, Json(body)).into_response()
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ConsoleError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| ConsoleError::Invalid(rejection.body_text()))
}

fn run_query<R: Record + Serialize>(
    entity: &'static str,
    fetched: offenseboard_core::Result<Vec<R>>,
    spec: &FilterSpec,
) -> Response {
    let records = match fetched {
        Ok(records) => records,
        Err(e) => return error_response(e),
    };
    let engine = QueryEngine::<R>::new();
    let outcome = engine.run(&records, spec);
    debug!(
        entity,
        total = records.len(),
        matched = outcome.matched,
        "query served"
    );
    QUERIES_TOTAL.with_label_values(&[entity]).inc();
    QUERY_MATCHED_ROWS
        .with_label_values(&[entity])
        .observe(outcome.matched as f64);
    (StatusCode::OK, Json(outcome)).into_response()
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn query_offenses(
    State(app): State<AppState>,
    payload: Result<Json<FilterSpec>, JsonRejection>,
) -> Response {
    let spec = match json_body(payload) {
        Ok(spec) => spec,
        Err(e) => return error_response(e),
    };
    let _timer = QUERY_SECONDS.with_label_values(&["offenses"]).start_timer();
    run_query("offenses", app.source.offenses().await, &spec)
}

async fn query_users(
    State(app): State<AppState>,
    payload: Result<Json<FilterSpec>, JsonRejection>,
) -> Response {
    let spec = match json_body(payload) {
        Ok(spec) => spec,
        Err(e) => return error_response(e),
    };
    let _timer = QUERY_SECONDS.with_label_values(&["users"]).start_timer();
    run_query("users", app.source.users().await, &spec)
}

async fn query_drivers(
    State(app): State<AppState>,
    payload: Result<Json<FilterSpec>, JsonRejection>,
) -> Response {
    let spec = match json_body(payload) {
        Ok(spec) => spec,
        Err(e) => return error_response(e),
    };
    let _timer = QUERY_SECONDS.with_label_values(&["drivers"]).start_timer();
    run_query("drivers", app.source.drivers().await, &spec)
}

async fn get_offense(State(app): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match app.source.offense(&id).await {
        Ok(o) => (StatusCode::OK, Json(o)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn reset_filters(Path(entity): Path<String>) -> impl IntoResponse {
    let spec = match entity.as_str() {
        "offenses" => FilterSpec::reset::<Offense>(),
        "users" => FilterSpec::reset::<User>(),
        "drivers" => FilterSpec::reset::<Driver>(),
        other => return error_response(ConsoleError::NotFound(format!("entity {other}"))),
    };
    (StatusCode::OK, Json(spec)).into_response()
}

fn tones<T>(all: &[T], entry: impl Fn(&T) -> (&'static str, Tone)) -> Value {
    Value::Object(
        all.iter()
            .map(|v| {
                let (label, tone) = entry(v);
                (label.to_string(), json!(tone))
            })
            .collect(),
    )
}

/// Badge tone for every status-like label, keyed by wire spelling.
async fn labels() -> impl IntoResponse {
    Json(json!({
        "offenseStatus": tones(OffenseStatus::ALL, |s| (s.as_str(), s.badge())),
        "severity": tones(Severity::ALL, |s| (s.as_str(), s.badge())),
        "role": tones(Role::ALL, |r| (r.as_str(), r.badge())),
        "accountStatus": tones(AccountStatus::ALL, |s| (s.as_str(), s.badge())),
        "licenseStatus": tones(LicenseStatus::ALL, |s| (s.as_str(), s.badge())),
    }))
}

async fn validate_upload(payload: Result<Json<UploadCandidate>, JsonRejection>) -> Response {
    let candidate = match json_body(payload) {
        Ok(candidate) => candidate,
        Err(e) => return error_response(e),
    };
    match candidate.validate() {
        Ok(()) => {
            UPLOAD_VALIDATIONS_TOTAL
                .with_label_values(&["accepted"])
                .inc();
            (
                StatusCode::OK,
                Json(json!({"accepted": true, "file_name": candidate.file_name})),
            )
                .into_response()
        }
        Err(e) => {
            UPLOAD_VALIDATIONS_TOTAL
                .with_label_values(&[e.reason()])
                .inc();
            debug!(file = %candidate.file_name, reason = e.reason(), "upload rejected");
            error_response(ConsoleError::Upload(e))
        }
    }
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    let _ = encoder.encode(&prometheus::gather(), &mut buf);
    (StatusCode::OK, String::from_utf8(buf).unwrap_or_default())
}
