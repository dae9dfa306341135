//! Route handlers for the grade book API.
//!
//! ## Routes
//!
//! - `POST /` — create a record from a JSON body.
//! - `PUT /` — replace the mutable fields of an existing record.
//! - `DELETE /:id` — remove a record; a missing id is a no-op.
//! - `GET /` — full record listing, without the id counter.
//! - `GET /:id` — one record, or an empty body when absent.
//! - `GET /:student/:subject` — plain-text sentence with the grade sum.
//! - `GET /average/:subject/:type` — HTML fragment with the 2-decimal average.
//! - `GET /top3/:subject/:type` — JSON array of up to three values.
//!
//! Every failure — validation, not-found, empty aggregation, storage, body
//! decode, unparsable id — maps to `400` with `{ "error": message }`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gradebook_core::{
    Grade, GradeDraft, GradeId, GradeService, GradeServiceError, GradeUpdate, JsonGradeStore,
};
use log::error;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Shared handle to the grade service, cloned into every handler.
pub type SharedService = Arc<GradeService<JsonGradeStore>>;

/// Builds the axum router over a shared grade service.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", post(create_grade).put(update_grade).get(list_grades))
        .route("/:id", get(get_grade).delete(delete_grade))
        .route("/:student/:subject", get(sum_for_student_subject))
        .route("/average/:subject/:kind", get(average_for_subject_kind))
        .route("/top3/:subject/:kind", get(top3_for_subject_kind))
        .with_state(service)
}

/// Serves the API at the given address (e.g. `"127.0.0.1:3000"`).
pub async fn serve(service: SharedService, addr: &str) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Transport error envelope: every failure becomes `400 { "error": message }`.
struct ApiError(String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<GradeServiceError> for ApiError {
    fn from(err: GradeServiceError) -> Self {
        error!("event=http_error module=server error={err}");
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0 }))).into_response()
    }
}

async fn create_grade(
    State(service): State<SharedService>,
    Json(body): Json<Value>,
) -> Result<Json<Grade>, ApiError> {
    let draft: GradeDraft = decode(body)?;
    Ok(Json(service.create(draft)?))
}

async fn update_grade(
    State(service): State<SharedService>,
    Json(body): Json<Value>,
) -> Result<Json<Grade>, ApiError> {
    let update: GradeUpdate = decode(body)?;
    Ok(Json(service.update(update)?))
}

async fn delete_grade(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    service.delete(id)?;
    Ok(StatusCode::OK)
}

async fn list_grades(State(service): State<SharedService>) -> Result<Json<Value>, ApiError> {
    let grades = service.list()?;
    Ok(Json(json!({ "grades": grades })))
}

async fn get_grade(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    match service.get(id)? {
        Some(grade) => Ok(Json(grade).into_response()),
        // A missing id is an empty success, not a 404.
        None => Ok(StatusCode::OK.into_response()),
    }
}

async fn sum_for_student_subject(
    State(service): State<SharedService>,
    Path((student, subject)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let report = service.sum_for_student_subject(&student, &subject)?;
    Ok(report.to_string())
}

async fn average_for_subject_kind(
    State(service): State<SharedService>,
    Path((subject, kind)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let report = service.average_for_subject_kind(&subject, &kind)?;
    Ok(Html(report.to_string()))
}

async fn top3_for_subject_kind(
    State(service): State<SharedService>,
    Path((subject, kind)): Path<(String, String)>,
) -> Result<Json<Vec<f64>>, ApiError> {
    Ok(Json(service.top3_for_subject_kind(&subject, &kind)?))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))
}

fn parse_id(raw: &str) -> Result<GradeId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid grade id `{raw}`")))
}
