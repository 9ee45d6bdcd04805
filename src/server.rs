//! HTTP surface of the proxy
//!
//! Every handler answers JSON. Validation failures come back as 400 and
//! timetable API failures as 502, both with an `{"error": "..."}` body.
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::schedule::{
    date_range::{local_today, month_date_range, period_options, DateRange},
    error::ScheduleError,
    helpers::{get_blocks, get_room_lessons, get_teacher_lessons, group_by_date, room_export_url},
    models::{
        lesson_model::ClassifiedLesson,
        room_model::{Block, PeriodOption, RoomScheduleResponse},
        teacher_load_model::{TeacherLoadResponse, TeacherScheduleResponse},
        Config,
    },
    schedule_getter::ScheduleGetter,
    teacher_load::summarize_teacher_load,
};

/// Shared by all handlers. Nothing in here changes after startup.
pub struct AppState<SG> {
    pub schedule_getter: Arc<SG>,
    pub config: Arc<Config>,
    /// Source of "today" for month and period resolution.
    pub today: fn() -> NaiveDate,
}

impl<SG> AppState<SG> {
    pub fn new(schedule_getter: SG, config: Config) -> Self {
        Self {
            schedule_getter: Arc::new(schedule_getter),
            config: Arc::new(config),
            today: local_today,
        }
    }
}

impl<SG> Clone for AppState<SG> {
    fn clone(&self) -> Self {
        Self {
            schedule_getter: Arc::clone(&self.schedule_getter),
            config: Arc::clone(&self.config),
            today: self.today,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Schedule(ScheduleError::InvalidMonth(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Schedule(_) => {
                error!("Request failed: {}", self);
                StatusCode::BAD_GATEWAY
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_owned())
}

/* unparsable query strings get the same JSON error body as failed validation */
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherLoadParams {
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<i64>,
    pub month: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherScheduleParams {
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<i64>,
    #[serde(rename = "monthId")]
    pub month_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RoomScheduleParams {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn validate_teacher(teacher_id: Option<i64>) -> Result<i64, ApiError> {
    match teacher_id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(bad_request("Teacher ID must be a positive number")),
    }
}

fn validate_month(month: Option<i64>, message: &str) -> Result<u32, ApiError> {
    month
        .filter(|month| (1..=12).contains(month))
        .and_then(|month| u32::try_from(month).ok())
        .ok_or_else(|| bad_request(message))
}

/// GET /api/schedule/proxy?q=...
///
/// Hands `q` to the timetable API untouched and returns its body as is.
pub async fn proxy<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
    query: Result<Query<ProxyParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| bad_request("Query parameter 'q' is required"))?;
    let body = state.schedule_getter.fetch(query).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /api/schedule/teacher-load?teacherId=..&month=..
pub async fn teacher_load<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
    query: Result<Query<TeacherLoadParams>, QueryRejection>,
) -> Result<Json<TeacherLoadResponse>, ApiError> {
    let params = query_params(query)?;
    let teacher_id = validate_teacher(params.teacher_id)?;
    let month_id = validate_month(params.month, "Month must be between 1 and 12")?;
    info!("Teacher load for {} in month {}", teacher_id, month_id);

    let range = month_date_range(month_id, (state.today)())?;
    let lessons = get_teacher_lessons(state.schedule_getter.as_ref(), teacher_id, &range).await?;

    Ok(Json(TeacherLoadResponse {
        teacher_id,
        month_id,
        summary: summarize_teacher_load(&lessons),
    }))
}

/// GET /api/schedule/teacher-schedule?teacherId=..&monthId=..
pub async fn teacher_schedule<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
    query: Result<Query<TeacherScheduleParams>, QueryRejection>,
) -> Result<Json<TeacherScheduleResponse>, ApiError> {
    let params = query_params(query)?;
    let teacher_id = validate_teacher(params.teacher_id)?;
    let month_id = validate_month(params.month_id, "Month ID must be between 1 and 12")?;

    let range = month_date_range(month_id, (state.today)())?;
    let lessons = get_teacher_lessons(state.schedule_getter.as_ref(), teacher_id, &range).await?;

    Ok(Json(TeacherScheduleResponse {
        teacher_id,
        month_id,
        lessons_count: lessons.len(),
        lessons: lessons.into_iter().map(ClassifiedLesson::from).collect(),
    }))
}

/// GET /api/schedule/blocks
pub async fn blocks<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
) -> Result<Json<Vec<Block>>, ApiError> {
    Ok(Json(get_blocks(state.schedule_getter.as_ref()).await?))
}

/// GET /api/schedule/room?roomId=..&from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn room_schedule<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
    query: Result<Query<RoomScheduleParams>, QueryRejection>,
) -> Result<Json<RoomScheduleResponse>, ApiError> {
    let params = query_params(query)?;
    let room_id = params
        .room_id
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| bad_request("Room ID is required"))?;
    let (Some(begin), Some(end)) = (params.from, params.to) else {
        return Err(bad_request("Both 'from' and 'to' dates are required"));
    };
    if begin > end {
        return Err(bad_request("'from' must not be after 'to'"));
    }

    let range = DateRange { begin, end };
    let lessons = get_room_lessons(state.schedule_getter.as_ref(), &room_id, &range).await?;

    Ok(Json(RoomScheduleResponse {
        export_url: room_export_url(&state.config.upstream_url, &room_id, &range),
        room_id,
        days: group_by_date(lessons),
    }))
}

/// GET /api/schedule/periods
pub async fn periods<SG: ScheduleGetter>(
    State(state): State<AppState<SG>>,
) -> Json<Vec<PeriodOption>> {
    Json(period_options((state.today)()))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build application router
///
/// With `static_dir` configured, every path not matched by the API is served
/// from that directory, falling back to its `index.html`.
pub fn build_router<SG: ScheduleGetter>(state: AppState<SG>) -> Router {
    let mut router = Router::new()
        .route("/api/schedule/proxy", get(proxy::<SG>))
        .route("/api/schedule/teacher-load", get(teacher_load::<SG>))
        .route("/api/schedule/teacher-schedule", get(teacher_schedule::<SG>))
        .route("/api/schedule/blocks", get(blocks::<SG>))
        .route("/api/schedule/room", get(room_schedule::<SG>))
        .route("/api/schedule/periods", get(periods::<SG>))
        .route("/health", get(health_check));

    if let Some(static_dir) = &state.config.static_dir {
        info!("Serving static files from {}", static_dir.display());
        let index = ServeFile::new(static_dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    router.with_state(state).layer(CorsLayer::permissive())
}
