use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::calendar::dates::{date_key, parse_date_key};
use crate::calendar::{
    bucket_events, event_stats, events_on, label_events, month_grid, split_upcoming, week_view,
    DEFAULT_UPCOMING_LIMIT,
};
use crate::models::{NewEvent, User};
use crate::state::AppState;
use crate::store::list_events_or_empty;
use crate::utils::error::AppError;
use crate::utils::response::{created, data, empty_success};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub date: String,
    pub time: Option<String>,
    #[serde(alias = "createdBy", default)]
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct BucketQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Response {
    data(list_events_or_empty(state.events.as_ref()).await)
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let created_by: User = req.created_by.parse()?;
    let input = NewEvent::new(
        &req.title,
        req.description.as_deref(),
        &req.date,
        req.time.as_deref(),
        created_by,
    )?;

    let event = state.events.create_event(&input).await?;
    info!(id = event.id, date = %event.date, by = %event.created_by, "Event created");

    Ok(created(event, "Événement créé !"))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.events.delete_event(id).await?;
    info!(id, "Event deleted");
    Ok(empty_success("Événement supprimé"))
}

/// GET /api/events/buckets?date=YYYY-MM-DD
pub async fn event_buckets(
    State(state): State<AppState>,
    Query(query): Query<BucketQuery>,
) -> Result<Response, AppError> {
    let reference = match query.date.as_deref() {
        Some(raw) => parse_date_key(raw)?,
        None => state.today(),
    };
    let events = list_events_or_empty(state.events.as_ref()).await;
    Ok(data(bucket_events(&events, reference)))
}

/// GET /api/events/day/:date
pub async fn events_on_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response, AppError> {
    let day = parse_date_key(&date)?;
    let events = list_events_or_empty(state.events.as_ref()).await;
    let on_day = events_on(&events, &date_key(day))
        .into_iter()
        .cloned()
        .collect();
    Ok(data(label_events(on_day, state.today())))
}

/// GET /api/events/month/:year/:month
pub async fn month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Response, AppError> {
    let events = list_events_or_empty(state.events.as_ref()).await;
    Ok(data(month_grid(&events, year, month, state.today())?))
}

/// GET /api/events/week?offset=n
pub async fn week(State(state): State<AppState>, Query(query): Query<WeekQuery>) -> Response {
    let events = list_events_or_empty(state.events.as_ref()).await;
    data(week_view(&events, state.today(), query.offset.unwrap_or(0)))
}

/// GET /api/events/upcoming?limit=n
pub async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Response {
    let events = list_events_or_empty(state.events.as_ref()).await;
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    data(split_upcoming(&events, state.today(), Some(limit)))
}

/// GET /api/events/stats
pub async fn stats(State(state): State<AppState>) -> Response {
    let events = list_events_or_empty(state.events.as_ref()).await;
    data(event_stats(&events, state.today()))
}
