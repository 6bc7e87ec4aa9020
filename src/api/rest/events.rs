//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{run_blocking, ApiError, ApiResponse};
use crate::api::state::AppState;
use crate::types::{CreateEventRequest, Event, EventFilter, EventType};
use crate::utils::now;
use crate::validation::{validate_event, validate_filter, ValidationError};

/// Query parameters for listing events
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    pub user_id: Option<String>,
    pub event_type: Option<String>,
    pub start_timestamp: Option<DateTime<Utc>>,
    pub end_timestamp: Option<DateTime<Utc>>,
}

impl ListEventsParams {
    /// Build a validated filter
    pub fn into_filter(self) -> Result<EventFilter, ValidationError> {
        let event_type = match self.event_type {
            Some(raw) => Some(
                raw.parse::<EventType>()
                    .map_err(|_| ValidationError::InvalidEventType(raw))?,
            ),
            None => None,
        };

        let filter = EventFilter {
            user_id: self.user_id,
            event_type,
            start: self.start_timestamp,
            end: self.end_timestamp,
        };
        validate_filter(&filter)?;
        Ok(filter)
    }
}

/// POST /events - Ingest one event.
///
/// The server stamps the timestamp; a client-supplied one is ignored.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(mut request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let stamped = now();
    request.timestamp = Some(stamped);

    let event = validate_event(request, stamped)?;
    let ingested = state.service.ingest(event, None);

    Ok((StatusCode::CREATED, Json(Event::clone(&ingested.event))))
}

/// GET /events - List matching events, oldest first
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListEventsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.into_filter()?;
    let service = state.service.clone();
    let cancel = state.shutdown.clone();
    let events: Vec<Event> = run_blocking(move || service.list_events(&filter, &cancel))
        .await?
        .iter()
        .map(|e| Event::clone(e))
        .collect();

    let total = events.len();
    Ok(Json(ApiResponse::with_total(events, total)))
}

/// GET /events/:id - Get a single event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.service.get_event(&id, &state.shutdown)?;
    Ok(Json(Event::clone(&event)))
}

/// DELETE /events/:id - Idempotent delete
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.service.delete_event(&id);
    StatusCode::NO_CONTENT
}

/// DELETE /events - Remove every stored event
pub async fn clear_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let removed = state.service.clear_events();
    Json(json!({ "removed": removed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_params_into_filter() {
        let params = ListEventsParams {
            user_id: Some("u1".to_string()),
            event_type: Some("click".to_string()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert_eq!(filter.user_id.as_deref(), Some("u1"));
        assert_eq!(filter.event_type, Some(EventType::Click));
    }

    #[test]
    fn test_params_reject_unknown_type() {
        let params = ListEventsParams {
            event_type: Some("scroll".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.into_filter(),
            Err(ValidationError::InvalidEventType("scroll".to_string()))
        );
    }

    #[test]
    fn test_params_reject_inverted_range() {
        let params = ListEventsParams {
            start_timestamp: Some(Utc.with_ymd_and_hms(2025, 5, 26, 15, 0, 0).unwrap()),
            end_timestamp: Some(Utc.with_ymd_and_hms(2025, 5, 26, 14, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(params.into_filter(), Err(ValidationError::FilterConflict));
    }
}
