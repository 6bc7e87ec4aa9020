//! Analytics endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{run_blocking, ApiError};
use crate::analytics::TimeWindow;
use crate::api::state::AppState;
use crate::types::AnalyticsReport;
use crate::utils::now;

/// Query parameters for analytics
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    /// Window label such as `24h` or `1h30m`
    pub window: Option<String>,
}

/// GET /analytics - Summary over `[now - window, now]`
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let label = params
        .window
        .ok_or_else(|| ApiError::bad_request("window is required"))?;
    let window = TimeWindow::parse(&label)?;

    let service = state.service.clone();
    let cancel = state.shutdown.clone();
    let ending_at = now();
    let report = run_blocking(move || service.analytics(&window, ending_at, &cancel)).await?;
    Ok(Json(report))
}
