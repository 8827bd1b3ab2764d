// src/handlers/history.rs
use log::{error, info};
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::models::HistoryEntry;
use crate::routes::AppState;

pub const MAX_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

pub async fn get_history(query: HistoryQuery, state: AppState) -> Result<Json, Rejection> {
    let limit = query
        .limit
        .unwrap_or(state.history_limit)
        .clamp(1, MAX_HISTORY_LIMIT);
    info!("Handling request to get the last {} conversions", limit);

    let records = state.db.recent_conversions(limit).await.map_err(|e| {
        error!("Failed to read conversion history: {}", e);
        warp::reject::custom(ApiError::internal("Could not read conversion history."))
    })?;

    let entries: Vec<HistoryEntry> = records.into_iter().map(HistoryEntry::from).collect();
    Ok(warp::reply::json(&entries))
}
