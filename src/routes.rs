// src/routes.rs
use log::{info, warn};
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::body::BodyDeserializeError;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{
    convert::convert, health::health, history::get_history, history::HistoryQuery, index::index,
};
use crate::models::ConversionRequest;
use crate::services::converter::Converter;
use crate::services::db::DbStore;

/// Largest request body accepted by `POST /convertir`.
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<Converter>,
    pub db: Arc<DbStore>,
    pub history_limit: u32,
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        warn!("Malformed request body: {}", e);
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid request body.".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = warp::http::StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Unsupported content type.".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload Too Large".to_string();
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = warp::http::StatusCode::LENGTH_REQUIRED;
        message = "Length Required".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string.".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

/// JSON or url-encoded form body, whichever the client sent.
fn conversion_body() -> impl Filter<Extract = (ConversionRequest,), Error = Rejection> + Clone {
    let json = warp::body::json::<ConversionRequest>();
    let form = warp::body::form::<ConversionRequest>();

    warp::body::content_length_limit(MAX_BODY_BYTES).and(json.or(form).unify())
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let index_route = warp::path::end()
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(index);

    let convert_route = warp::path!("convertir")
        .and(warp::post())
        .and(conversion_body())
        .and(state_filter.clone())
        .and_then(convert);

    let history_route = warp::path!("historial")
        .and(warp::get())
        .and(warp::query::<HistoryQuery>())
        .and(state_filter.clone())
        .and_then(get_history);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and_then(health);

    info!("All routes configured successfully.");

    index_route
        .or(convert_route)
        .or(history_route)
        .or(health_route)
        .recover(handle_rejection)
}
