// src/handlers/convert.rs
use log::{error, info, warn};
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::models::{ConversionRequest, ConversionResponse, NewConversion};
use crate::routes::AppState;

pub async fn convert(request: ConversionRequest, state: AppState) -> Result<Json, Rejection> {
    info!("Handling conversion request: {:?}", request);

    let conversion = state.converter.convert(&request).await.map_err(|e| {
        warn!("Conversion rejected: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    let record = NewConversion {
        amount: conversion.amount,
        source_code: conversion.source.to_string(),
        target_code: conversion.target.to_string(),
        formatted_result: conversion.formatted_result.clone(),
        rate: conversion.rate,
    };
    if let Err(e) = state.db.save_conversion(&record).await {
        error!("Failed to save conversion to history: {}", e);
        // The caller still gets the conversion
    }

    Ok(warp::reply::json(&ConversionResponse {
        amount: conversion.amount,
        source_code: record.source_code,
        target_code: record.target_code,
        formatted_result: conversion.formatted_result,
        rate: conversion.formatted_rate,
        rate_source: conversion.origin,
    }))
}
