// src/services/converter.rs
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::currency::CurrencyCode;
use crate::models::{AmountInput, ConversionRequest};
use crate::services::format::{format_rate, format_result};
use crate::services::resolver::{RateOrigin, RateResolver, ResolveError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Missing parameters.")]
    MissingParameters,

    #[error("Invalid currency.")]
    InvalidCurrency(String),

    #[error("Invalid amount.")]
    InvalidAmount,

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Could not obtain the exchange rate.")]
    RateUnavailable(#[from] ResolveError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub rate: f64,
    pub origin: RateOrigin,
    pub value: f64,
    pub formatted_result: String,
    pub formatted_rate: String,
}

/// Validated input of a conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub amount: f64,
    pub source: CurrencyCode,
    pub target: CurrencyCode,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(input: &AmountInput) -> Result<f64, ConversionError> {
    let amount = match input {
        AmountInput::Number(n) => *n,
        AmountInput::Text(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConversionError::InvalidAmount)?,
    };
    if !amount.is_finite() {
        return Err(ConversionError::InvalidAmount);
    }
    if amount <= 0.0 {
        return Err(ConversionError::NonPositiveAmount);
    }
    Ok(amount)
}

pub fn validate(request: &ConversionRequest) -> Result<ValidatedRequest, ConversionError> {
    let amount = match &request.amount {
        Some(AmountInput::Text(raw)) if raw.trim().is_empty() => None,
        other => other.as_ref(),
    };
    let (Some(amount), Some(source), Some(target)) = (
        amount,
        non_blank(&request.source_code),
        non_blank(&request.target_code),
    ) else {
        return Err(ConversionError::MissingParameters);
    };

    let source = CurrencyCode::parse(source)
        .map_err(|e| ConversionError::InvalidCurrency(e.0))?;
    let target = CurrencyCode::parse(target)
        .map_err(|e| ConversionError::InvalidCurrency(e.0))?;
    let amount = parse_amount(amount)?;

    Ok(ValidatedRequest {
        amount,
        source,
        target,
    })
}

pub struct Converter {
    resolver: Arc<RateResolver>,
}

impl Converter {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Converter { resolver }
    }

    pub async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConversionError> {
        let valid = validate(request)?;
        let resolved = self.resolver.resolve(valid.source, valid.target).await?;

        let value = valid.amount * resolved.rate;
        if !value.is_finite() {
            warn!(
                "Conversion of {} {} -> {} overflowed",
                valid.amount, valid.source, valid.target
            );
            return Err(ConversionError::InvalidAmount);
        }
        let conversion = Conversion {
            amount: valid.amount,
            source: valid.source,
            target: valid.target,
            rate: resolved.rate,
            origin: resolved.origin,
            value,
            formatted_result: format_result(valid.target, value),
            formatted_rate: format_rate(resolved.rate),
        };
        info!(
            "Converted {} {} -> {} at {} ({:?})",
            conversion.amount,
            conversion.source,
            conversion.formatted_result,
            conversion.rate,
            conversion.origin
        );
        Ok(conversion)
    }
}
