// src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::currency::{display_name, flag_url};
use crate::services::resolver::RateOrigin;

/// Amount as submitted: JSON clients may send a number, forms send text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

/// Body of `POST /convertir`, accepted as JSON or url-encoded form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConversionRequest {
    #[serde(default, alias = "cantidad")]
    pub amount: Option<AmountInput>,
    #[serde(default, rename = "sourceCode", alias = "source_code", alias = "moneda_origen")]
    pub source_code: Option<String>,
    #[serde(default, rename = "targetCode", alias = "target_code", alias = "moneda_destino")]
    pub target_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub amount: f64,
    pub source_code: String,
    pub target_code: String,
    pub formatted_result: String,
    pub rate: String,
    pub rate_source: RateOrigin,
}

/// A row about to be appended to the conversion log.
#[derive(Debug, Clone)]
pub struct NewConversion {
    pub amount: f64,
    pub source_code: String,
    pub target_code: String,
    pub formatted_result: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConversionRecord {
    pub id: i64,
    pub amount: f64,
    pub source_code: String,
    pub target_code: String,
    pub formatted_result: String,
    pub rate: f64,
    pub created_at: NaiveDateTime,
}

/// History row as served by `GET /historial`, with display metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub amount: f64,
    pub source_code: String,
    pub target_code: String,
    pub formatted_result: String,
    pub rate: f64,
    pub timestamp: NaiveDateTime,
    pub source_name: String,
    pub target_name: String,
    pub source_flag: String,
    pub target_flag: String,
}

impl From<ConversionRecord> for HistoryEntry {
    fn from(record: ConversionRecord) -> Self {
        HistoryEntry {
            source_name: display_name(&record.source_code),
            target_name: display_name(&record.target_code),
            source_flag: flag_url(&record.source_code),
            target_flag: flag_url(&record.target_code),
            id: record.id,
            amount: record.amount,
            source_code: record.source_code,
            target_code: record.target_code,
            formatted_result: record.formatted_result,
            rate: record.rate,
            timestamp: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_canonical_and_legacy_names() {
        let canonical: ConversionRequest = serde_json::from_str(
            r#"{"amount": 10.5, "sourceCode": "USD", "targetCode": "EUR"}"#,
        )
        .unwrap();
        assert_eq!(canonical.amount, Some(AmountInput::Number(10.5)));
        assert_eq!(canonical.source_code.as_deref(), Some("USD"));
        assert_eq!(canonical.target_code.as_deref(), Some("EUR"));

        let legacy: ConversionRequest = serde_json::from_str(
            r#"{"cantidad": "100", "moneda_origen": "EUR", "moneda_destino": "PYG"}"#,
        )
        .unwrap();
        assert_eq!(legacy.amount, Some(AmountInput::Text("100".to_string())));
        assert_eq!(legacy.source_code.as_deref(), Some("EUR"));
        assert_eq!(legacy.target_code.as_deref(), Some("PYG"));
    }

    #[test]
    fn test_request_fields_are_optional() {
        let empty: ConversionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ConversionRequest::default());
    }

    #[test]
    fn test_history_entry_adds_display_metadata() {
        let created_at = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let entry = HistoryEntry::from(ConversionRecord {
            id: 7,
            amount: 1000.0,
            source_code: "VES".to_string(),
            target_code: "PYG".to_string(),
            formatted_result: "220,000 Guaraní paraguayo".to_string(),
            rate: 220.0,
            created_at,
        });

        assert_eq!(entry.source_name, "Bolívar venezolano");
        assert_eq!(entry.target_flag, "https://flagcdn.com/py.svg");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["formattedResult"], "220,000 Guaraní paraguayo");
        assert_eq!(json["sourceCode"], "VES");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00");
    }
}
