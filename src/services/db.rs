// src/services/db.rs
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::models::{ConversionRecord, NewConversion};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://historial.db";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS conversions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount REAL NOT NULL,
        source_code TEXT NOT NULL,
        target_code TEXT NOT NULL,
        formatted_result TEXT NOT NULL,
        rate REAL NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Append-only conversion log backed by SQLite.
pub struct DbStore {
    pub(crate) pool: SqlitePool,
}

impl DbStore {
    /// Opens the database (creating the file if needed) and ensures the schema.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        info!("Conversion history ready at {}", database_url);
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn save_conversion(&self, conversion: &NewConversion) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO conversions (amount, source_code, target_code, formatted_result, rate)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversion.amount)
        .bind(&conversion.source_code)
        .bind(&conversion.target_code)
        .bind(&conversion.formatted_result)
        .bind(conversion.rate)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Saved conversion {} to history", id);
        Ok(id)
    }

    /// The most recent `limit` conversions, newest first.
    pub async fn recent_conversions(&self, limit: u32) -> Result<Vec<ConversionRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, ConversionRecord>(
            r#"
            SELECT id, amount, source_code, target_code, formatted_result, rate, created_at
            FROM conversions
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
