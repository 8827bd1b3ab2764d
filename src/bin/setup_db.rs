// src/bin/setup_db.rs
use currency_converter::config::AppConfig;
use currency_converter::services::db::DbStore;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;

    // Connecting creates the file and the conversions table if needed
    DbStore::new(&config.database_url).await?;

    println!("Database setup complete! ({})", config.database_url);
    Ok(())
}
