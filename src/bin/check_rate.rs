// src/bin/check_rate.rs
use currency_converter::config::AppConfig;
use currency_converter::currency::CurrencyCode;
use currency_converter::services::format::format_rate;
use currency_converter::services::rates::OpenErApiSource;
use currency_converter::services::resolver::RateResolver;
use dotenv::dotenv;
use log::{error, info};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (from, to) = match args.as_slice() {
        [from, to] => (CurrencyCode::parse(from)?, CurrencyCode::parse(to)?),
        _ => {
            eprintln!("usage: check_rate <FROM> <TO>");
            std::process::exit(2);
        }
    };

    let config = AppConfig::from_env()?;
    info!("Checking {} -> {} against {}", from, to, config.rates_api_url);

    let source = OpenErApiSource::new(&config.rates_api_url, config.request_timeout)?;
    let resolver = RateResolver::new(Arc::new(source), chrono::Duration::from_std(config.cache_ttl)?);

    match resolver.resolve(from, to).await {
        Ok(resolved) => {
            println!("{} -> {}: {} ({:?})", from, to, format_rate(resolved.rate), resolved.origin);
            Ok(())
        }
        Err(e) => {
            error!("Rate check failed: {}", e);
            Err(e.into())
        }
    }
}
