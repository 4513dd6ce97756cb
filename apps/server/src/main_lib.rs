use std::sync::Arc;

use stockwatch_market_data::{init_market_data_provider, MarketDataService};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub market_data: MarketDataService,
}

pub fn init_tracing() {
    let log_format = std::env::var("SW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let provider = init_market_data_provider(&config.market_data);
    tracing::info!("Market data provider in use: {}", provider.id());

    Arc::new(AppState {
        market_data: MarketDataService::new(provider),
    })
}
