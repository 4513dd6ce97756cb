use std::sync::Arc;

use axum::{extract::State, Json};
use stockwatch_market_data::ProviderStatus;

use crate::main_lib::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Active provider, its data sources and whether its upstream answers.
pub async fn provider_status(State(state): State<Arc<AppState>>) -> Json<ProviderStatus> {
    Json(state.market_data.health().await)
}
