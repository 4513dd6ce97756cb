use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use stockwatch_market_data::{
    BatchQuotesResponse, HistoricalDataResponse, Listing, SearchStocksResponse,
    StockQuoteResponse, Timeframe,
};

use crate::{error::ApiResult, main_lib::AppState};

use super::health::provider_status;

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
}

async fn search_stocks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Json<SearchStocksResponse> {
    Json(state.market_data.search_stocks(&q.query).await)
}

#[derive(Deserialize)]
struct QuoteQuery {
    symbol: String,
    exchange: String,
}

async fn get_stock_quote(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuoteQuery>,
) -> Json<StockQuoteResponse> {
    Json(state.market_data.get_stock_quote(&q.symbol, &q.exchange).await)
}

#[derive(Deserialize)]
struct BatchQuotesBody {
    stocks: Vec<Listing>,
}

async fn get_batch_quotes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchQuotesBody>,
) -> Json<BatchQuotesResponse> {
    Json(state.market_data.get_batch_quotes(&body.stocks).await)
}

#[derive(Deserialize)]
struct HistoryQuery {
    symbol: String,
    exchange: String,
    timeframe: String,
}

async fn get_historical_data(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<HistoricalDataResponse>> {
    let timeframe: Timeframe = q.timeframe.parse()?;
    let res = state
        .market_data
        .get_historical_data(&q.symbol, &q.exchange, timeframe)
        .await;
    Ok(Json(res))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market-data/search", get(search_stocks))
        .route("/market-data/quote", get(get_stock_quote))
        .route("/market-data/quotes/batch", post(get_batch_quotes))
        .route("/market-data/history", get(get_historical_data))
        .route("/market-data/provider", get(provider_status))
}
