use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    aggregation_stats::{AggregationSnapshot, AGGREGATION_STATS},
    ledger::{BlockTag, LedgerError, ParseBlockTagError},
    models::{Address, Balance, Block, RankedEntry, TransactionTrace},
    service::Aggregator,
};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub max_block_range: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("missing {0}")]
    MissingParam(&'static str),
    #[error("invalid {param}: {reason}")]
    InvalidParam { param: &'static str, reason: String },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParam(_) | ApiError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::Ledger(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::warn!("request failed: {}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct AccountsResponse {
    accounts: Vec<Address>,
}

async fn accounts(State(state): State<AppState>) -> Result<Json<AccountsResponse>, ApiError> {
    let accounts = state.aggregator.ledger().accounts().await?;
    Ok(Json(AccountsResponse { accounts }))
}

#[derive(Deserialize)]
struct BalanceParams {
    address: Option<String>,
    block: Option<String>,
}

#[derive(Serialize)]
struct BalanceResponse {
    address: Address,
    block: BlockTag,
    balance: String,
}

async fn balance(
    State(state): State<AppState>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = params
        .address
        .filter(|a| !a.is_empty())
        .map(Address::from)
        .ok_or(ApiError::MissingParam("address"))?;
    let block = match params.block.filter(|b| !b.is_empty()) {
        Some(raw) => parse_tag("block", &raw)?,
        None => BlockTag::Latest,
    };
    let balance = state.aggregator.ledger().balance(&address, block).await?;
    Ok(Json(BalanceResponse {
        address,
        block,
        balance,
    }))
}

#[derive(Serialize)]
struct BlockNumberResponse {
    block_number: u64,
}

async fn block_number(State(state): State<AppState>) -> Result<Json<BlockNumberResponse>, ApiError> {
    let block_number = state.aggregator.ledger().block_number().await?;
    Ok(Json(BlockNumberResponse { block_number }))
}

#[derive(Deserialize)]
struct BlockParams {
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
}

async fn block(
    State(state): State<AppState>,
    Query(params): Query<BlockParams>,
) -> Result<Json<Block>, ApiError> {
    let raw = params
        .block_number
        .filter(|b| !b.is_empty())
        .ok_or(ApiError::MissingParam("blockNumber"))?;
    let tag = parse_tag("blockNumber", &raw)?;
    Ok(Json(state.aggregator.ledger().block(tag).await?))
}

#[derive(Deserialize)]
struct TraceParams {
    #[serde(rename = "txHash")]
    tx_hash: Option<String>,
}

async fn transaction_trace(
    State(state): State<AppState>,
    Query(params): Query<TraceParams>,
) -> Result<Json<TransactionTrace>, ApiError> {
    let tx_hash = params
        .tx_hash
        .filter(|h| !h.is_empty())
        .ok_or(ApiError::MissingParam("txHash"))?;
    Ok(Json(
        state.aggregator.ledger().transaction_trace(&tx_hash).await?,
    ))
}

#[derive(Deserialize)]
struct RangeParams {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Serialize)]
struct ContractsResponse {
    contracts: Vec<RankedEntry<u64>>,
}

async fn smart_contracts(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ContractsResponse>, ApiError> {
    let start = parse_block_number("start", params.start)?;
    let end = parse_block_number("end", params.end)?;
    if start > end {
        return Err(ApiError::InvalidParam {
            param: "end",
            reason: format!("end {} is before start {}", end, start),
        });
    }
    if end - start >= state.max_block_range {
        return Err(ApiError::InvalidParam {
            param: "end",
            reason: format!("range exceeds {} blocks", state.max_block_range),
        });
    }

    let contracts = state.aggregator.contract_interactions(start, end).await?;
    Ok(Json(ContractsResponse { contracts }))
}

#[derive(Deserialize)]
struct RichestParams {
    block: Option<String>,
}

#[derive(Serialize)]
struct WalletsResponse {
    wallets: Vec<RankedEntry<Balance>>,
}

async fn richest_users(
    State(state): State<AppState>,
    Query(params): Query<RichestParams>,
) -> Result<Json<WalletsResponse>, ApiError> {
    let block = parse_block_number("block", params.block)?;
    let wallets = state.aggregator.richest_wallets(block).await?;
    Ok(Json(WalletsResponse { wallets }))
}

async fn stats() -> Json<AggregationSnapshot> {
    Json(AGGREGATION_STATS.snapshot())
}

fn parse_tag(param: &'static str, raw: &str) -> Result<BlockTag, ApiError> {
    raw.parse().map_err(|e: ParseBlockTagError| ApiError::InvalidParam {
        param,
        reason: e.to_string(),
    })
}

fn parse_block_number(param: &'static str, raw: Option<String>) -> Result<u64, ApiError> {
    let raw = raw
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParam(param))?;
    match parse_tag(param, &raw)? {
        BlockTag::Number(n) => Ok(n),
        BlockTag::Latest => Err(ApiError::InvalidParam {
            param,
            reason: "expected a block number".to_string(),
        }),
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/accounts", get(accounts))
        .route("/balance", get(balance))
        .route("/blocknumber", get(block_number))
        .route("/block", get(block))
        .route("/transactiontrace", get(transaction_trace))
        .route("/smartcontracts", get(smart_contracts))
        .route("/richestusers", get(richest_users))
        .route("/stats", get(stats))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
