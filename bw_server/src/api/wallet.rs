//! Wallet API handlers.
//!
//! Thin adapters over [`WalletService`](bet_wallet::WalletService): the HTTP
//! status mirrors the `statusCode` of the body, and every call is logged and
//! counted once.
//!
//! # Examples
//!
//! Debit the trust bucket:
//! ```bash
//! curl -X POST http://localhost:7070/api/v1/wallet/debit \
//!   -H "Content-Type: application/json" \
//!   -d '{"clientId": 1, "userId": 42, "amount": "12.50", "walletTag": "trust"}'
//! ```
//!
//! Read the balances:
//! ```bash
//! curl http://localhost:7070/api/v1/wallet/1/42/balance
//! ```

use super::AppState;
use super::request_id::RequestId;
use crate::{logging, metrics};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use bet_wallet::wallet::{TransactionHistoryResponse, WalletRequest, WalletResponse};
use serde::Deserialize;
use std::time::Instant;

/// Message for bodies or query strings that cannot be decoded
pub const INVALID_REQUEST: &str = "Invalid request";

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Credit a wallet bucket.
///
/// `POST /api/v1/wallet/credit`
pub async fn credit(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<WalletRequest>, JsonRejection>,
) -> (StatusCode, Json<WalletResponse>) {
    let started = Instant::now();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return reject_body("credit_user", &request_id, &rejection, started),
    };

    let response = state.wallet_service.credit_user(&request).await;
    finish(
        "credit_user",
        &request_id,
        (request.client_id, request.user_id),
        started,
        response.status_code,
        response,
    )
}

/// Debit a wallet bucket.
///
/// `POST /api/v1/wallet/debit`
pub async fn debit(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<WalletRequest>, JsonRejection>,
) -> (StatusCode, Json<WalletResponse>) {
    let started = Instant::now();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return reject_body("debit_user", &request_id, &rejection, started),
    };

    let response = state.wallet_service.debit_user(&request).await;
    finish(
        "debit_user",
        &request_id,
        (request.client_id, request.user_id),
        started,
        response.status_code,
        response,
    )
}

/// Read all six buckets of a wallet.
///
/// `GET /api/v1/wallet/{client_id}/{user_id}/balance`
pub async fn get_balance(
    State(state): State<AppState>,
    request_id: RequestId,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> (StatusCode, Json<WalletResponse>) {
    let started = Instant::now();
    let (client_id, user_id) = match path {
        Ok(Path(ids)) => ids,
        Err(rejection) => {
            log_rejection("get_balance", &request_id, &rejection);
            return finish(
                "get_balance",
                &request_id,
                (0, 0),
                started,
                400,
                WalletResponse::failure(400, INVALID_REQUEST),
            );
        }
    };

    let response = state.wallet_service.get_balance(client_id, user_id).await;
    finish(
        "get_balance",
        &request_id,
        (client_id, user_id),
        started,
        response.status_code,
        response,
    )
}

/// Newest ledger entries of a wallet.
///
/// `GET /api/v1/wallet/{client_id}/{user_id}/transactions?limit=N`
pub async fn list_transactions(
    State(state): State<AppState>,
    request_id: RequestId,
    path: Result<Path<(i64, i64)>, PathRejection>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> (StatusCode, Json<TransactionHistoryResponse>) {
    let started = Instant::now();
    let (ids, response) = match (path, query) {
        (Ok(Path((client_id, user_id))), Ok(Query(query))) => (
            (client_id, user_id),
            state
                .wallet_service
                .list_transactions(client_id, user_id, query.limit)
                .await,
        ),
        (Err(rejection), _) => {
            log_rejection("list_transactions", &request_id, &rejection);
            ((0, 0), TransactionHistoryResponse::failure(400, INVALID_REQUEST))
        }
        (Ok(Path(ids)), Err(rejection)) => {
            log_rejection("list_transactions", &request_id, &rejection);
            (ids, TransactionHistoryResponse::failure(400, INVALID_REQUEST))
        }
    };

    finish(
        "list_transactions",
        &request_id,
        ids,
        started,
        response.status_code,
        response,
    )
}

fn log_rejection(operation: &str, request_id: &RequestId, rejection: &dyn std::fmt::Display) {
    tracing::warn!(
        operation = operation,
        request_id = request_id.as_str(),
        error = %rejection,
        "Rejected request"
    );
}

fn reject_body(
    operation: &'static str,
    request_id: &RequestId,
    rejection: &JsonRejection,
    started: Instant,
) -> (StatusCode, Json<WalletResponse>) {
    log_rejection(operation, request_id, rejection);
    finish(
        operation,
        request_id,
        (0, 0),
        started,
        400,
        WalletResponse::failure(400, INVALID_REQUEST),
    )
}

fn finish<T>(
    operation: &'static str,
    request_id: &RequestId,
    (client_id, user_id): (i64, i64),
    started: Instant,
    status_code: u16,
    body: T,
) -> (StatusCode, Json<T>) {
    let elapsed = started.elapsed();
    logging::log_wallet_operation(
        operation,
        request_id.as_str(),
        client_id,
        user_id,
        status_code,
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    );
    metrics::wallet_operations_total(operation, status_code);
    metrics::wallet_operation_duration_seconds(operation, elapsed.as_secs_f64());

    let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body))
}
