//! HTTP API over the ledger service.
//!
//! Handlers only decode requests, call `LedgerService` and wrap the outcome in
//! a `JsonResponse` envelope; ledger failures map to status codes in `errors`.

pub mod dto;
pub mod errors;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::LedgerService;
use crate::domain::AccountId;

use dto::{AccountAmountRequest, CreateAccountRequest, JsonResponse, TransferMoneyRequest};
use errors::ApiError;

type Ledger = Arc<LedgerService>;
type ApiResult = Result<(StatusCode, Json<JsonResponse>), ApiError>;

/// Build the router for the account API.
pub fn router(service: Ledger) -> Router {
    Router::new()
        .route("/account", post(create_account))
        .route("/account/transfer", post(transfer_money))
        .route("/account/withdraw", put(withdraw_money))
        .route("/account/deposit", put(deposit_money))
        .route("/account/:account_id", get(get_account).delete(delete_account))
        .route("/accounts", get(get_all_accounts).delete(delete_all_accounts))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(service: Ledger, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}

fn ok(body: JsonResponse) -> ApiResult {
    Ok((StatusCode::OK, Json(body)))
}

async fn create_account(
    State(service): State<Ledger>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    info!(owner_id = %req.owner_id, "Received request for creating new account");

    let account_id = service.create_account(req.owner_id, req.balance, req.currency)?;
    Ok((
        StatusCode::CREATED,
        Json(
            JsonResponse::success()
                .with_message("New account has been created")
                .with_data(account_id)?,
        ),
    ))
}

async fn get_account(
    State(service): State<Ledger>,
    path: Result<Path<AccountId>, PathRejection>,
) -> ApiResult {
    let Path(account_id) = path?;
    let view = service.get_account(account_id)?;
    ok(JsonResponse::success().with_data(view)?)
}

async fn get_all_accounts(State(service): State<Ledger>) -> ApiResult {
    let views = service.get_all_accounts()?;
    ok(JsonResponse::success().with_data(views)?)
}

async fn delete_account(
    State(service): State<Ledger>,
    path: Result<Path<AccountId>, PathRejection>,
) -> ApiResult {
    let Path(account_id) = path?;
    service.delete_account(account_id)?;
    ok(JsonResponse::success().with_message(format!("Account [{}] has been deleted", account_id)))
}

async fn delete_all_accounts(State(service): State<Ledger>) -> ApiResult {
    service.delete_all_accounts()?;
    ok(JsonResponse::success().with_message("All accounts have been deleted"))
}

async fn transfer_money(
    State(service): State<Ledger>,
    payload: Result<Json<TransferMoneyRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    service.transfer_money(req.from_account, req.to_account, req.amount)?;
    ok(JsonResponse::success().with_message("Money has been transferred successfully"))
}

async fn withdraw_money(
    State(service): State<Ledger>,
    payload: Result<Json<AccountAmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    service.withdraw_money(req.account_id, req.amount)?;
    ok(JsonResponse::success().with_message(format!(
        "Amount has been withdrawn from account: {}",
        req.account_id
    )))
}

async fn deposit_money(
    State(service): State<Ledger>,
    payload: Result<Json<AccountAmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    service.deposit_money(req.account_id, req.amount)?;
    ok(JsonResponse::success().with_message(format!(
        "Amount has been deposited to account: {}",
        req.account_id
    )))
}
