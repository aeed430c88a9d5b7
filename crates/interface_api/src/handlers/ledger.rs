//! Ledger handlers: deposits, withdrawals, approvals and reports

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{Actor, CollectorId, CustomerId, EntryId, Money};
use domain_ledger::service::{NewDeposit, NewWithdrawal};
use domain_ledger::ReportScope;

use crate::dto::ledger::*;
use crate::{error::ApiError, AppState};

/// Records a deposit (in-hand or online)
pub async fn record_deposit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<RecordDepositRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .ledger
        .record_deposit(
            actor,
            NewDeposit {
                customer_id: CustomerId::from_uuid(request.customer_id),
                amount: Money::new(request.amount, state.currency),
                method: request.method,
                reference: request.reference,
                entry_date: request.entry_date,
            },
        )
        .await?;
    Ok(Json(entry.into()))
}

/// Records a withdrawal request
pub async fn request_withdrawal(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<RequestWithdrawalRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .ledger
        .request_withdrawal(
            actor,
            NewWithdrawal {
                customer_id: CustomerId::from_uuid(request.customer_id),
                amount: Money::new(request.amount, state.currency),
                purpose: request.purpose,
                entry_date: request.entry_date,
            },
        )
        .await?;
    Ok(Json(entry.into()))
}

/// Approves a pending entry
pub async fn approve_entry(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .ledger
        .approve(actor, EntryId::from_uuid(id))
        .await?;
    Ok(Json(entry.into()))
}

/// Rejects a pending entry, or reverses an approved online deposit
pub async fn reject_entry(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectEntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .ledger
        .reject(actor, EntryId::from_uuid(id), request.reason)
        .await?;
    Ok(Json(entry.into()))
}

/// Deletes a pending or rejected entry
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.ledger.delete_entry(actor, EntryId::from_uuid(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Full passbook statement for a customer
pub async fn customer_statement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatementResponse>, ApiError> {
    let statement = state
        .ledger
        .statement(actor, CustomerId::from_uuid(id))
        .await?;
    Ok(Json(statement.into()))
}

/// Summary report. Admins may pass `collector_id` to narrow the scope;
/// collectors always report on their own book.
pub async fn summary_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let scope = match (query.collector_id, actor.collector_id()) {
        (Some(id), _) => ReportScope::Collector(CollectorId::from_uuid(id)),
        (None, Some(own)) => ReportScope::Collector(own),
        (None, None) => ReportScope::All,
    };
    let report = state.ledger.summary(actor, scope).await?;
    Ok(Json(report.into()))
}
