//! Ledger DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_ledger::{
    CustomerSummary, EntryKind, EntryStatus, LedgerEntry, PaymentMethod, Statement,
    SummaryReport, SystemRollup,
};

use crate::dto::party::CustomerResponse;

#[derive(Debug, Deserialize)]
pub struct RecordDepositRequest {
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub entry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RequestWithdrawalRequest {
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub purpose: String,
    pub entry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RejectEntryRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub collector_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<Uuid>,
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntry> for EntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        let (kind, method, reference, purpose) = match entry.kind {
            EntryKind::Deposit { method, reference } => {
                ("deposit".to_string(), Some(method), reference, None)
            }
            EntryKind::Withdrawal { purpose } => {
                ("withdrawal".to_string(), None, None, Some(purpose))
            }
        };
        Self {
            id: *entry.id.as_uuid(),
            customer_id: *entry.customer_id.as_uuid(),
            kind,
            method,
            reference,
            purpose,
            amount: entry.amount.amount(),
            currency: entry.amount.currency().code().to_string(),
            status: entry.status,
            rejection_reason: entry.rejection_reason,
            recorded_by: entry.recorded_by.map(|c| *c.as_uuid()),
            entry_date: entry.entry_date,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatementResponse {
    pub customer: CustomerResponse,
    pub entries: Vec<EntryResponse>,
    pub balance: Decimal,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            customer: statement.customer.into(),
            entries: statement
                .entries
                .into_iter()
                .map(EntryResponse::from)
                .collect(),
            balance: statement.projection.balance.amount(),
            total_deposits: statement.projection.total_deposits.amount(),
            total_withdrawals: statement.projection.total_withdrawals.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerSummaryResponse {
    pub customer_id: Uuid,
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub pending_entries: usize,
}

impl From<CustomerSummary> for CustomerSummaryResponse {
    fn from(line: CustomerSummary) -> Self {
        Self {
            customer_id: *line.customer_id.as_uuid(),
            account_number: line.account_number,
            name: line.name,
            balance: line.balance.amount(),
            total_deposits: line.total_deposits.amount(),
            total_withdrawals: line.total_withdrawals.amount(),
            pending_entries: line.pending_entries,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RollupResponse {
    pub customers: usize,
    pub total_balance: Decimal,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub pending_entries: usize,
}

impl From<SystemRollup> for RollupResponse {
    fn from(rollup: SystemRollup) -> Self {
        Self {
            customers: rollup.customers,
            total_balance: rollup.total_balance.amount(),
            total_deposits: rollup.total_deposits.amount(),
            total_withdrawals: rollup.total_withdrawals.amount(),
            pending_entries: rollup.pending_entries,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub customers: Vec<CustomerSummaryResponse>,
    pub rollup: RollupResponse,
}

impl From<SummaryReport> for SummaryResponse {
    fn from(report: SummaryReport) -> Self {
        Self {
            customers: report
                .customers
                .into_iter()
                .map(CustomerSummaryResponse::from)
                .collect(),
            rollup: report.rollup.into(),
        }
    }
}
