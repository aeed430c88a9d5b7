//! PostgreSQL adapter for the ledger storage port
//!
//! Every balance-affecting write updates `ledger_entries` and the cached
//! `customers.balance_amount` inside one transaction, which is what the
//! port's atomicity contract requires.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use core_kernel::{
    Actor, CollectorId, Currency, CustomerId, DomainPort, EntryId, Money, Role, StoreError,
};
use domain_ledger::entry::{EntryKind, EntryStatus, LedgerEntry, PaymentMethod};
use domain_ledger::ports::LedgerStore;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::parse_currency;

const SELECT_ENTRY: &str = "SELECT id, customer_id, kind, method, reference, purpose, \
     amount, currency, status, rejection_reason, recorded_by, \
     handled_by_id, handled_by_role, entry_date, created_at, updated_at \
     FROM ledger_entries";

/// Ledger store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: DatabasePool,
}

impl PgLedgerStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    customer_id: Uuid,
    kind: String,
    method: Option<String>,
    reference: Option<String>,
    purpose: Option<String>,
    amount: Decimal,
    currency: String,
    status: String,
    rejection_reason: Option<String>,
    recorded_by: Option<Uuid>,
    handled_by_id: Option<Uuid>,
    handled_by_role: Option<String>,
    entry_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self) -> Result<LedgerEntry, DatabaseError> {
        let currency = parse_currency(&self.currency)?;
        let kind = match self.kind.as_str() {
            "deposit" => {
                let method = match self.method.as_deref() {
                    Some("in_hand") => PaymentMethod::InHand,
                    Some("online") => PaymentMethod::Online,
                    other => {
                        return Err(DatabaseError::mapping(format!(
                            "unknown payment method {other:?}"
                        )))
                    }
                };
                EntryKind::Deposit {
                    method,
                    reference: self.reference,
                }
            }
            "withdrawal" => EntryKind::Withdrawal {
                purpose: self.purpose.unwrap_or_default(),
            },
            other => {
                return Err(DatabaseError::mapping(format!(
                    "unknown entry kind {other:?}"
                )))
            }
        };
        let status = parse_status(&self.status)?;
        let handled_by = match (self.handled_by_id, self.handled_by_role) {
            (Some(id), Some(role)) => {
                let role: Role = role
                    .parse()
                    .map_err(|e: String| DatabaseError::mapping(e))?;
                Some(Actor { id, role })
            }
            (None, None) => None,
            _ => {
                return Err(DatabaseError::mapping(
                    "handled_by id and role must be set together",
                ))
            }
        };

        Ok(LedgerEntry {
            id: EntryId::from_uuid(self.id),
            customer_id: CustomerId::from_uuid(self.customer_id),
            kind,
            amount: Money::new(self.amount, currency),
            status,
            rejection_reason: self.rejection_reason,
            recorded_by: self.recorded_by.map(CollectorId::from_uuid),
            handled_by,
            entry_date: self.entry_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_status(status: &str) -> Result<EntryStatus, DatabaseError> {
    match status {
        "pending" => Ok(EntryStatus::Pending),
        "approved" => Ok(EntryStatus::Approved),
        "rejected" => Ok(EntryStatus::Rejected),
        other => Err(DatabaseError::mapping(format!(
            "unknown entry status {other}"
        ))),
    }
}

fn kind_columns(kind: &EntryKind) -> (&'static str, Option<&str>, Option<&str>, Option<&str>) {
    match kind {
        EntryKind::Deposit { method, reference } => {
            let method = match method {
                PaymentMethod::InHand => "in_hand",
                PaymentMethod::Online => "online",
            };
            ("deposit", Some(method), reference.as_deref(), None)
        }
        EntryKind::Withdrawal { purpose } => ("withdrawal", None, None, Some(purpose.as_str())),
    }
}

impl DomainPort for PgLedgerStore {}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn insert_entry(&self, entry: &LedgerEntry, balance: Money) -> Result<(), StoreError> {
        let (kind, method, reference, purpose) = kind_columns(&entry.kind);
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        sqlx::query(
            "INSERT INTO ledger_entries \
             (id, customer_id, kind, method, reference, purpose, amount, currency, \
              status, rejection_reason, recorded_by, handled_by_id, handled_by_role, \
              entry_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(entry.id.as_uuid())
        .bind(entry.customer_id.as_uuid())
        .bind(kind)
        .bind(method)
        .bind(reference)
        .bind(purpose)
        .bind(entry.amount.amount())
        .bind(entry.amount.currency().code())
        .bind(entry.status.to_string())
        .bind(entry.rejection_reason.as_deref())
        .bind(entry.recorded_by.map(|c| *c.as_uuid()))
        .bind(entry.handled_by.map(|a| a.id))
        .bind(entry.handled_by.map(|a| a.role.to_string()))
        .bind(entry.entry_date)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        write_balance(&mut tx, entry.customer_id, balance).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!("{SELECT_ENTRY} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        row.map(|r| r.into_entry().map_err(StoreError::from)).transpose()
    }

    async fn entries_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "{SELECT_ENTRY} WHERE customer_id = $1 ORDER BY entry_date, created_at, id"
        ))
        .bind(customer.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_entry().map_err(StoreError::from))
            .collect()
    }

    async fn entries_recorded_by(
        &self,
        collector: CollectorId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "{SELECT_ENTRY} WHERE recorded_by = $1 ORDER BY entry_date, created_at, id"
        ))
        .bind(collector.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_entry().map_err(StoreError::from))
            .collect()
    }

    async fn apply_transition(
        &self,
        entry: &LedgerEntry,
        balance: Money,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let result = sqlx::query(
            "UPDATE ledger_entries \
             SET status = $2, rejection_reason = $3, handled_by_id = $4, \
                 handled_by_role = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(entry.id.as_uuid())
        .bind(entry.status.to_string())
        .bind(entry.rejection_reason.as_deref())
        .bind(entry.handled_by.map(|a| a.id))
        .bind(entry.handled_by.map(|a| a.role.to_string()))
        .bind(entry.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("LedgerEntry", entry.id));
        }

        write_balance(&mut tx, entry.customer_id, balance).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn delete_entry(
        &self,
        id: EntryId,
        customer: CustomerId,
        balance: Money,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let result = sqlx::query("DELETE FROM ledger_entries WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("LedgerEntry", id));
        }

        write_balance(&mut tx, customer, balance).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn cached_balance(
        &self,
        customer: CustomerId,
        currency: Currency,
    ) -> Result<Money, StoreError> {
        let amount: Option<Decimal> =
            sqlx::query_scalar("SELECT balance_amount FROM customers WHERE id = $1")
                .bind(customer.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(DatabaseError::from)?;
        match amount {
            Some(amount) => Ok(Money::new(amount, currency)),
            None => Err(StoreError::not_found("Customer", customer)),
        }
    }
}

async fn write_balance(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    customer: CustomerId,
    balance: Money,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE customers SET balance_amount = $2, updated_at = $3 WHERE id = $1",
    )
    .bind(customer.as_uuid())
    .bind(balance.amount())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::from)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("Customer", customer));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_entry_row_round_trips_kind_columns() {
        let deposit = LedgerEntry::online_deposit(
            CustomerId::new(),
            Money::new(Decimal::from(200), Currency::INR),
            "UPI-1".to_string(),
            None,
            Utc::now(),
        )
        .unwrap();
        let (kind, method, reference, purpose) = kind_columns(&deposit.kind);
        assert_eq!(kind, "deposit");
        assert_eq!(method, Some("online"));
        assert_eq!(reference, Some("UPI-1"));
        assert!(purpose.is_none());

        let withdrawal = LedgerEntry::withdrawal(
            CustomerId::new(),
            Money::new(Decimal::from(50), Currency::INR),
            "medical".to_string(),
            None,
            Utc::now(),
        )
        .unwrap();
        let (kind, method, _, purpose) = kind_columns(&withdrawal.kind);
        assert_eq!(kind, "withdrawal");
        assert!(method.is_none());
        assert_eq!(purpose, Some("medical"));
    }

    #[test]
    fn test_bad_stored_values_are_mapping_errors() {
        assert!(parse_currency("XYZ").is_err());
        assert!(parse_status("maybe").is_err());
        assert!(parse_status("approved").is_ok());
    }

    #[test]
    fn test_mismatched_handled_by_columns_rejected() {
        let row = EntryRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            kind: "deposit".to_string(),
            method: Some("in_hand".to_string()),
            reference: None,
            purpose: None,
            amount: Decimal::from(10),
            currency: "INR".to_string(),
            status: "pending".to_string(),
            rejection_reason: None,
            recorded_by: None,
            handled_by_id: Some(Uuid::new_v4()),
            handled_by_role: None,
            entry_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(row.into_entry().is_err());
    }
}
