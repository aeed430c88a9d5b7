//! PostgreSQL adapter for the party storage port
//!
//! Customers, collectors, plans and feedback threads. Feedback notes are
//! stored as a JSONB array on the thread row; they are append-only and
//! always read and written as a whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use core_kernel::{CollectorId, CustomerId, DomainPort, FeedbackId, Money, PlanId, StoreError};
use domain_party::customer::{AccountStatus, AccountType, CustomerAccount};
use domain_party::feedback::{Feedback, FeedbackNote, FeedbackSource, FeedbackStatus};
use domain_party::plan::{PlanFrequency, SavingsPlan};
use domain_party::ports::PartyStore;
use domain_party::Collector;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::parse_currency;

/// Party store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgPartyStore {
    pool: DatabasePool,
}

impl PgPartyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    account_number: String,
    name: String,
    phone: Option<String>,
    address: Option<String>,
    assigned_collector: Option<Uuid>,
    plan_id: Option<Uuid>,
    account_type: String,
    status: String,
    is_closed: bool,
    balance_amount: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Result<CustomerAccount, DatabaseError> {
        let currency = parse_currency(&self.currency)?;
        Ok(CustomerAccount {
            id: CustomerId::from_uuid(self.id),
            account_number: self.account_number,
            name: self.name,
            phone: self.phone,
            address: self.address,
            assigned_collector: self.assigned_collector.map(CollectorId::from_uuid),
            plan_id: self.plan_id.map(PlanId::from_uuid),
            account_type: parse_account_type(&self.account_type)?,
            status: parse_account_status(&self.status)?,
            is_closed: self.is_closed,
            balance: Money::new(self.balance_amount, currency),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CollectorRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CollectorRow> for Collector {
    fn from(row: CollectorRow) -> Self {
        Collector {
            id: CollectorId::from_uuid(row.id),
            name: row.name,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    installment_amount: Decimal,
    currency: String,
    frequency: String,
    duration_months: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlanRow {
    fn into_plan(self) -> Result<SavingsPlan, DatabaseError> {
        let currency = parse_currency(&self.currency)?;
        Ok(SavingsPlan {
            id: PlanId::from_uuid(self.id),
            name: self.name,
            installment: Money::new(self.installment_amount, currency),
            frequency: parse_frequency(&self.frequency)?,
            duration_months: u32::try_from(self.duration_months)
                .map_err(|_| DatabaseError::mapping("negative plan duration"))?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    source: String,
    author: Uuid,
    subject: String,
    status: String,
    notes: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn into_feedback(self) -> Result<Feedback, DatabaseError> {
        let notes: Vec<FeedbackNote> = serde_json::from_value(self.notes)
            .map_err(|e| DatabaseError::mapping(format!("bad feedback notes: {e}")))?;
        Ok(Feedback {
            id: FeedbackId::from_uuid(self.id),
            source: parse_source(&self.source)?,
            author: self.author,
            subject: self.subject,
            status: parse_feedback_status(&self.status)?,
            notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_account_type(value: &str) -> Result<AccountType, DatabaseError> {
    match value {
        "daily" => Ok(AccountType::Daily),
        "weekly" => Ok(AccountType::Weekly),
        "monthly" => Ok(AccountType::Monthly),
        other => Err(DatabaseError::mapping(format!(
            "unknown account type {other}"
        ))),
    }
}

fn account_type_str(value: AccountType) -> &'static str {
    match value {
        AccountType::Daily => "daily",
        AccountType::Weekly => "weekly",
        AccountType::Monthly => "monthly",
    }
}

fn parse_account_status(value: &str) -> Result<AccountStatus, DatabaseError> {
    match value {
        "active" => Ok(AccountStatus::Active),
        "inactive" => Ok(AccountStatus::Inactive),
        "suspended" => Ok(AccountStatus::Suspended),
        other => Err(DatabaseError::mapping(format!(
            "unknown account status {other}"
        ))),
    }
}

fn account_status_str(value: AccountStatus) -> &'static str {
    match value {
        AccountStatus::Active => "active",
        AccountStatus::Inactive => "inactive",
        AccountStatus::Suspended => "suspended",
    }
}

fn parse_frequency(value: &str) -> Result<PlanFrequency, DatabaseError> {
    match value {
        "daily" => Ok(PlanFrequency::Daily),
        "weekly" => Ok(PlanFrequency::Weekly),
        "monthly" => Ok(PlanFrequency::Monthly),
        other => Err(DatabaseError::mapping(format!(
            "unknown plan frequency {other}"
        ))),
    }
}

fn frequency_str(value: PlanFrequency) -> &'static str {
    match value {
        PlanFrequency::Daily => "daily",
        PlanFrequency::Weekly => "weekly",
        PlanFrequency::Monthly => "monthly",
    }
}

fn parse_source(value: &str) -> Result<FeedbackSource, DatabaseError> {
    match value {
        "customer" => Ok(FeedbackSource::Customer),
        "collector" => Ok(FeedbackSource::Collector),
        other => Err(DatabaseError::mapping(format!(
            "unknown feedback source {other}"
        ))),
    }
}

fn source_str(value: FeedbackSource) -> &'static str {
    match value {
        FeedbackSource::Customer => "customer",
        FeedbackSource::Collector => "collector",
    }
}

fn parse_feedback_status(value: &str) -> Result<FeedbackStatus, DatabaseError> {
    match value {
        "new" => Ok(FeedbackStatus::New),
        "in_progress" => Ok(FeedbackStatus::InProgress),
        "resolved" => Ok(FeedbackStatus::Resolved),
        "closed" => Ok(FeedbackStatus::Closed),
        other => Err(DatabaseError::mapping(format!(
            "unknown feedback status {other}"
        ))),
    }
}

fn feedback_status_str(value: FeedbackStatus) -> &'static str {
    match value {
        FeedbackStatus::New => "new",
        FeedbackStatus::InProgress => "in_progress",
        FeedbackStatus::Resolved => "resolved",
        FeedbackStatus::Closed => "closed",
    }
}

const SELECT_CUSTOMER: &str = "SELECT id, account_number, name, phone, address, \
     assigned_collector, plan_id, account_type, status, is_closed, \
     balance_amount, currency, created_at, updated_at FROM customers";

const SELECT_COLLECTOR: &str =
    "SELECT id, name, phone, is_active, created_at, updated_at FROM collectors";

const SELECT_PLAN: &str = "SELECT id, name, installment_amount, currency, frequency, \
     duration_months, is_active, created_at, updated_at FROM plans";

const SELECT_FEEDBACK: &str =
    "SELECT id, source, author, subject, status, notes, created_at, updated_at FROM feedback";

impl DomainPort for PgPartyStore {}

#[async_trait]
impl PartyStore for PgPartyStore {
    async fn insert_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO customers \
             (id, account_number, name, phone, address, assigned_collector, plan_id, \
              account_type, status, is_closed, balance_amount, currency, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.account_number)
        .bind(&customer.name)
        .bind(customer.phone.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.assigned_collector.map(|c| *c.as_uuid()))
        .bind(customer.plan_id.map(|p| *p.as_uuid()))
        .bind(account_type_str(customer.account_type))
        .bind(account_status_str(customer.status))
        .bind(customer.is_closed)
        .bind(customer.balance.amount())
        .bind(customer.balance.currency().code())
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn customer(&self, id: CustomerId) -> Result<Option<CustomerAccount>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        row.map(|r| r.into_customer().map_err(StoreError::from))
            .transpose()
    }

    async fn update_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE customers SET name = $2, phone = $3, address = $4, \
             assigned_collector = $5, plan_id = $6, account_type = $7, status = $8, \
             is_closed = $9, updated_at = $10 WHERE id = $1",
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(customer.phone.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.assigned_collector.map(|c| *c.as_uuid()))
        .bind(customer.plan_id.map(|p| *p.as_uuid()))
        .bind(account_type_str(customer.account_type))
        .bind(account_status_str(customer.status))
        .bind(customer.is_closed)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Customer", customer.id));
        }
        Ok(())
    }

    async fn customers(&self) -> Result<Vec<CustomerAccount>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{SELECT_CUSTOMER} ORDER BY account_number"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_customer().map_err(StoreError::from))
            .collect()
    }

    async fn customers_for_collector(
        &self,
        collector: CollectorId,
    ) -> Result<Vec<CustomerAccount>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{SELECT_CUSTOMER} WHERE assigned_collector = $1 ORDER BY account_number"
        ))
        .bind(collector.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_customer().map_err(StoreError::from))
            .collect()
    }

    async fn insert_collector(&self, collector: &Collector) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO collectors (id, name, phone, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(collector.id.as_uuid())
        .bind(&collector.name)
        .bind(collector.phone.as_deref())
        .bind(collector.is_active)
        .bind(collector.created_at)
        .bind(collector.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn collector(&self, id: CollectorId) -> Result<Option<Collector>, StoreError> {
        let row = sqlx::query_as::<_, CollectorRow>(&format!("{SELECT_COLLECTOR} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(row.map(Collector::from))
    }

    async fn update_collector(&self, collector: &Collector) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE collectors SET name = $2, phone = $3, is_active = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(collector.id.as_uuid())
        .bind(&collector.name)
        .bind(collector.phone.as_deref())
        .bind(collector.is_active)
        .bind(collector.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Collector", collector.id));
        }
        Ok(())
    }

    async fn collectors(&self) -> Result<Vec<Collector>, StoreError> {
        let rows = sqlx::query_as::<_, CollectorRow>(&format!("{SELECT_COLLECTOR} ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Collector::from).collect())
    }

    async fn insert_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO plans \
             (id, name, installment_amount, currency, frequency, duration_months, \
              is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.installment.amount())
        .bind(plan.installment.currency().code())
        .bind(frequency_str(plan.frequency))
        .bind(plan.duration_months as i32)
        .bind(plan.is_active)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn plan(&self, id: PlanId) -> Result<Option<SavingsPlan>, StoreError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!("{SELECT_PLAN} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        row.map(|r| r.into_plan().map_err(StoreError::from))
            .transpose()
    }

    async fn update_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE plans SET name = $2, installment_amount = $3, currency = $4, \
             frequency = $5, duration_months = $6, is_active = $7, updated_at = $8 \
             WHERE id = $1",
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.installment.amount())
        .bind(plan.installment.currency().code())
        .bind(frequency_str(plan.frequency))
        .bind(plan.duration_months as i32)
        .bind(plan.is_active)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("SavingsPlan", plan.id));
        }
        Ok(())
    }

    async fn plans(&self) -> Result<Vec<SavingsPlan>, StoreError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!("{SELECT_PLAN} ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_plan().map_err(StoreError::from))
            .collect()
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
        let notes = serde_json::to_value(&feedback.notes)
            .map_err(|e| DatabaseError::mapping(e.to_string()))?;
        sqlx::query(
            "INSERT INTO feedback (id, source, author, subject, status, notes, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(feedback.id.as_uuid())
        .bind(source_str(feedback.source))
        .bind(feedback.author)
        .bind(&feedback.subject)
        .bind(feedback_status_str(feedback.status))
        .bind(notes)
        .bind(feedback.created_at)
        .bind(feedback.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn feedback(&self, id: FeedbackId) -> Result<Option<Feedback>, StoreError> {
        let row = sqlx::query_as::<_, FeedbackRow>(&format!("{SELECT_FEEDBACK} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        row.map(|r| r.into_feedback().map_err(StoreError::from))
            .transpose()
    }

    async fn update_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
        let notes = serde_json::to_value(&feedback.notes)
            .map_err(|e| DatabaseError::mapping(e.to_string()))?;
        let result = sqlx::query(
            "UPDATE feedback SET status = $2, notes = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(feedback.id.as_uuid())
        .bind(feedback_status_str(feedback.status))
        .bind(notes)
        .bind(feedback.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Feedback", feedback.id));
        }
        Ok(())
    }

    async fn feedback_threads(&self) -> Result<Vec<Feedback>, StoreError> {
        let rows =
            sqlx::query_as::<_, FeedbackRow>(&format!("{SELECT_FEEDBACK} ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|r| r.into_feedback().map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_encodings_round_trip() {
        for value in [AccountType::Daily, AccountType::Weekly, AccountType::Monthly] {
            assert_eq!(parse_account_type(account_type_str(value)).unwrap(), value);
        }
        for value in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Suspended,
        ] {
            assert_eq!(
                parse_account_status(account_status_str(value)).unwrap(),
                value
            );
        }
        for value in [
            FeedbackStatus::New,
            FeedbackStatus::InProgress,
            FeedbackStatus::Resolved,
            FeedbackStatus::Closed,
        ] {
            assert_eq!(
                parse_feedback_status(feedback_status_str(value)).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_unknown_encodings_rejected() {
        assert!(parse_account_type("hourly").is_err());
        assert!(parse_frequency("fortnightly").is_err());
        assert!(parse_source("auditor").is_err());
    }
}
