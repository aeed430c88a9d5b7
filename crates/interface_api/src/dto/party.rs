//! Party DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_party::{
    AccountStatus, AccountType, Collector, CustomerAccount, Feedback, FeedbackSource,
    FeedbackStatus, PlanFrequency, SavingsPlan,
};

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub account_number: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub account_type: AccountType,
    pub plan_id: Option<Uuid>,
    pub assigned_collector: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<AccountStatus>,
    pub plan_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AssignCollectorRequest {
    pub collector_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateCollectorRequest {
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub installment: Decimal,
    pub frequency: PlanFrequency,
    pub duration_months: u32,
}

#[derive(Debug, Deserialize)]
pub struct OpenFeedbackRequest {
    pub source: FeedbackSource,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeFeedbackStatusRequest {
    pub status: FeedbackStatus,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub account_number: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_collector: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<Uuid>,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub is_closed: bool,
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerAccount> for CustomerResponse {
    fn from(customer: CustomerAccount) -> Self {
        Self {
            id: *customer.id.as_uuid(),
            account_number: customer.account_number,
            name: customer.name,
            phone: customer.phone,
            address: customer.address,
            assigned_collector: customer.assigned_collector.map(|c| *c.as_uuid()),
            plan_id: customer.plan_id.map(|p| *p.as_uuid()),
            account_type: customer.account_type,
            status: customer.status,
            is_closed: customer.is_closed,
            balance: customer.balance.amount(),
            currency: customer.balance.currency().code().to_string(),
            created_at: customer.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectorResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Collector> for CollectorResponse {
    fn from(collector: Collector) -> Self {
        Self {
            id: *collector.id.as_uuid(),
            name: collector.name,
            phone: collector.phone,
            is_active: collector.is_active,
            created_at: collector.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub installment: Decimal,
    pub currency: String,
    pub frequency: PlanFrequency,
    pub duration_months: u32,
    pub expected_installments: u32,
    pub maturity_value: Decimal,
    pub is_active: bool,
}

impl From<SavingsPlan> for PlanResponse {
    fn from(plan: SavingsPlan) -> Self {
        Self {
            id: *plan.id.as_uuid(),
            name: plan.name.clone(),
            installment: plan.installment.amount(),
            currency: plan.installment.currency().code().to_string(),
            frequency: plan.frequency,
            duration_months: plan.duration_months,
            expected_installments: plan.expected_installments(),
            maturity_value: plan.maturity_value().amount(),
            is_active: plan.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackNoteResponse {
    pub author: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub source: FeedbackSource,
    pub author: Uuid,
    pub subject: String,
    pub status: FeedbackStatus,
    pub notes: Vec<FeedbackNoteResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(thread: Feedback) -> Self {
        Self {
            id: *thread.id.as_uuid(),
            source: thread.source,
            author: thread.author,
            subject: thread.subject,
            status: thread.status,
            notes: thread
                .notes
                .into_iter()
                .map(|n| FeedbackNoteResponse {
                    author: n.author,
                    body: n.body,
                    created_at: n.created_at,
                })
                .collect(),
            created_at: thread.created_at,
        }
    }
}
