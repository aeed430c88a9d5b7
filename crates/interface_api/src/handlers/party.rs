//! Party handlers: customers, collectors, plans and feedback

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{Actor, CollectorId, CustomerId, FeedbackId, Money, PlanId};
use domain_party::service::{CustomerUpdate, NewCustomer};

use crate::dto::party::*;
use crate::{error::ApiError, AppState};

/// Opens a customer account (admin only)
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .parties
        .create_customer(
            actor,
            NewCustomer {
                account_number: request.account_number,
                name: request.name,
                phone: request.phone,
                address: request.address,
                account_type: request.account_type,
                plan_id: request.plan_id.map(PlanId::from_uuid),
                assigned_collector: request.assigned_collector.map(CollectorId::from_uuid),
            },
        )
        .await?;
    Ok(Json(customer.into()))
}

/// Lists customers visible to the actor
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.parties.list_customers(actor).await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Fetches one customer
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .parties
        .get_customer(actor, CustomerId::from_uuid(id))
        .await?;
    Ok(Json(customer.into()))
}

/// Updates customer profile fields (admin only)
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .parties
        .update_customer(
            actor,
            CustomerId::from_uuid(id),
            CustomerUpdate {
                name: request.name,
                phone: request.phone,
                address: request.address,
                status: request.status,
                plan_id: request.plan_id.map(PlanId::from_uuid),
            },
        )
        .await?;
    Ok(Json(customer.into()))
}

/// Reassigns the responsible collector (admin only)
pub async fn assign_collector(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignCollectorRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .parties
        .assign_collector(
            actor,
            CustomerId::from_uuid(id),
            CollectorId::from_uuid(request.collector_id),
        )
        .await?;
    Ok(Json(customer.into()))
}

/// Soft-closes a customer account (admin only)
pub async fn close_customer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .parties
        .close_customer(actor, CustomerId::from_uuid(id))
        .await?;
    Ok(Json(customer.into()))
}

/// Registers a collector (admin only)
pub async fn create_collector(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateCollectorRequest>,
) -> Result<Json<CollectorResponse>, ApiError> {
    let collector = state
        .parties
        .create_collector(actor, request.name, request.phone)
        .await?;
    Ok(Json(collector.into()))
}

/// Lists collectors (admin only)
pub async fn list_collectors(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<CollectorResponse>>, ApiError> {
    let collectors = state.parties.list_collectors(actor).await?;
    Ok(Json(collectors.into_iter().map(Into::into).collect()))
}

/// Deactivates a collector (admin only)
pub async fn deactivate_collector(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectorResponse>, ApiError> {
    let collector = state
        .parties
        .deactivate_collector(actor, CollectorId::from_uuid(id))
        .await?;
    Ok(Json(collector.into()))
}

/// Creates a savings plan (admin only)
pub async fn create_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state
        .parties
        .create_plan(
            actor,
            request.name,
            Money::new(request.installment, state.currency),
            request.frequency,
            request.duration_months,
        )
        .await?;
    Ok(Json(plan.into()))
}

/// Lists plans
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state.parties.list_plans().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// Retires a plan from new enrollments (admin only)
pub async fn deactivate_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state
        .parties
        .deactivate_plan(actor, PlanId::from_uuid(id))
        .await?;
    Ok(Json(plan.into()))
}

/// Opens a feedback thread
pub async fn open_feedback(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<OpenFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let thread = state
        .parties
        .open_feedback(request.source, actor.id, request.subject, request.message)
        .await?;
    Ok(Json(thread.into()))
}

/// Lists feedback threads (admin only)
pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let threads = state.parties.list_feedback(actor).await?;
    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

/// Appends a note to a feedback thread
pub async fn add_feedback_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let thread = state
        .parties
        .add_feedback_note(FeedbackId::from_uuid(id), actor.id, request.body)
        .await?;
    Ok(Json(thread.into()))
}

/// Moves a feedback thread to a new status (admin only)
pub async fn change_feedback_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeFeedbackStatusRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let thread = state
        .parties
        .change_feedback_status(actor, FeedbackId::from_uuid(id), request.status)
        .await?;
    Ok(Json(thread.into()))
}
