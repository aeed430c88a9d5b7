//! Party application service
//!
//! Record maintenance for customers, collectors, plans and feedback.
//! Writes are admin-only; reads are scoped by actor role the same way the
//! ledger gate scopes them (a collector sees only assigned customers).

use std::sync::Arc;

use tracing::info;

use core_kernel::{Actor, CollectorId, Currency, CustomerId, FeedbackId, PlanId};

use crate::collector::Collector;
use crate::customer::{AccountStatus, AccountType, CustomerAccount};
use crate::error::PartyError;
use crate::feedback::{Feedback, FeedbackSource, FeedbackStatus};
use crate::plan::{PlanFrequency, SavingsPlan};
use crate::ports::PartyStore;

/// Fields for opening a customer account
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub account_number: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub account_type: AccountType,
    pub plan_id: Option<PlanId>,
    pub assigned_collector: Option<CollectorId>,
}

/// Profile fields an admin may change after opening
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<AccountStatus>,
    pub plan_id: Option<PlanId>,
}

/// Application service for party records
pub struct PartyService {
    store: Arc<dyn PartyStore>,
    currency: Currency,
}

impl PartyService {
    pub fn new(store: Arc<dyn PartyStore>, currency: Currency) -> Self {
        Self { store, currency }
    }

    fn require_admin(actor: Actor, operation: &str) -> Result<(), PartyError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(PartyError::forbidden(format!(
                "{operation} requires the admin role"
            )))
        }
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Opens a customer account (Admin only)
    pub async fn create_customer(
        &self,
        actor: Actor,
        request: NewCustomer,
    ) -> Result<CustomerAccount, PartyError> {
        Self::require_admin(actor, "creating a customer")?;

        if let Some(plan_id) = request.plan_id {
            let plan = self
                .store
                .plan(plan_id)
                .await?
                .ok_or_else(|| PartyError::not_found(format!("plan {plan_id}")))?;
            if !plan.is_active {
                return Err(PartyError::validation(format!(
                    "plan {} is no longer active",
                    plan.name
                )));
            }
        }
        if let Some(collector_id) = request.assigned_collector {
            self.store
                .collector(collector_id)
                .await?
                .ok_or_else(|| PartyError::not_found(format!("collector {collector_id}")))?;
        }

        let mut customer = CustomerAccount::open(
            request.account_number,
            request.name,
            request.account_type,
            self.currency,
        )?;
        customer.phone = request.phone;
        customer.address = request.address;
        customer.plan_id = request.plan_id;
        customer.assigned_collector = request.assigned_collector;

        self.store.insert_customer(&customer).await.map_err(|e| {
            if matches!(e, core_kernel::StoreError::Conflict { .. }) {
                PartyError::Conflict(format!(
                    "account number {} already exists",
                    customer.account_number
                ))
            } else {
                e.into()
            }
        })?;

        info!(customer = %customer.id, account = %customer.account_number, "customer account opened");
        Ok(customer)
    }

    /// Updates profile fields (Admin only); the account number is immutable
    pub async fn update_customer(
        &self,
        actor: Actor,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<CustomerAccount, PartyError> {
        Self::require_admin(actor, "updating a customer")?;

        let mut customer = self.require_customer(id).await?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(PartyError::validation("customer name must not be empty"));
            }
            customer.name = name;
        }
        if let Some(phone) = update.phone {
            customer.phone = Some(phone);
        }
        if let Some(address) = update.address {
            customer.address = Some(address);
        }
        if let Some(status) = update.status {
            customer.set_status(status);
        }
        if let Some(plan_id) = update.plan_id {
            self.store
                .plan(plan_id)
                .await?
                .ok_or_else(|| PartyError::not_found(format!("plan {plan_id}")))?;
            customer.link_plan(plan_id);
        }
        customer.updated_at = chrono::Utc::now();

        self.store.update_customer(&customer).await?;
        Ok(customer)
    }

    /// Reassigns the responsible collector (Admin only)
    pub async fn assign_collector(
        &self,
        actor: Actor,
        customer_id: CustomerId,
        collector_id: CollectorId,
    ) -> Result<CustomerAccount, PartyError> {
        Self::require_admin(actor, "reassigning a collector")?;

        let collector = self
            .store
            .collector(collector_id)
            .await?
            .ok_or_else(|| PartyError::not_found(format!("collector {collector_id}")))?;
        if !collector.is_active {
            return Err(PartyError::validation(format!(
                "collector {} is inactive",
                collector.name
            )));
        }

        let mut customer = self.require_customer(customer_id).await?;
        customer.assign_collector(collector_id);
        self.store.update_customer(&customer).await?;

        info!(customer = %customer_id, collector = %collector_id, "collector reassigned");
        Ok(customer)
    }

    /// Soft-closes a customer account (Admin only)
    pub async fn close_customer(
        &self,
        actor: Actor,
        id: CustomerId,
    ) -> Result<CustomerAccount, PartyError> {
        Self::require_admin(actor, "closing a customer")?;

        let mut customer = self.require_customer(id).await?;
        customer.close()?;
        self.store.update_customer(&customer).await?;

        info!(customer = %id, "customer account closed");
        Ok(customer)
    }

    /// Fetches a customer the actor is allowed to see
    pub async fn get_customer(
        &self,
        actor: Actor,
        id: CustomerId,
    ) -> Result<CustomerAccount, PartyError> {
        let customer = self.require_customer(id).await?;
        if let Some(collector_id) = actor.collector_id() {
            if !customer.is_assigned_to(collector_id) {
                return Err(PartyError::forbidden(
                    "customer is not assigned to this collector",
                ));
            }
        }
        Ok(customer)
    }

    /// Lists customers visible to the actor
    pub async fn list_customers(&self, actor: Actor) -> Result<Vec<CustomerAccount>, PartyError> {
        match actor.collector_id() {
            Some(collector_id) => Ok(self.store.customers_for_collector(collector_id).await?),
            None => Ok(self.store.customers().await?),
        }
    }

    async fn require_customer(&self, id: CustomerId) -> Result<CustomerAccount, PartyError> {
        self.store
            .customer(id)
            .await?
            .ok_or_else(|| PartyError::not_found(format!("customer {id}")))
    }

    // ========================================================================
    // Collectors
    // ========================================================================

    /// Registers a collector (Admin only)
    pub async fn create_collector(
        &self,
        actor: Actor,
        name: String,
        phone: Option<String>,
    ) -> Result<Collector, PartyError> {
        Self::require_admin(actor, "registering a collector")?;

        let mut collector = Collector::register(name)?;
        collector.phone = phone;
        self.store.insert_collector(&collector).await?;

        info!(collector = %collector.id, "collector registered");
        Ok(collector)
    }

    /// Deactivates a collector (Admin only)
    pub async fn deactivate_collector(
        &self,
        actor: Actor,
        id: CollectorId,
    ) -> Result<Collector, PartyError> {
        Self::require_admin(actor, "deactivating a collector")?;

        let mut collector = self
            .store
            .collector(id)
            .await?
            .ok_or_else(|| PartyError::not_found(format!("collector {id}")))?;
        collector.deactivate();
        self.store.update_collector(&collector).await?;
        Ok(collector)
    }

    /// Lists collectors (Admin only)
    pub async fn list_collectors(&self, actor: Actor) -> Result<Vec<Collector>, PartyError> {
        Self::require_admin(actor, "listing collectors")?;
        Ok(self.store.collectors().await?)
    }

    // ========================================================================
    // Plans
    // ========================================================================

    /// Creates a savings plan (Admin only)
    pub async fn create_plan(
        &self,
        actor: Actor,
        name: String,
        installment: core_kernel::Money,
        frequency: PlanFrequency,
        duration_months: u32,
    ) -> Result<SavingsPlan, PartyError> {
        Self::require_admin(actor, "creating a plan")?;

        let plan = SavingsPlan::new(name, installment, frequency, duration_months)?;
        self.store.insert_plan(&plan).await?;
        Ok(plan)
    }

    /// Retires a plan from new enrollments (Admin only)
    pub async fn deactivate_plan(
        &self,
        actor: Actor,
        id: PlanId,
    ) -> Result<SavingsPlan, PartyError> {
        Self::require_admin(actor, "deactivating a plan")?;

        let mut plan = self
            .store
            .plan(id)
            .await?
            .ok_or_else(|| PartyError::not_found(format!("plan {id}")))?;
        plan.deactivate();
        self.store.update_plan(&plan).await?;
        Ok(plan)
    }

    /// Lists plans; any authenticated actor may browse them
    pub async fn list_plans(&self) -> Result<Vec<SavingsPlan>, PartyError> {
        Ok(self.store.plans().await?)
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Opens a feedback thread
    pub async fn open_feedback(
        &self,
        source: FeedbackSource,
        author: uuid::Uuid,
        subject: String,
        message: String,
    ) -> Result<Feedback, PartyError> {
        let thread = Feedback::open(source, author, subject, message)?;
        self.store.insert_feedback(&thread).await?;
        Ok(thread)
    }

    /// Appends a note to a thread
    pub async fn add_feedback_note(
        &self,
        id: FeedbackId,
        author: uuid::Uuid,
        body: String,
    ) -> Result<Feedback, PartyError> {
        let mut thread = self.require_feedback(id).await?;
        thread.add_note(author, body)?;
        self.store.update_feedback(&thread).await?;
        Ok(thread)
    }

    /// Moves a thread to a new status (Admin only)
    pub async fn change_feedback_status(
        &self,
        actor: Actor,
        id: FeedbackId,
        status: FeedbackStatus,
    ) -> Result<Feedback, PartyError> {
        Self::require_admin(actor, "changing feedback status")?;

        let mut thread = self.require_feedback(id).await?;
        thread.change_status(actor.id, status)?;
        self.store.update_feedback(&thread).await?;
        Ok(thread)
    }

    /// Lists feedback threads (Admin only)
    pub async fn list_feedback(&self, actor: Actor) -> Result<Vec<Feedback>, PartyError> {
        Self::require_admin(actor, "listing feedback")?;
        Ok(self.store.feedback_threads().await?)
    }

    async fn require_feedback(&self, id: FeedbackId) -> Result<Feedback, PartyError> {
        self.store
            .feedback(id)
            .await?
            .ok_or_else(|| PartyError::not_found(format!("feedback {id}")))
    }
}
