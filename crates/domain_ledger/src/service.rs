//! Ledger application service
//!
//! Orchestrates the access gate, the approval state machine, the balance
//! projector and the storage port. Balance-affecting writes for one
//! customer are serialized through a per-customer async mutex: the entry
//! is re-read under the lock, the decision is made against that fresh
//! copy, and the entry write plus cached-balance update go to the store
//! as one call. Two concurrent decisions on the same entry therefore
//! resolve to exactly one winner; the loser sees `InvalidTransition`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use core_kernel::{Actor, Currency, CustomerId, EntryId, Money, Role};
use domain_party::ports::PartyStore;
use domain_party::CustomerAccount;

use crate::access::authorize;
use crate::approval::{self, EntryAction};
use crate::entry::{LedgerEntry, PaymentMethod};
use crate::error::LedgerError;
use crate::ports::LedgerStore;
use crate::projector::{project, BalanceProjection};
use crate::report::{summarize, ReportScope, SummaryReport};

/// A new deposit to record
#[derive(Debug, Clone)]
pub struct NewDeposit {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub method: PaymentMethod,
    /// Payment reference; required for online deposits, rejected otherwise
    pub reference: Option<String>,
    /// Business date; defaults to now
    pub entry_date: Option<DateTime<Utc>>,
}

/// A new withdrawal request
#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub purpose: String,
    pub entry_date: Option<DateTime<Utc>>,
}

/// A customer's passbook view
#[derive(Debug, Clone)]
pub struct Statement {
    /// Customer with the balance refreshed from the projection
    pub customer: CustomerAccount,
    /// Entries oldest first
    pub entries: Vec<LedgerEntry>,
    pub projection: BalanceProjection,
}

pub struct LedgerService {
    ledger: Arc<dyn LedgerStore>,
    parties: Arc<dyn PartyStore>,
    currency: Currency,
    locks: Mutex<HashMap<CustomerId, Arc<Mutex<()>>>>,
}

impl LedgerService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        parties: Arc<dyn PartyStore>,
        currency: Currency,
    ) -> Self {
        Self {
            ledger,
            parties,
            currency,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Records a deposit. In-hand deposits enter pending; online deposits
    /// enter approved and move the balance immediately.
    pub async fn record_deposit(
        &self,
        actor: Actor,
        deposit: NewDeposit,
    ) -> Result<LedgerEntry, LedgerError> {
        let customer = self.fetch_customer(deposit.customer_id).await?;
        authorize(actor, &customer)?;
        self.check_accepts(&customer)?;
        self.check_currency(deposit.amount)?;

        let entry_date = deposit.entry_date.unwrap_or_else(Utc::now);
        let lock = self.customer_lock(customer.id).await;
        let _guard = lock.lock().await;

        let entry = match deposit.method {
            PaymentMethod::InHand => {
                if deposit.reference.is_some() {
                    return Err(LedgerError::validation(
                        "In-hand deposits do not carry a payment reference",
                    ));
                }
                LedgerEntry::in_hand_deposit(
                    customer.id,
                    deposit.amount,
                    actor.collector_id(),
                    entry_date,
                )?
            }
            PaymentMethod::Online => LedgerEntry::online_deposit(
                customer.id,
                deposit.amount,
                deposit.reference.unwrap_or_default(),
                actor.collector_id(),
                entry_date,
            )?,
        };

        let balance = self.balance_with(customer.id, &entry).await?;
        self.ledger.insert_entry(&entry, balance).await?;

        tracing::info!(
            entry = %entry.id,
            customer = %customer.id,
            amount = %entry.amount,
            method = %deposit.method,
            status = %entry.status,
            actor = %actor,
            "deposit recorded"
        );
        Ok(entry)
    }

    /// Records a withdrawal request. The amount may not exceed the balance
    /// projected at request time; the check runs under the customer lock
    /// so concurrent requests cannot both fit into the same funds.
    pub async fn request_withdrawal(
        &self,
        actor: Actor,
        withdrawal: NewWithdrawal,
    ) -> Result<LedgerEntry, LedgerError> {
        let customer = self.fetch_customer(withdrawal.customer_id).await?;
        authorize(actor, &customer)?;
        self.check_accepts(&customer)?;
        self.check_currency(withdrawal.amount)?;

        let entry_date = withdrawal.entry_date.unwrap_or_else(Utc::now);
        let lock = self.customer_lock(customer.id).await;
        let _guard = lock.lock().await;

        let entries = self.ledger.entries_for_customer(customer.id).await?;
        let projection = project(entries.iter(), self.currency)?;
        let shortfall = withdrawal.amount.checked_sub(&projection.balance)?;
        if shortfall.is_positive() {
            return Err(LedgerError::validation(format!(
                "Withdrawal of {} exceeds available balance {}",
                withdrawal.amount, projection.balance
            )));
        }

        let entry = LedgerEntry::withdrawal(
            customer.id,
            withdrawal.amount,
            withdrawal.purpose,
            actor.collector_id(),
            entry_date,
        )?;
        // Pending entries leave the balance unchanged
        self.ledger.insert_entry(&entry, projection.balance).await?;

        tracing::info!(
            entry = %entry.id,
            customer = %customer.id,
            amount = %entry.amount,
            actor = %actor,
            "withdrawal requested"
        );
        Ok(entry)
    }

    /// Approves a pending entry.
    pub async fn approve(&self, actor: Actor, entry: EntryId) -> Result<LedgerEntry, LedgerError> {
        self.decide(actor, entry, EntryAction::Approve, None).await
    }

    /// Rejects a pending entry, or reverses an approved online deposit
    /// (admin only). Both require a non-empty reason.
    pub async fn reject(
        &self,
        actor: Actor,
        entry: EntryId,
        reason: String,
    ) -> Result<LedgerEntry, LedgerError> {
        self.decide(actor, entry, EntryAction::Reject, Some(reason))
            .await
    }

    /// Deletes a pending or rejected entry. Approved entries are part of
    /// the balance history and can only be reversed, never deleted.
    pub async fn delete_entry(&self, actor: Actor, entry_id: EntryId) -> Result<(), LedgerError> {
        let found = self.fetch_entry(entry_id).await?;
        let lock = self.customer_lock(found.customer_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent approval may have landed
        let entry = self.fetch_entry(entry_id).await?;
        let customer = self.fetch_customer(entry.customer_id).await?;
        authorize(actor, &customer)?;
        approval::check_transition(&entry, EntryAction::Delete)?;

        let entries = self.ledger.entries_for_customer(customer.id).await?;
        let remaining: Vec<_> = entries.iter().filter(|e| e.id != entry_id).collect();
        let projection = project(remaining.into_iter(), self.currency)?;
        self.ledger
            .delete_entry(entry_id, customer.id, projection.balance)
            .await?;

        tracing::info!(entry = %entry_id, customer = %customer.id, actor = %actor, "entry deleted");
        Ok(())
    }

    /// Full passbook for one customer, with the balance recomputed.
    pub async fn statement(
        &self,
        actor: Actor,
        customer_id: CustomerId,
    ) -> Result<Statement, LedgerError> {
        let mut customer = self.fetch_customer(customer_id).await?;
        authorize(actor, &customer)?;

        let entries = self.ledger.entries_for_customer(customer_id).await?;
        let projection = project(entries.iter(), self.currency)?;
        customer.balance = projection.balance;

        Ok(Statement {
            customer,
            entries,
            projection,
        })
    }

    /// Summary report over a scope. Collectors may only ask for their own
    /// book; admins may ask for any scope.
    pub async fn summary(
        &self,
        actor: Actor,
        scope: ReportScope,
    ) -> Result<SummaryReport, LedgerError> {
        if actor.role == Role::Collector {
            let own = actor.collector_id();
            match scope {
                ReportScope::Collector(id) if Some(id) == own => {}
                _ => {
                    return Err(LedgerError::forbidden(
                        "Collectors can only report on their own customers",
                    ))
                }
            }
        }

        let customers = match scope {
            ReportScope::All => self.parties.customers().await?,
            ReportScope::Collector(id) => self.parties.customers_for_collector(id).await?,
        };

        let mut rows = Vec::with_capacity(customers.len());
        for customer in customers {
            let entries = self.ledger.entries_for_customer(customer.id).await?;
            rows.push((customer, entries));
        }
        summarize(&rows, self.currency)
    }

    async fn decide(
        &self,
        actor: Actor,
        entry_id: EntryId,
        action: EntryAction,
        reason: Option<String>,
    ) -> Result<LedgerEntry, LedgerError> {
        let found = self.fetch_entry(entry_id).await?;
        let lock = self.customer_lock(found.customer_id).await;
        let _guard = lock.lock().await;

        // Fresh copy under the lock; this is what makes races single-winner
        let entry = self.fetch_entry(entry_id).await?;
        let customer = self.fetch_customer(entry.customer_id).await?;
        authorize(actor, &customer)?;

        let action = approval::normalize(&entry, action);
        approval::check_authority(actor, action)?;
        approval::check_transition(&entry, action)?;

        // Other approvals may have spent the funds since this withdrawal
        // was requested; the ceiling holds at approval time too.
        if action == EntryAction::Approve && entry.is_withdrawal() {
            let entries = self.ledger.entries_for_customer(customer.id).await?;
            let available = project(entries.iter(), self.currency)?.balance;
            let shortfall = entry.amount.checked_sub(&available)?;
            if shortfall.is_positive() {
                return Err(LedgerError::validation(format!(
                    "Withdrawal of {} exceeds available balance {}",
                    entry.amount, available
                )));
            }
        }

        let updated = approval::apply(entry, action, actor, reason)?;

        let balance = self.balance_with(customer.id, &updated).await?;
        self.ledger.apply_transition(&updated, balance).await?;

        tracing::info!(
            entry = %updated.id,
            customer = %customer.id,
            action = %action,
            status = %updated.status,
            balance = %balance,
            actor = %actor,
            "entry decided"
        );
        Ok(updated)
    }

    /// Projects the customer's balance with `entry` standing in for its
    /// stored version (or added, if not stored yet).
    async fn balance_with(
        &self,
        customer: CustomerId,
        entry: &LedgerEntry,
    ) -> Result<Money, LedgerError> {
        let mut entries = self.ledger.entries_for_customer(customer).await?;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(stored) => *stored = entry.clone(),
            None => entries.push(entry.clone()),
        }
        Ok(project(entries.iter(), self.currency)?.balance)
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<CustomerAccount, LedgerError> {
        self.parties
            .customer(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Customer {id}")))
    }

    async fn fetch_entry(&self, id: EntryId) -> Result<LedgerEntry, LedgerError> {
        self.ledger
            .entry(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Entry {id}")))
    }

    fn check_accepts(&self, customer: &CustomerAccount) -> Result<(), LedgerError> {
        if !customer.accepts_entries() {
            return Err(LedgerError::validation(format!(
                "Account {} is closed or not active",
                customer.account_number
            )));
        }
        Ok(())
    }

    fn check_currency(&self, amount: Money) -> Result<(), LedgerError> {
        if amount.currency() != self.currency {
            return Err(LedgerError::validation(format!(
                "Amounts must be in {}",
                self.currency
            )));
        }
        Ok(())
    }

    /// One lock per customer, kept for the life of the process. The map
    /// grows with the customer book and is never evicted; entries are a
    /// handful of bytes each.
    async fn customer_lock(&self, customer: CustomerId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(customer)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
