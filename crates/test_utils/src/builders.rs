//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about and take defaults for
//! everything else.

use chrono::{DateTime, Utc};
use core_kernel::{CollectorId, Currency, CustomerId, Money, PlanId};
use domain_ledger::LedgerEntry;
use domain_party::{AccountStatus, AccountType, CustomerAccount};

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builder for constructing test customer accounts
pub struct CustomerBuilder {
    account_number: String,
    name: String,
    account_type: AccountType,
    currency: Currency,
    assigned_collector: Option<CollectorId>,
    plan_id: Option<PlanId>,
    status: AccountStatus,
    closed: bool,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            account_number: "PGV-0001".to_string(),
            name: "Savitri Devi".to_string(),
            account_type: AccountType::Daily,
            currency: Currency::INR,
            assigned_collector: None,
            plan_id: None,
            status: AccountStatus::Active,
            closed: false,
        }
    }

    /// Sets the account number
    pub fn with_account_number(mut self, number: impl Into<String>) -> Self {
        self.account_number = number.into();
        self
    }

    /// Sets the customer name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the collection cadence
    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    /// Assigns the responsible collector
    pub fn with_collector(mut self, collector: CollectorId) -> Self {
        self.assigned_collector = Some(collector);
        self
    }

    /// Links a savings plan
    pub fn with_plan(mut self, plan: PlanId) -> Self {
        self.plan_id = Some(plan);
        self
    }

    /// Sets the operational status
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the account closed
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Builds the customer account
    pub fn build(self) -> CustomerAccount {
        let mut customer = CustomerAccount::open(
            self.account_number,
            self.name,
            self.account_type,
            self.currency,
        )
        .expect("builder defaults must be valid");
        if let Some(collector) = self.assigned_collector {
            customer.assign_collector(collector);
        }
        if let Some(plan) = self.plan_id {
            customer.link_plan(plan);
        }
        customer.set_status(self.status);
        if self.closed {
            customer.close().expect("fresh account can be closed");
        }
        customer
    }
}

/// Builder for constructing test ledger entries
pub struct EntryBuilder {
    customer_id: CustomerId,
    amount: Money,
    recorded_by: Option<CollectorId>,
    entry_date: DateTime<Utc>,
}

impl EntryBuilder {
    /// Creates a builder for entries against the given customer
    pub fn for_customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            amount: MoneyFixtures::inr_100(),
            recorded_by: None,
            entry_date: TemporalFixtures::collection_day(),
        }
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the recording collector
    pub fn recorded_by(mut self, collector: CollectorId) -> Self {
        self.recorded_by = Some(collector);
        self
    }

    /// Sets the business date
    pub fn on(mut self, entry_date: DateTime<Utc>) -> Self {
        self.entry_date = entry_date;
        self
    }

    /// Builds a pending in-hand deposit
    pub fn in_hand_deposit(self) -> LedgerEntry {
        LedgerEntry::in_hand_deposit(
            self.customer_id,
            self.amount,
            self.recorded_by,
            self.entry_date,
        )
        .expect("builder defaults must be valid")
    }

    /// Builds an approved online deposit with the given reference
    pub fn online_deposit(self, reference: impl Into<String>) -> LedgerEntry {
        LedgerEntry::online_deposit(
            self.customer_id,
            self.amount,
            reference.into(),
            self.recorded_by,
            self.entry_date,
        )
        .expect("builder defaults must be valid")
    }

    /// Builds a pending withdrawal with the given purpose
    pub fn withdrawal(self, purpose: impl Into<String>) -> LedgerEntry {
        LedgerEntry::withdrawal(
            self.customer_id,
            self.amount,
            purpose.into(),
            self.recorded_by,
            self.entry_date,
        )
        .expect("builder defaults must be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::IdFixtures;
    use domain_ledger::EntryStatus;

    #[test]
    fn test_customer_builder_defaults() {
        let customer = CustomerBuilder::new().build();
        assert!(customer.accepts_entries());
        assert!(customer.assigned_collector.is_none());
        assert!(customer.balance.is_zero());
    }

    #[test]
    fn test_customer_builder_with_collector() {
        let collector = IdFixtures::collector_id();
        let customer = CustomerBuilder::new().with_collector(collector).build();
        assert!(customer.is_assigned_to(collector));
    }

    #[test]
    fn test_entry_builder_statuses() {
        let customer = IdFixtures::customer_id();
        let in_hand = EntryBuilder::for_customer(customer).in_hand_deposit();
        assert_eq!(in_hand.status, EntryStatus::Pending);

        let online = EntryBuilder::for_customer(customer).online_deposit("UPI-1");
        assert_eq!(online.status, EntryStatus::Approved);

        let withdrawal = EntryBuilder::for_customer(customer).withdrawal("school fees");
        assert_eq!(withdrawal.status, EntryStatus::Pending);
    }
}
