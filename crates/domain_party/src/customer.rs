//! Customer account aggregate
//!
//! A pigmy customer account. The `balance` field is a cache derived from the
//! ledger (sum of approved deposits minus approved withdrawals); it is
//! refreshed on every approval event and is never the source of truth —
//! recomputing from the ledger must always reproduce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CollectorId, Currency, CustomerId, Money, PlanId};

use crate::error::PartyError;

/// Collection cadence of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Daily,
    Weekly,
    Monthly,
}

/// Operational status of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

/// A customer's pigmy savings account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAccount {
    /// Unique identifier
    pub id: CustomerId,
    /// Unique, immutable account number
    pub account_number: String,
    /// Customer name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Collector responsible for this account, once assigned
    pub assigned_collector: Option<CollectorId>,
    /// Linked savings plan
    pub plan_id: Option<PlanId>,
    /// Collection cadence
    pub account_type: AccountType,
    /// Operational status
    pub status: AccountStatus,
    /// Soft-close flag; closed accounts are kept while ledger entries reference them
    pub is_closed: bool,
    /// Cached balance, derived from the ledger
    pub balance: Money,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl CustomerAccount {
    /// Opens a new account with a zero balance
    pub fn open(
        account_number: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<Self, PartyError> {
        let account_number = account_number.into();
        if account_number.trim().is_empty() {
            return Err(PartyError::validation("account number must not be empty"));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PartyError::validation("customer name must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: CustomerId::new_v7(),
            account_number,
            name,
            phone: None,
            address: None,
            assigned_collector: None,
            plan_id: None,
            account_type,
            status: AccountStatus::Active,
            is_closed: false,
            balance: Money::zero(currency),
            created_at: now,
            updated_at: now,
        })
    }

    /// Assigns (or reassigns) the responsible collector
    pub fn assign_collector(&mut self, collector: CollectorId) {
        self.assigned_collector = Some(collector);
        self.updated_at = Utc::now();
    }

    /// Links a savings plan
    pub fn link_plan(&mut self, plan: PlanId) {
        self.plan_id = Some(plan);
        self.updated_at = Utc::now();
    }

    /// Changes the operational status
    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Soft-closes the account; ledger history stays intact
    pub fn close(&mut self) -> Result<(), PartyError> {
        if self.is_closed {
            return Err(PartyError::Conflict(format!(
                "account {} is already closed",
                self.account_number
            )));
        }
        self.is_closed = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if the account can take new ledger entries
    pub fn accepts_entries(&self) -> bool {
        !self.is_closed && self.status == AccountStatus::Active
    }

    /// Returns true if the given collector is assigned to this account
    pub fn is_assigned_to(&self, collector: CollectorId) -> bool {
        self.assigned_collector == Some(collector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_starts_active_with_zero_balance() {
        let account =
            CustomerAccount::open("PGY-0001", "Asha Rao", AccountType::Daily, Currency::INR)
                .unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert!(!account.is_closed);
        assert!(account.balance.is_zero());
        assert!(account.assigned_collector.is_none());
        assert!(account.accepts_entries());
    }

    #[test]
    fn test_open_rejects_blank_account_number() {
        let result = CustomerAccount::open("  ", "Asha Rao", AccountType::Daily, Currency::INR);
        assert!(matches!(result, Err(PartyError::Validation(_))));
    }

    #[test]
    fn test_close_is_not_idempotent() {
        let mut account =
            CustomerAccount::open("PGY-0002", "Ravi Kumar", AccountType::Weekly, Currency::INR)
                .unwrap();
        account.close().unwrap();
        assert!(account.is_closed);
        assert!(!account.accepts_entries());
        assert!(matches!(account.close(), Err(PartyError::Conflict(_))));
    }

    #[test]
    fn test_suspended_account_rejects_entries() {
        let mut account =
            CustomerAccount::open("PGY-0003", "Meena Patil", AccountType::Monthly, Currency::INR)
                .unwrap();
        account.set_status(AccountStatus::Suspended);
        assert!(!account.accepts_entries());
    }

    #[test]
    fn test_collector_assignment() {
        let mut account =
            CustomerAccount::open("PGY-0004", "Suresh Naik", AccountType::Daily, Currency::INR)
                .unwrap();
        let collector = CollectorId::new();
        account.assign_collector(collector);
        assert!(account.is_assigned_to(collector));
        assert!(!account.is_assigned_to(CollectorId::new()));
    }
}
