//! Ledger entries: deposits and withdrawal requests
//!
//! An entry is the unit everything else in this crate operates on. It is
//! born in the state its channel dictates (in-hand deposits and all
//! withdrawals start `Pending`, online deposits start `Approved`) and the
//! approval state machine in [`crate::approval`] is the only code allowed
//! to move it afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Actor, CollectorId, CustomerId, EntryId, Money};

use crate::error::LedgerError;

/// How a deposit reached the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash handed to the collector on their route
    InHand,
    /// Customer-initiated transfer with a payment reference
    Online,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::InHand => write!(f, "in_hand"),
            PaymentMethod::Online => write!(f, "online"),
        }
    }
}

/// Workflow state of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "pending"),
            EntryStatus::Approved => write!(f, "approved"),
            EntryStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// What kind of movement the entry records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Deposit {
        method: PaymentMethod,
        /// Payment reference, present iff the method is `Online`
        reference: Option<String>,
    },
    Withdrawal {
        /// Why the customer wants the money out
        purpose: String,
    },
}

/// A single row in a customer's passbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub customer_id: CustomerId,
    pub kind: EntryKind,
    pub amount: Money,
    pub status: EntryStatus,
    /// Required when status is `Rejected`
    pub rejection_reason: Option<String>,
    /// Collector who keyed the entry in; `None` for customer-initiated
    /// online deposits
    pub recorded_by: Option<CollectorId>,
    /// Who approved or rejected the entry
    pub handled_by: Option<Actor>,
    /// Business date of the movement, distinct from the audit timestamps
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Cash deposit collected on a route. Starts pending until the
    /// collector (or an admin) confirms the cash actually came in.
    pub fn in_hand_deposit(
        customer_id: CustomerId,
        amount: Money,
        recorded_by: Option<CollectorId>,
        entry_date: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        require_positive(amount)?;
        Ok(Self::build(
            customer_id,
            EntryKind::Deposit {
                method: PaymentMethod::InHand,
                reference: None,
            },
            amount,
            EntryStatus::Pending,
            recorded_by,
            entry_date,
        ))
    }

    /// Online deposit confirmed by the payment channel. Enters the ledger
    /// already approved; only an admin reversal can take it back out.
    pub fn online_deposit(
        customer_id: CustomerId,
        amount: Money,
        reference: String,
        recorded_by: Option<CollectorId>,
        entry_date: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        require_positive(amount)?;
        if reference.trim().is_empty() {
            return Err(LedgerError::validation(
                "Online deposits require a payment reference",
            ));
        }
        Ok(Self::build(
            customer_id,
            EntryKind::Deposit {
                method: PaymentMethod::Online,
                reference: Some(reference),
            },
            amount,
            EntryStatus::Approved,
            recorded_by,
            entry_date,
        ))
    }

    /// Withdrawal request. Always pending; the amount was already checked
    /// against the projected balance by the service before this is built.
    pub fn withdrawal(
        customer_id: CustomerId,
        amount: Money,
        purpose: String,
        recorded_by: Option<CollectorId>,
        entry_date: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        require_positive(amount)?;
        if purpose.trim().is_empty() {
            return Err(LedgerError::validation(
                "Withdrawal requests require a purpose",
            ));
        }
        Ok(Self::build(
            customer_id,
            EntryKind::Withdrawal { purpose },
            amount,
            EntryStatus::Pending,
            recorded_by,
            entry_date,
        ))
    }

    fn build(
        customer_id: CustomerId,
        kind: EntryKind,
        amount: Money,
        status: EntryStatus,
        recorded_by: Option<CollectorId>,
        entry_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            customer_id,
            kind,
            amount,
            status,
            rejection_reason: None,
            recorded_by,
            handled_by: None,
            entry_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deposit(&self) -> bool {
        matches!(self.kind, EntryKind::Deposit { .. })
    }

    pub fn is_withdrawal(&self) -> bool {
        matches!(self.kind, EntryKind::Withdrawal { .. })
    }

    pub fn is_online_deposit(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Deposit {
                method: PaymentMethod::Online,
                ..
            }
        )
    }

    /// Rejected is terminal; approved is terminal except for the online
    /// deposit reversal.
    pub fn is_terminal(&self) -> bool {
        match self.status {
            EntryStatus::Pending => false,
            EntryStatus::Approved => !self.is_online_deposit(),
            EntryStatus::Rejected => true,
        }
    }
}

fn require_positive(amount: Money) -> Result<(), LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::validation("Amount must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal::Decimal;

    fn rupees(value: i64) -> Money {
        Money::new(Decimal::from(value), Currency::INR)
    }

    #[test]
    fn test_in_hand_deposit_starts_pending() {
        let entry = LedgerEntry::in_hand_deposit(
            CustomerId::new(),
            rupees(500),
            Some(CollectorId::new()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(entry.status, EntryStatus::Pending);
        assert!(entry.is_deposit());
        assert!(!entry.is_terminal());
    }

    #[test]
    fn test_online_deposit_starts_approved() {
        let entry = LedgerEntry::online_deposit(
            CustomerId::new(),
            rupees(750),
            "UPI-93841".to_string(),
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(entry.status, EntryStatus::Approved);
        assert!(entry.is_online_deposit());
        // Reversible, so not terminal yet
        assert!(!entry.is_terminal());
    }

    #[test]
    fn test_online_deposit_requires_reference() {
        let result = LedgerEntry::online_deposit(
            CustomerId::new(),
            rupees(100),
            "  ".to_string(),
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_zero_or_negative_amount_rejected() {
        let result = LedgerEntry::in_hand_deposit(
            CustomerId::new(),
            rupees(0),
            Some(CollectorId::new()),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let result = LedgerEntry::withdrawal(
            CustomerId::new(),
            rupees(-10),
            "school fees".to_string(),
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_withdrawal_requires_purpose() {
        let result =
            LedgerEntry::withdrawal(CustomerId::new(), rupees(50), String::new(), None, Utc::now());
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }
}
