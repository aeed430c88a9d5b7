//! Balance projection
//!
//! The authoritative balance is a fold over approved entries: approved
//! deposits add, approved withdrawals subtract, pending and rejected
//! entries contribute nothing. Addition is commutative, so the result is
//! independent of entry order. The cached balance stored alongside the
//! customer row must always equal a fresh projection.

use core_kernel::{Currency, Money};

use crate::entry::{EntryStatus, LedgerEntry};
use crate::error::LedgerError;

/// The balance and its two components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceProjection {
    pub balance: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
}

impl BalanceProjection {
    pub fn zero(currency: Currency) -> Self {
        Self {
            balance: Money::zero(currency),
            total_deposits: Money::zero(currency),
            total_withdrawals: Money::zero(currency),
        }
    }
}

/// Folds the entries into a projection. Errors only on currency
/// mismatches, which indicate corrupt data rather than user input.
pub fn project<'a, I>(entries: I, currency: Currency) -> Result<BalanceProjection, LedgerError>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut deposits = Money::zero(currency);
    let mut withdrawals = Money::zero(currency);

    for entry in entries {
        if entry.status != EntryStatus::Approved {
            continue;
        }
        if entry.is_deposit() {
            deposits = deposits.checked_add(&entry.amount)?;
        } else {
            withdrawals = withdrawals.checked_add(&entry.amount)?;
        }
    }

    Ok(BalanceProjection {
        balance: deposits.checked_sub(&withdrawals)?,
        total_deposits: deposits,
        total_withdrawals: withdrawals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{CollectorId, CustomerId};
    use rust_decimal::Decimal;

    use crate::approval::{apply, EntryAction};
    use core_kernel::Actor;
    use uuid::Uuid;

    fn approved_deposit(customer: CustomerId, amount: i64) -> LedgerEntry {
        let entry = LedgerEntry::in_hand_deposit(
            customer,
            Money::new(Decimal::from(amount), Currency::INR),
            Some(CollectorId::new()),
            Utc::now(),
        )
        .unwrap();
        apply(entry, EntryAction::Approve, Actor::admin(Uuid::new_v4()), None).unwrap()
    }

    fn approved_withdrawal(customer: CustomerId, amount: i64) -> LedgerEntry {
        let entry = LedgerEntry::withdrawal(
            customer,
            Money::new(Decimal::from(amount), Currency::INR),
            "household".to_string(),
            None,
            Utc::now(),
        )
        .unwrap();
        apply(entry, EntryAction::Approve, Actor::admin(Uuid::new_v4()), None).unwrap()
    }

    #[test]
    fn test_pending_and_rejected_do_not_count() {
        let customer = CustomerId::new();
        let pending = LedgerEntry::in_hand_deposit(
            customer,
            Money::new(Decimal::from(900), Currency::INR),
            Some(CollectorId::new()),
            Utc::now(),
        )
        .unwrap();
        let rejected = apply(
            pending.clone(),
            EntryAction::Reject,
            Actor::admin(Uuid::new_v4()),
            Some("cash never arrived".to_string()),
        )
        .unwrap();
        let approved = approved_deposit(customer, 500);

        let projection =
            project([&pending, &rejected, &approved], Currency::INR).unwrap();
        assert_eq!(
            projection.balance,
            Money::new(Decimal::from(500), Currency::INR)
        );
    }

    #[test]
    fn test_withdrawals_subtract() {
        let customer = CustomerId::new();
        let entries = [
            approved_deposit(customer, 500),
            approved_deposit(customer, 300),
            approved_withdrawal(customer, 200),
        ];
        let projection = project(entries.iter(), Currency::INR).unwrap();
        assert_eq!(
            projection.balance,
            Money::new(Decimal::from(600), Currency::INR)
        );
        assert_eq!(
            projection.total_deposits,
            Money::new(Decimal::from(800), Currency::INR)
        );
        assert_eq!(
            projection.total_withdrawals,
            Money::new(Decimal::from(200), Currency::INR)
        );
    }

    #[test]
    fn test_projection_is_order_independent() {
        let customer = CustomerId::new();
        let mut entries = vec![
            approved_deposit(customer, 125),
            approved_withdrawal(customer, 40),
            approved_deposit(customer, 75),
            approved_withdrawal(customer, 10),
        ];
        let forward = project(entries.iter(), Currency::INR).unwrap();
        entries.reverse();
        let reverse = project(entries.iter(), Currency::INR).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_empty_ledger_projects_zero() {
        let projection = project(std::iter::empty(), Currency::INR).unwrap();
        assert_eq!(projection, BalanceProjection::zero(Currency::INR));
    }
}
