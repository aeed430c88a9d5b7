//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more
//! meaningful failure messages than the standard macros.

use core_kernel::Money;
use domain_ledger::{EntryStatus, LedgerEntry};

/// Asserts that two Money values are equal in both currency and amount
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency().code(),
        expected.currency().code()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Money amounts differ: actual={}, expected={}",
        actual.amount(),
        expected.amount()
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that money values sum to a total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that an entry carries the expected status
pub fn assert_entry_status(entry: &LedgerEntry, expected: EntryStatus) {
    assert_eq!(
        entry.status, expected,
        "Entry {} has status {}, expected {}",
        entry.id, entry.status, expected
    );
}

/// Asserts that a decided entry records who handled it
pub fn assert_entry_handled(entry: &LedgerEntry) {
    assert!(
        entry.is_terminal(),
        "Entry {} is still pending, expected a decided entry",
        entry.id
    );
    assert!(
        entry.handled_by.is_some(),
        "Decided entry {} records no handler",
        entry.id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::EntryBuilder;
    use crate::fixtures::{IdFixtures, MoneyFixtures};

    #[test]
    fn test_money_sum() {
        let parts = [MoneyFixtures::inr_100(), MoneyFixtures::inr_300()];
        let total = Money::new(
            rust_decimal_macros::dec!(400.00),
            core_kernel::Currency::INR,
        );
        assert_money_sum_equals(&parts, &total);
    }

    #[test]
    #[should_panic(expected = "has status pending")]
    fn test_entry_status_mismatch_panics() {
        let entry = EntryBuilder::for_customer(IdFixtures::customer_id()).in_hand_deposit();
        assert_entry_status(&entry, EntryStatus::Approved);
    }
}
