//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use chrono::{Duration, TimeZone, Utc};
use core_kernel::{Currency, Money};
use domain_ledger::PaymentMethod;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid positive amounts in paise
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for generating positive INR Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::INR))
}

/// Strategy for generating small installment-sized Money values
pub fn installment_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..10_000i64).prop_map(|rupees| Money::new(Decimal::new(rupees, 0), Currency::INR))
}

/// Strategy for generating payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![Just(PaymentMethod::InHand), Just(PaymentMethod::Online)]
}

/// Strategy for generating business dates within a collection year
pub fn entry_date_strategy() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    (0i64..365i64).prop_map(|days| {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating non-empty payment references
pub fn reference_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{3}-[0-9]{6}".prop_map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_positive_money_is_positive(money in positive_money_strategy()) {
            prop_assert!(money.is_positive());
            prop_assert_eq!(money.currency(), Currency::INR);
        }

        #[test]
        fn test_references_are_never_blank(reference in reference_strategy()) {
            prop_assert!(!reference.trim().is_empty());
        }
    }
}
