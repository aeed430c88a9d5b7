//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the savings system.
//! These fixtures are designed to be consistent and predictable for unit
//! tests: amounts are round rupee figures and identifiers are stable.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Actor, CollectorId, Currency, CustomerId, EntryId, Money, PlanId};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard daily installment
    pub fn inr_100() -> Money {
        Money::new(dec!(100.00), Currency::INR)
    }

    /// A larger deposit amount
    pub fn inr_500() -> Money {
        Money::new(dec!(500.00), Currency::INR)
    }

    /// A typical withdrawal amount
    pub fn inr_300() -> Money {
        Money::new(dec!(300.00), Currency::INR)
    }

    /// A zero balance
    pub fn inr_zero() -> Money {
        Money::zero(Currency::INR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A stable collection-day timestamp
    pub fn collection_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    /// The following collection day
    pub fn next_collection_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 11, 9, 0, 0).unwrap()
    }

    /// A timestamp well before any fixture entry
    pub fn before_collections() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic customer ID for testing
    pub fn customer_id() -> CustomerId {
        CustomerId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic collector ID for testing
    pub fn collector_id() -> CollectorId {
        CollectorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic plan ID for testing
    pub fn plan_id() -> PlanId {
        PlanId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic entry ID for testing
    pub fn entry_id() -> EntryId {
        EntryId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }
}

/// Fixture for acting users
pub struct ActorFixtures;

impl ActorFixtures {
    /// A back-office admin with a stable identity
    pub fn admin() -> Actor {
        Actor::admin(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440010").unwrap())
    }

    /// The collector matching [`IdFixtures::collector_id`]
    pub fn collector() -> Actor {
        Actor::collector(IdFixtures::collector_id())
    }

    /// A collector with a different identity, for access-control tests
    pub fn other_collector() -> Actor {
        Actor::collector(CollectorId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440011").unwrap(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_stable() {
        assert_eq!(IdFixtures::customer_id(), IdFixtures::customer_id());
        assert_ne!(
            IdFixtures::customer_id().as_uuid(),
            IdFixtures::collector_id().as_uuid()
        );
    }

    #[test]
    fn test_collector_actor_matches_fixture_id() {
        let actor = ActorFixtures::collector();
        assert_eq!(actor.collector_id(), Some(IdFixtures::collector_id()));
    }
}
