//! Ledger storage port
//!
//! Every mutating call carries the caller-computed balance so the entry
//! write and the cached balance update land atomically; an adapter backed
//! by a database does both inside one transaction, and the in-memory mock
//! does both under one lock.

use async_trait::async_trait;

use core_kernel::{CollectorId, Currency, CustomerId, DomainPort, EntryId, Money, StoreError};

use crate::entry::LedgerEntry;

#[async_trait]
pub trait LedgerStore: DomainPort {
    /// Inserts a new entry and writes the customer's new cached balance.
    async fn insert_entry(&self, entry: &LedgerEntry, balance: Money) -> Result<(), StoreError>;

    /// Fetches a single entry.
    async fn entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError>;

    /// All entries for one customer, oldest first by entry date.
    async fn entries_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// All entries a collector recorded, across their customers.
    async fn entries_recorded_by(
        &self,
        collector: CollectorId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Replaces an entry after a status transition and writes the
    /// customer's new cached balance in the same operation.
    async fn apply_transition(
        &self,
        entry: &LedgerEntry,
        balance: Money,
    ) -> Result<(), StoreError>;

    /// Removes an entry and writes the customer's new cached balance.
    async fn delete_entry(
        &self,
        id: EntryId,
        customer: CustomerId,
        balance: Money,
    ) -> Result<(), StoreError>;

    /// The cached balance; zero for customers with no ledger activity yet.
    async fn cached_balance(
        &self,
        customer: CustomerId,
        currency: Currency,
    ) -> Result<Money, StoreError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct Inner {
        entries: HashMap<EntryId, LedgerEntry>,
        balances: HashMap<CustomerId, Money>,
    }

    /// In-memory ledger store for tests. One lock guards entries and
    /// balances together, matching the atomicity the port promises.
    #[derive(Clone, Default)]
    pub struct MockLedgerStore {
        inner: Arc<RwLock<Inner>>,
    }

    impl MockLedgerStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored entries, for test assertions.
        pub async fn entry_count(&self) -> usize {
            self.inner.read().await.entries.len()
        }
    }

    impl DomainPort for MockLedgerStore {}

    #[async_trait]
    impl LedgerStore for MockLedgerStore {
        async fn insert_entry(
            &self,
            entry: &LedgerEntry,
            balance: Money,
        ) -> Result<(), StoreError> {
            let mut inner = self.inner.write().await;
            if inner.entries.contains_key(&entry.id) {
                return Err(StoreError::conflict(format!(
                    "entry {} already exists",
                    entry.id
                )));
            }
            inner.entries.insert(entry.id, entry.clone());
            inner.balances.insert(entry.customer_id, balance);
            Ok(())
        }

        async fn entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
            Ok(self.inner.read().await.entries.get(&id).cloned())
        }

        async fn entries_for_customer(
            &self,
            customer: CustomerId,
        ) -> Result<Vec<LedgerEntry>, StoreError> {
            let inner = self.inner.read().await;
            let mut entries: Vec<_> = inner
                .entries
                .values()
                .filter(|e| e.customer_id == customer)
                .cloned()
                .collect();
            entries.sort_by_key(|e| (e.entry_date, e.created_at, e.id));
            Ok(entries)
        }

        async fn entries_recorded_by(
            &self,
            collector: CollectorId,
        ) -> Result<Vec<LedgerEntry>, StoreError> {
            let inner = self.inner.read().await;
            let mut entries: Vec<_> = inner
                .entries
                .values()
                .filter(|e| e.recorded_by == Some(collector))
                .cloned()
                .collect();
            entries.sort_by_key(|e| (e.entry_date, e.created_at, e.id));
            Ok(entries)
        }

        async fn apply_transition(
            &self,
            entry: &LedgerEntry,
            balance: Money,
        ) -> Result<(), StoreError> {
            let mut inner = self.inner.write().await;
            if !inner.entries.contains_key(&entry.id) {
                return Err(StoreError::not_found("LedgerEntry", entry.id));
            }
            inner.entries.insert(entry.id, entry.clone());
            inner.balances.insert(entry.customer_id, balance);
            Ok(())
        }

        async fn delete_entry(
            &self,
            id: EntryId,
            customer: CustomerId,
            balance: Money,
        ) -> Result<(), StoreError> {
            let mut inner = self.inner.write().await;
            if inner.entries.remove(&id).is_none() {
                return Err(StoreError::not_found("LedgerEntry", id));
            }
            inner.balances.insert(customer, balance);
            Ok(())
        }

        async fn cached_balance(
            &self,
            customer: CustomerId,
            currency: Currency,
        ) -> Result<Money, StoreError> {
            let inner = self.inner.read().await;
            Ok(inner
                .balances
                .get(&customer)
                .copied()
                .unwrap_or_else(|| Money::zero(currency)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::Utc;
        use rust_decimal::Decimal;

        fn rupees(value: i64) -> Money {
            Money::new(Decimal::from(value), Currency::INR)
        }

        #[tokio::test]
        async fn test_insert_and_fetch() {
            let store = MockLedgerStore::new();
            let customer = CustomerId::new();
            let entry = LedgerEntry::in_hand_deposit(
                customer,
                rupees(100),
                Some(CollectorId::new()),
                Utc::now(),
            )
            .unwrap();

            store.insert_entry(&entry, rupees(0)).await.unwrap();
            let fetched = store.entry(entry.id).await.unwrap().unwrap();
            assert_eq!(fetched.id, entry.id);
            assert_eq!(
                store.cached_balance(customer, Currency::INR).await.unwrap(),
                rupees(0)
            );
        }

        #[tokio::test]
        async fn test_duplicate_insert_conflicts() {
            let store = MockLedgerStore::new();
            let entry = LedgerEntry::in_hand_deposit(
                CustomerId::new(),
                rupees(100),
                Some(CollectorId::new()),
                Utc::now(),
            )
            .unwrap();

            store.insert_entry(&entry, rupees(0)).await.unwrap();
            let result = store.insert_entry(&entry, rupees(0)).await;
            assert!(matches!(result, Err(StoreError::Conflict { .. })));
        }

        #[tokio::test]
        async fn test_unknown_customer_has_zero_balance() {
            let store = MockLedgerStore::new();
            let balance = store
                .cached_balance(CustomerId::new(), Currency::INR)
                .await
                .unwrap();
            assert!(balance.is_zero());
        }

        #[tokio::test]
        async fn test_delete_unknown_entry_is_not_found() {
            let store = MockLedgerStore::new();
            let result = store
                .delete_entry(EntryId::new(), CustomerId::new(), rupees(0))
                .await;
            assert!(matches!(result, Err(StoreError::NotFound { .. })));
        }
    }
}
