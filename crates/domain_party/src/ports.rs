//! Party domain ports
//!
//! [`PartyStore`] describes everything the party domain needs from its data
//! source. Adapters implement it against PostgreSQL (infra_db) or in memory
//! (the `mock` module, for tests and local development).

use async_trait::async_trait;

use core_kernel::{CollectorId, CustomerId, DomainPort, FeedbackId, PlanId, StoreError};

use crate::collector::Collector;
use crate::customer::CustomerAccount;
use crate::feedback::Feedback;
use crate::plan::SavingsPlan;

/// Storage port for party records
///
/// All methods return `Result<T, StoreError>` so adapters share a retry
/// classification. Writes are whole-record saves; records are small and the
/// service layer holds the mutation logic.
#[async_trait]
pub trait PartyStore: DomainPort {
    // Customers

    /// Inserts a new customer; fails with `Conflict` if the account number
    /// is already taken
    async fn insert_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError>;

    /// Fetches a customer by id
    async fn customer(&self, id: CustomerId) -> Result<Option<CustomerAccount>, StoreError>;

    /// Saves an updated customer record
    async fn update_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError>;

    /// Lists all customers
    async fn customers(&self) -> Result<Vec<CustomerAccount>, StoreError>;

    /// Lists customers assigned to a collector
    async fn customers_for_collector(
        &self,
        collector: CollectorId,
    ) -> Result<Vec<CustomerAccount>, StoreError>;

    // Collectors

    async fn insert_collector(&self, collector: &Collector) -> Result<(), StoreError>;

    async fn collector(&self, id: CollectorId) -> Result<Option<Collector>, StoreError>;

    async fn update_collector(&self, collector: &Collector) -> Result<(), StoreError>;

    async fn collectors(&self) -> Result<Vec<Collector>, StoreError>;

    // Plans

    async fn insert_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError>;

    async fn plan(&self, id: PlanId) -> Result<Option<SavingsPlan>, StoreError>;

    async fn update_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError>;

    async fn plans(&self) -> Result<Vec<SavingsPlan>, StoreError>;

    // Feedback

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StoreError>;

    async fn feedback(&self, id: FeedbackId) -> Result<Option<Feedback>, StoreError>;

    async fn update_feedback(&self, feedback: &Feedback) -> Result<(), StoreError>;

    async fn feedback_threads(&self) -> Result<Vec<Feedback>, StoreError>;
}

/// In-memory implementation of [`PartyStore`] for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock party store backed by hash maps
    #[derive(Debug, Default)]
    pub struct MockPartyStore {
        customers: Arc<RwLock<HashMap<CustomerId, CustomerAccount>>>,
        collectors: Arc<RwLock<HashMap<CollectorId, Collector>>>,
        plans: Arc<RwLock<HashMap<PlanId, SavingsPlan>>>,
        feedback: Arc<RwLock<HashMap<FeedbackId, Feedback>>>,
    }

    impl MockPartyStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockPartyStore {}

    #[async_trait]
    impl PartyStore for MockPartyStore {
        async fn insert_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError> {
            let mut customers = self.customers.write().await;
            if customers
                .values()
                .any(|c| c.account_number == customer.account_number)
            {
                return Err(StoreError::conflict(format!(
                    "account number {} already exists",
                    customer.account_number
                )));
            }
            customers.insert(customer.id, customer.clone());
            Ok(())
        }

        async fn customer(&self, id: CustomerId) -> Result<Option<CustomerAccount>, StoreError> {
            Ok(self.customers.read().await.get(&id).cloned())
        }

        async fn update_customer(&self, customer: &CustomerAccount) -> Result<(), StoreError> {
            let mut customers = self.customers.write().await;
            if !customers.contains_key(&customer.id) {
                return Err(StoreError::not_found("Customer", customer.id));
            }
            customers.insert(customer.id, customer.clone());
            Ok(())
        }

        async fn customers(&self) -> Result<Vec<CustomerAccount>, StoreError> {
            let mut all: Vec<_> = self.customers.read().await.values().cloned().collect();
            all.sort_by(|a, b| a.account_number.cmp(&b.account_number));
            Ok(all)
        }

        async fn customers_for_collector(
            &self,
            collector: CollectorId,
        ) -> Result<Vec<CustomerAccount>, StoreError> {
            let mut assigned: Vec<_> = self
                .customers
                .read()
                .await
                .values()
                .filter(|c| c.assigned_collector == Some(collector))
                .cloned()
                .collect();
            assigned.sort_by(|a, b| a.account_number.cmp(&b.account_number));
            Ok(assigned)
        }

        async fn insert_collector(&self, collector: &Collector) -> Result<(), StoreError> {
            self.collectors
                .write()
                .await
                .insert(collector.id, collector.clone());
            Ok(())
        }

        async fn collector(&self, id: CollectorId) -> Result<Option<Collector>, StoreError> {
            Ok(self.collectors.read().await.get(&id).cloned())
        }

        async fn update_collector(&self, collector: &Collector) -> Result<(), StoreError> {
            let mut collectors = self.collectors.write().await;
            if !collectors.contains_key(&collector.id) {
                return Err(StoreError::not_found("Collector", collector.id));
            }
            collectors.insert(collector.id, collector.clone());
            Ok(())
        }

        async fn collectors(&self) -> Result<Vec<Collector>, StoreError> {
            Ok(self.collectors.read().await.values().cloned().collect())
        }

        async fn insert_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError> {
            self.plans.write().await.insert(plan.id, plan.clone());
            Ok(())
        }

        async fn plan(&self, id: PlanId) -> Result<Option<SavingsPlan>, StoreError> {
            Ok(self.plans.read().await.get(&id).cloned())
        }

        async fn update_plan(&self, plan: &SavingsPlan) -> Result<(), StoreError> {
            let mut plans = self.plans.write().await;
            if !plans.contains_key(&plan.id) {
                return Err(StoreError::not_found("Plan", plan.id));
            }
            plans.insert(plan.id, plan.clone());
            Ok(())
        }

        async fn plans(&self) -> Result<Vec<SavingsPlan>, StoreError> {
            Ok(self.plans.read().await.values().cloned().collect())
        }

        async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
            self.feedback
                .write()
                .await
                .insert(feedback.id, feedback.clone());
            Ok(())
        }

        async fn feedback(&self, id: FeedbackId) -> Result<Option<Feedback>, StoreError> {
            Ok(self.feedback.read().await.get(&id).cloned())
        }

        async fn update_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
            let mut threads = self.feedback.write().await;
            if !threads.contains_key(&feedback.id) {
                return Err(StoreError::not_found("Feedback", feedback.id));
            }
            threads.insert(feedback.id, feedback.clone());
            Ok(())
        }

        async fn feedback_threads(&self) -> Result<Vec<Feedback>, StoreError> {
            Ok(self.feedback.read().await.values().cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPartyStore;
    use super::*;
    use crate::customer::AccountType;
    use core_kernel::Currency;

    #[tokio::test]
    async fn test_insert_and_fetch_customer() {
        let store = MockPartyStore::new();
        let customer =
            CustomerAccount::open("PGY-1001", "Asha Rao", AccountType::Daily, Currency::INR)
                .unwrap();
        store.insert_customer(&customer).await.unwrap();

        let fetched = store.customer(customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.account_number, "PGY-1001");
    }

    #[tokio::test]
    async fn test_duplicate_account_number_conflicts() {
        let store = MockPartyStore::new();
        let a = CustomerAccount::open("PGY-1001", "A", AccountType::Daily, Currency::INR).unwrap();
        let b = CustomerAccount::open("PGY-1001", "B", AccountType::Daily, Currency::INR).unwrap();
        store.insert_customer(&a).await.unwrap();

        let err = store.insert_customer(&b).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_customers_for_collector_filters() {
        let store = MockPartyStore::new();
        let collector = CollectorId::new();

        let mut mine =
            CustomerAccount::open("PGY-2001", "Mine", AccountType::Daily, Currency::INR).unwrap();
        mine.assign_collector(collector);
        let other =
            CustomerAccount::open("PGY-2002", "Other", AccountType::Daily, Currency::INR).unwrap();

        store.insert_customer(&mine).await.unwrap();
        store.insert_customer(&other).await.unwrap();

        let assigned = store.customers_for_collector(collector).await.unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, mine.id);
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let store = MockPartyStore::new();
        let ghost =
            CustomerAccount::open("PGY-3001", "Ghost", AccountType::Daily, Currency::INR).unwrap();
        let err = store.update_customer(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
