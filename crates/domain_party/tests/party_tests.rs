//! Party service tests against the mock store

use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{Actor, CollectorId, Currency, Money};
use domain_party::ports::mock::MockPartyStore;
use domain_party::service::{CustomerUpdate, NewCustomer};
use domain_party::{
    AccountStatus, AccountType, FeedbackSource, FeedbackStatus, PartyError, PartyService,
    PlanFrequency,
};

fn service() -> PartyService {
    PartyService::new(Arc::new(MockPartyStore::new()), Currency::INR)
}

fn admin() -> Actor {
    Actor::admin(Uuid::new_v4())
}

fn new_customer(account_number: &str) -> NewCustomer {
    NewCustomer {
        account_number: account_number.to_string(),
        name: "Asha Rao".to_string(),
        phone: Some("9800000001".to_string()),
        address: None,
        account_type: AccountType::Daily,
        plan_id: None,
        assigned_collector: None,
    }
}

mod customer_tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_creates_customer() {
        let service = service();
        let customer = service
            .create_customer(admin(), new_customer("PGY-0001"))
            .await
            .unwrap();

        assert_eq!(customer.account_number, "PGY-0001");
        assert!(customer.balance.is_zero());
    }

    #[tokio::test]
    async fn test_collector_cannot_create_customer() {
        let service = service();
        let collector = Actor::collector(CollectorId::new());

        let result = service.create_customer(collector, new_customer("PGY-0002")).await;
        assert!(matches!(result, Err(PartyError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_duplicate_account_number_rejected() {
        let service = service();
        service
            .create_customer(admin(), new_customer("PGY-0003"))
            .await
            .unwrap();

        let result = service.create_customer(admin(), new_customer("PGY-0003")).await;
        assert!(matches!(result, Err(PartyError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_collector_sees_only_assigned_customers() {
        let service = service();
        let root = admin();

        let collector = service
            .create_collector(root, "Prakash".to_string(), None)
            .await
            .unwrap();

        let mine = service
            .create_customer(root, new_customer("PGY-0004"))
            .await
            .unwrap();
        service
            .create_customer(root, new_customer("PGY-0005"))
            .await
            .unwrap();
        service
            .assign_collector(root, mine.id, collector.id)
            .await
            .unwrap();

        let as_collector = Actor::collector(collector.id);
        let visible = service.list_customers(as_collector).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, mine.id);

        // Direct fetch of an unassigned customer is forbidden
        let all = service.list_customers(root).await.unwrap();
        let other = all.iter().find(|c| c.id != mine.id).unwrap();
        let result = service.get_customer(as_collector, other.id).await;
        assert!(matches!(result, Err(PartyError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_and_suspend() {
        let service = service();
        let root = admin();
        let customer = service
            .create_customer(root, new_customer("PGY-0006"))
            .await
            .unwrap();

        let updated = service
            .update_customer(
                root,
                customer.id,
                CustomerUpdate {
                    status: Some(AccountStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AccountStatus::Suspended);
        assert!(!updated.accepts_entries());
    }

    #[tokio::test]
    async fn test_close_twice_conflicts() {
        let service = service();
        let root = admin();
        let customer = service
            .create_customer(root, new_customer("PGY-0007"))
            .await
            .unwrap();

        service.close_customer(root, customer.id).await.unwrap();
        let result = service.close_customer(root, customer.id).await;
        assert!(matches!(result, Err(PartyError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_assigning_unknown_collector_fails() {
        let service = service();
        let root = admin();
        let customer = service
            .create_customer(root, new_customer("PGY-0008"))
            .await
            .unwrap();

        let result = service
            .assign_collector(root, customer.id, CollectorId::new())
            .await;
        assert!(matches!(result, Err(PartyError::NotFound(_))));
    }
}

mod plan_tests {
    use super::*;

    #[tokio::test]
    async fn test_plan_lifecycle() {
        let service = service();
        let root = admin();

        let plan = service
            .create_plan(
                root,
                "Daily 50".to_string(),
                Money::new(dec!(50), Currency::INR),
                PlanFrequency::Daily,
                12,
            )
            .await
            .unwrap();
        assert!(plan.is_active);

        let retired = service.deactivate_plan(root, plan.id).await.unwrap();
        assert!(!retired.is_active);

        // Customers cannot enroll into a retired plan
        let mut request = new_customer("PGY-0100");
        request.plan_id = Some(plan.id);
        let result = service.create_customer(root, request).await;
        assert!(matches!(result, Err(PartyError::Validation(_))));
    }
}

mod feedback_tests {
    use super::*;

    #[tokio::test]
    async fn test_feedback_thread_flow() {
        let service = service();
        let root = admin();
        let author = Uuid::new_v4();

        let thread = service
            .open_feedback(
                FeedbackSource::Customer,
                author,
                "Passbook not updated".to_string(),
                "Balance looks stale".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(thread.status, FeedbackStatus::New);

        let thread = service
            .add_feedback_note(thread.id, author, "Still not fixed".to_string())
            .await
            .unwrap();
        assert_eq!(thread.notes.len(), 2);

        let thread = service
            .change_feedback_status(root, thread.id, FeedbackStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(thread.status, FeedbackStatus::Resolved);
        // Status change appended an annotation note
        assert_eq!(thread.notes.len(), 3);
    }

    #[tokio::test]
    async fn test_only_admin_changes_status() {
        let service = service();
        let author = Uuid::new_v4();
        let thread = service
            .open_feedback(
                FeedbackSource::Collector,
                author,
                "Route issue".to_string(),
                "Two streets swapped".to_string(),
            )
            .await
            .unwrap();

        let collector = Actor::collector(CollectorId::new());
        let result = service
            .change_feedback_status(collector, thread.id, FeedbackStatus::Closed)
            .await;
        assert!(matches!(result, Err(PartyError::Forbidden(_))));
    }
}
