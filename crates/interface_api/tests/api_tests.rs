//! HTTP API tests against the mock stores
//!
//! Exercises the full request path: token validation, actor resolution,
//! handler dispatch, domain services and error mapping.

use std::sync::Arc;

use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

use core_kernel::{Actor, CollectorId, Currency, CustomerId};
use domain_ledger::ports::mock::MockLedgerStore;
use domain_ledger::LedgerService;
use domain_party::ports::mock::MockPartyStore;
use domain_party::ports::PartyStore;
use domain_party::{Collector, PartyService};
use interface_api::{auth::create_token, config::ApiConfig, create_router, AppState};
use test_utils::CustomerBuilder;

const TEST_SECRET: &str = "test-secret";

struct Harness {
    server: TestServer,
    customer: CustomerId,
    collector: CollectorId,
}

/// Boots the API over mock stores with one collector and one assigned
/// customer.
async fn harness() -> Harness {
    let parties = Arc::new(MockPartyStore::new());
    let ledger = Arc::new(MockLedgerStore::new());

    let collector = Collector::register("Prakash").unwrap();
    parties.insert_collector(&collector).await.unwrap();

    let customer = CustomerBuilder::new()
        .with_account_number("PGY-1001")
        .with_name("Asha Rao")
        .with_collector(collector.id)
        .build();
    parties.insert_customer(&customer).await.unwrap();

    let config = ApiConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..ApiConfig::default()
    };
    let state = AppState {
        ledger: Arc::new(LedgerService::new(
            ledger,
            parties.clone(),
            Currency::INR,
        )),
        parties: Arc::new(PartyService::new(parties, Currency::INR)),
        currency: Currency::INR,
        config,
    };

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        customer: customer.id,
        collector: collector.id,
    }
}

fn admin_token() -> String {
    create_token(Actor::admin(Uuid::new_v4()), TEST_SECRET, 60).unwrap()
}

fn collector_token(id: CollectorId) -> String {
    create_token(Actor::collector(id), TEST_SECRET, 60).unwrap()
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let hx = harness().await;
        let response = hx.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let hx = harness().await;
        let response = hx.server.get("/api/v1/customers").await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let hx = harness().await;
        let response = hx
            .server
            .get("/api/v1/customers")
            .authorization_bearer("not-a-jwt")
            .await;
        response.assert_status_unauthorized();
    }
}

mod deposit_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_in_hand_deposit_lifecycle_over_http() {
        let hx = harness().await;
        let token = collector_token(hx.collector);

        // Collector records an in-hand deposit; it lands pending.
        let response = hx
            .server
            .post("/api/v1/deposits")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": hx.customer.as_uuid(),
                "amount": dec!(500.00),
                "method": "in_hand",
            }))
            .await;
        response.assert_status_ok();
        let entry = response.json::<Value>();
        assert_eq!(entry["status"], "pending");
        let entry_id = entry["id"].as_str().unwrap().to_string();

        // Admin approves it.
        let response = hx
            .server
            .post(&format!("/api/v1/entries/{entry_id}/approve"))
            .authorization_bearer(&admin_token())
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "approved");

        // The statement now shows the money.
        let response = hx
            .server
            .get(&format!("/api/v1/customers/{}/statement", hx.customer.as_uuid()))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        let statement = response.json::<Value>();
        assert_eq!(statement["balance"], json!("500.00"));
        assert_eq!(statement["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_online_deposit_without_reference_is_unprocessable() {
        let hx = harness().await;
        let response = hx
            .server
            .post("/api/v1/deposits")
            .authorization_bearer(&collector_token(hx.collector))
            .json(&json!({
                "customer_id": hx.customer.as_uuid(),
                "amount": dec!(200.00),
                "method": "online",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unassigned_collector_is_forbidden() {
        let hx = harness().await;
        let stranger = collector_token(CollectorId::new());
        let response = hx
            .server
            .post("/api/v1/deposits")
            .authorization_bearer(&stranger)
            .json(&json!({
                "customer_id": hx.customer.as_uuid(),
                "amount": dec!(100.00),
                "method": "in_hand",
            }))
            .await;
        response.assert_status_forbidden();
    }
}

mod decision_tests {
    use super::*;

    async fn pending_deposit(hx: &Harness) -> String {
        let response = hx
            .server
            .post("/api/v1/deposits")
            .authorization_bearer(&collector_token(hx.collector))
            .json(&json!({
                "customer_id": hx.customer.as_uuid(),
                "amount": dec!(250.00),
                "method": "in_hand",
            }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_second_decision_conflicts() {
        let hx = harness().await;
        let entry_id = pending_deposit(&hx).await;
        let token = admin_token();

        hx.server
            .post(&format!("/api/v1/entries/{entry_id}/approve"))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let response = hx
            .server
            .post(&format!("/api/v1/entries/{entry_id}/reject"))
            .authorization_bearer(&token)
            .json(&json!({ "reason": "duplicate receipt" }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["error"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let hx = harness().await;
        let entry_id = pending_deposit(&hx).await;

        let response = hx
            .server
            .post(&format!("/api/v1/entries/{entry_id}/reject"))
            .authorization_bearer(&admin_token())
            .json(&json!({ "reason": "   " }))
            .await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_approved_entry_conflicts() {
        let hx = harness().await;
        let entry_id = pending_deposit(&hx).await;
        let token = admin_token();

        hx.server
            .post(&format!("/api/v1/entries/{entry_id}/approve"))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let response = hx
            .server
            .delete(&format!("/api/v1/entries/{entry_id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_entry_is_not_found() {
        let hx = harness().await;
        let response = hx
            .server
            .post(&format!("/api/v1/entries/{}/approve", Uuid::new_v4()))
            .authorization_bearer(&admin_token())
            .await;
        response.assert_status_not_found();
    }
}

mod party_tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_creates_customer_and_collector_cannot() {
        let hx = harness().await;

        let body = json!({
            "account_number": "PGY-2002",
            "name": "Meena Kumari",
            "account_type": "daily",
        });

        let response = hx
            .server
            .post("/api/v1/customers")
            .authorization_bearer(&admin_token())
            .json(&body)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["account_number"], "PGY-2002");

        let response = hx
            .server
            .post("/api/v1/customers")
            .authorization_bearer(&collector_token(hx.collector))
            .json(&body)
            .await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_collector_sees_only_own_book() {
        let hx = harness().await;

        // A second customer belongs to nobody.
        hx.server
            .post("/api/v1/customers")
            .authorization_bearer(&admin_token())
            .json(&json!({
                "account_number": "PGY-3003",
                "name": "Ravi Shankar",
                "account_type": "weekly",
            }))
            .await
            .assert_status_ok();

        let response = hx
            .server
            .get("/api/v1/customers")
            .authorization_bearer(&collector_token(hx.collector))
            .await;
        response.assert_status_ok();
        let customers = response.json::<Value>();
        assert_eq!(customers.as_array().unwrap().len(), 1);
        assert_eq!(customers[0]["account_number"], "PGY-1001");
    }
}

mod report_tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_summary_rollup() {
        let hx = harness().await;
        let token = collector_token(hx.collector);

        let response = hx
            .server
            .post("/api/v1/deposits")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": hx.customer.as_uuid(),
                "amount": dec!(400.00),
                "method": "online",
                "reference": "UPI-004",
            }))
            .await;
        response.assert_status_ok();

        let response = hx
            .server
            .get("/api/v1/reports/summary")
            .authorization_bearer(&admin_token())
            .await;
        response.assert_status_ok();
        let report = response.json::<Value>();
        assert_eq!(report["rollup"]["customers"], 1);
        assert_eq!(report["rollup"]["total_balance"], json!("400.00"));
    }

    #[tokio::test]
    async fn test_collector_cannot_widen_report_scope() {
        let hx = harness().await;
        let response = hx
            .server
            .get("/api/v1/reports/summary")
            .authorization_bearer(&collector_token(hx.collector))
            .add_query_param("collector_id", Uuid::new_v4())
            .await;
        response.assert_status_forbidden();
    }
}
