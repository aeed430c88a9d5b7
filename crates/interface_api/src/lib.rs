//! HTTP API Layer
//!
//! This crate provides the REST API for the pigmy savings system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **Middleware**: Authentication, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::Currency;
use domain_ledger::LedgerService;
use domain_party::PartyService;

use crate::config::ApiConfig;
use crate::handlers::{health, ledger, party};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub parties: Arc<PartyService>,
    pub currency: Currency,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state (services, currency, config)
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Customer routes
    let customer_routes = Router::new()
        .route("/", post(party::create_customer))
        .route("/", get(party::list_customers))
        .route("/:id", get(party::get_customer))
        .route("/:id", put(party::update_customer))
        .route("/:id", delete(party::close_customer))
        .route("/:id/collector", put(party::assign_collector))
        .route("/:id/statement", get(ledger::customer_statement));

    // Collector routes
    let collector_routes = Router::new()
        .route("/", post(party::create_collector))
        .route("/", get(party::list_collectors))
        .route("/:id", delete(party::deactivate_collector));

    // Plan routes
    let plan_routes = Router::new()
        .route("/", post(party::create_plan))
        .route("/", get(party::list_plans))
        .route("/:id", delete(party::deactivate_plan));

    // Feedback routes
    let feedback_routes = Router::new()
        .route("/", post(party::open_feedback))
        .route("/", get(party::list_feedback))
        .route("/:id/notes", post(party::add_feedback_note))
        .route("/:id/status", put(party::change_feedback_status));

    // Ledger entry routes
    let entry_routes = Router::new()
        .route("/:id/approve", post(ledger::approve_entry))
        .route("/:id/reject", post(ledger::reject_entry))
        .route("/:id", delete(ledger::delete_entry));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/customers", customer_routes)
        .nest("/collectors", collector_routes)
        .nest("/plans", plan_routes)
        .nest("/feedback", feedback_routes)
        .nest("/entries", entry_routes)
        .route("/deposits", post(ledger::record_deposit))
        .route("/withdrawals", post(ledger::request_withdrawal))
        .route("/reports/summary", get(ledger::summary_report))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
