//! PostgreSQL infrastructure layer
//!
//! Implements the storage ports defined by the domain crates
//! ([`domain_party::ports::PartyStore`], [`domain_ledger::ports::LedgerStore`])
//! against PostgreSQL using SQLx. Domain enums travel as TEXT, money as
//! NUMERIC plus a currency code, and the ledger's paired writes (entry +
//! cached balance) run inside a single transaction.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use repositories::{PgLedgerStore, PgPartyStore};
