//! Core kernel for the pigmy savings system
//!
//! Shared building blocks used by every domain crate: precise money
//! arithmetic, strongly-typed identifiers, actor identity, and the
//! common storage error type implemented by port adapters.

pub mod actor;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use actor::{Actor, Role};
pub use identifiers::{CollectorId, CustomerId, EntryId, FeedbackId, PlanId};
pub use money::{Currency, Money, MoneyError};
pub use ports::{DomainPort, StoreError};
