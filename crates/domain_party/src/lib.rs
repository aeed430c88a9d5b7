//! Party domain: customers, collectors, savings plans and feedback
//!
//! Holds the records the ledger operates against. Customer accounts carry a
//! cached balance that is derived from the ledger and refreshed on approval
//! events; everything else here is plain record maintenance.

pub mod collector;
pub mod customer;
pub mod error;
pub mod feedback;
pub mod plan;
pub mod ports;
pub mod service;

pub use collector::Collector;
pub use customer::{AccountStatus, AccountType, CustomerAccount};
pub use error::PartyError;
pub use feedback::{Feedback, FeedbackNote, FeedbackSource, FeedbackStatus};
pub use plan::{PlanFrequency, SavingsPlan};
pub use ports::PartyStore;
pub use service::{CustomerUpdate, NewCustomer, PartyService};
