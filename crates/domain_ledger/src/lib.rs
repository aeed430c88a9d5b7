//! Ledger domain: the deposit/withdrawal approval workflow
//!
//! The one place in the system with real financial invariants. Every entry
//! is owned by exactly one customer, moves through
//! `pending -> approved | rejected` exactly once (plus the admin-only
//! reversal of online deposits), and the customer's balance is always
//! derivable by folding approved entries.
//!
//! ```text
//! actor -> access gate -> approval state machine -> store -> projector
//! ```

pub mod access;
pub mod approval;
pub mod entry;
pub mod error;
pub mod ports;
pub mod projector;
pub mod report;
pub mod service;

pub use access::authorize;
pub use approval::EntryAction;
pub use entry::{EntryKind, EntryStatus, LedgerEntry, PaymentMethod};
pub use error::LedgerError;
pub use ports::LedgerStore;
pub use projector::{project, BalanceProjection};
pub use report::{CustomerSummary, ReportScope, SummaryReport, SystemRollup};
pub use service::{LedgerService, NewDeposit, NewWithdrawal, Statement};
