//! Repository implementations of the domain storage ports

use core_kernel::Currency;

use crate::error::DatabaseError;

mod ledger;
mod party;

pub use ledger::PgLedgerStore;
pub use party::PgPartyStore;

pub(crate) fn parse_currency(code: &str) -> Result<Currency, DatabaseError> {
    match code {
        "INR" => Ok(Currency::INR),
        "USD" => Ok(Currency::USD),
        other => Err(DatabaseError::mapping(format!("unknown currency {other}"))),
    }
}
