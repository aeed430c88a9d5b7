//! Access gate
//!
//! First check on every ledger operation: may this actor see this
//! customer at all? Admins pass unconditionally; a collector passes only
//! for customers assigned to them. The message is deliberately uniform so
//! a collector probing entry ids cannot tell "wrong customer" from
//! "exists but not yours".

use core_kernel::{Actor, CollectorId, Role};
use domain_party::CustomerAccount;

use crate::error::LedgerError;

pub fn authorize(actor: Actor, customer: &CustomerAccount) -> Result<(), LedgerError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Collector => {
            let collector = CollectorId::from_uuid(actor.id);
            if customer.is_assigned_to(collector) {
                Ok(())
            } else {
                Err(LedgerError::forbidden(
                    "Collector is not assigned to this customer",
                ))
            }
        }
    }
}
