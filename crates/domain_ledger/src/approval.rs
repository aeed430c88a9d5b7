//! Approval state machine
//!
//! Pure functions over [`LedgerEntry`]: given an actor, an entry and an
//! action, decide whether the action is allowed and produce the updated
//! entry. No storage or locking here; the service wraps these calls in a
//! per-customer critical section so only one decision wins a race.

use chrono::Utc;

use core_kernel::Actor;

use crate::entry::{EntryStatus, LedgerEntry};
use crate::error::LedgerError;

/// Actions an actor can take on an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Approve,
    Reject,
    /// Admin-only reversal of an already-approved online deposit
    Reverse,
    Delete,
}

impl std::fmt::Display for EntryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryAction::Approve => write!(f, "approve"),
            EntryAction::Reject => write!(f, "reject"),
            EntryAction::Reverse => write!(f, "reverse"),
            EntryAction::Delete => write!(f, "delete"),
        }
    }
}

/// A reject aimed at an approved online deposit is a reversal. Normalizing
/// up front lets the authority and precondition checks treat the two
/// uniformly.
pub fn normalize(entry: &LedgerEntry, action: EntryAction) -> EntryAction {
    if action == EntryAction::Reject
        && entry.status == EntryStatus::Approved
        && entry.is_online_deposit()
    {
        EntryAction::Reverse
    } else {
        action
    }
}

/// Role-level authority, checked after the access gate has already
/// confirmed the actor may touch this customer at all.
pub fn check_authority(actor: Actor, action: EntryAction) -> Result<(), LedgerError> {
    if action == EntryAction::Reverse && !actor.is_admin() {
        return Err(LedgerError::forbidden(
            "Only an admin can reverse an approved online deposit",
        ));
    }
    Ok(())
}

/// Status precondition for the action. This is the check that makes
/// concurrent decisions safe: the loser of a race re-reads a terminal
/// entry and lands here.
pub fn check_transition(entry: &LedgerEntry, action: EntryAction) -> Result<(), LedgerError> {
    match action {
        EntryAction::Approve | EntryAction::Reject => {
            if entry.status != EntryStatus::Pending {
                return Err(LedgerError::invalid_transition(
                    entry.status,
                    action.to_string(),
                ));
            }
        }
        EntryAction::Reverse => {
            if entry.status != EntryStatus::Approved || !entry.is_online_deposit() {
                return Err(LedgerError::invalid_transition(
                    entry.status,
                    action.to_string(),
                ));
            }
        }
        EntryAction::Delete => {
            if entry.status == EntryStatus::Approved {
                return Err(LedgerError::Conflict(
                    "Approved entries cannot be deleted".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Applies a checked action, returning the updated entry. `Delete` never
/// reaches here; the service removes the row instead.
pub fn apply(
    mut entry: LedgerEntry,
    action: EntryAction,
    actor: Actor,
    reason: Option<String>,
) -> Result<LedgerEntry, LedgerError> {
    match action {
        EntryAction::Approve => {
            entry.status = EntryStatus::Approved;
        }
        EntryAction::Reject | EntryAction::Reverse => {
            let reason = reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    LedgerError::validation("A rejection requires a non-empty reason")
                })?;
            entry.status = EntryStatus::Rejected;
            entry.rejection_reason = Some(reason);
        }
        EntryAction::Delete => {
            return Err(LedgerError::Conflict(
                "Delete removes the entry; it is not a status transition".to_string(),
            ));
        }
    }
    entry.handled_by = Some(actor);
    entry.updated_at = Utc::now();
    Ok(entry)
}
