//! Actor identity and roles
//!
//! Every mutating ledger operation is performed by an actor: either a
//! back-office Admin with unrestricted authority, or a field Collector
//! scoped to the customers assigned to them. Actor identity arrives with
//! each request (token resolution is the caller's concern).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::identifiers::CollectorId;

/// Role of an acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Collector,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Collector => write!(f, "collector"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "collector" => Ok(Role::Collector),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The identity on whose behalf an operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    /// Creates an admin actor
    pub fn admin(id: Uuid) -> Self {
        Self {
            id,
            role: Role::Admin,
        }
    }

    /// Creates a collector actor
    pub fn collector(id: CollectorId) -> Self {
        Self {
            id: *id.as_uuid(),
            role: Role::Collector,
        }
    }

    /// Returns true if the actor is an admin
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns the actor's id as a collector id, if the actor is a collector
    pub fn collector_id(&self) -> Option<CollectorId> {
        match self.role {
            Role::Collector => Some(CollectorId::from_uuid(self.id)),
            Role::Admin => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Collector] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_collector_id_only_for_collectors() {
        let collector = Actor::collector(CollectorId::new());
        assert!(collector.collector_id().is_some());

        let admin = Actor::admin(Uuid::new_v4());
        assert!(admin.collector_id().is_none());
        assert!(admin.is_admin());
    }
}
