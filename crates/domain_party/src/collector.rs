//! Collector records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::CollectorId;

use crate::error::PartyError;

/// A field agent collecting deposits for a subset of customers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    pub id: CollectorId,
    pub name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collector {
    /// Registers a new collector
    pub fn register(name: impl Into<String>) -> Result<Self, PartyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PartyError::validation("collector name must not be empty"));
        }
        let now = Utc::now();
        Ok(Self {
            id: CollectorId::new_v7(),
            name,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Deactivates the collector; assigned customers keep their history
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
