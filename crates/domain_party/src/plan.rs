//! Savings plan records
//!
//! A pigmy plan fixes the recurring installment, its frequency and the
//! duration of the scheme. Customers link to a plan; the ledger does not
//! enforce plan adherence, collectors do in the field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PlanId};

use crate::error::PartyError;

/// How often an installment is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl PlanFrequency {
    /// Approximate installments per month, used for maturity estimates
    pub fn installments_per_month(&self) -> u32 {
        match self {
            PlanFrequency::Daily => 30,
            PlanFrequency::Weekly => 4,
            PlanFrequency::Monthly => 1,
        }
    }
}

/// A fixed recurring-deposit scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsPlan {
    pub id: PlanId,
    pub name: String,
    pub installment: Money,
    pub frequency: PlanFrequency,
    pub duration_months: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsPlan {
    /// Creates a new plan
    pub fn new(
        name: impl Into<String>,
        installment: Money,
        frequency: PlanFrequency,
        duration_months: u32,
    ) -> Result<Self, PartyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PartyError::validation("plan name must not be empty"));
        }
        if !installment.is_positive() {
            return Err(PartyError::validation("installment must be positive"));
        }
        if duration_months == 0 {
            return Err(PartyError::validation("duration must be at least one month"));
        }
        let now = Utc::now();
        Ok(Self {
            id: PlanId::new_v7(),
            name,
            installment,
            frequency,
            duration_months,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Total number of installments across the plan duration
    pub fn expected_installments(&self) -> u32 {
        self.frequency.installments_per_month() * self.duration_months
    }

    /// Principal accumulated if every installment is paid
    pub fn maturity_value(&self) -> Money {
        Money::new(
            self.installment.amount() * Decimal::from(self.expected_installments()),
            self.installment.currency(),
        )
    }

    /// Retires the plan from new enrollments
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
