//! Summary reporting
//!
//! Read-only aggregation across customers: one line per customer plus a
//! system rollup. Admins see everything; a collector's report is scoped to
//! their own book. Built purely from data the service already fetched so
//! it stays easy to test.

use serde::Serialize;

use core_kernel::{CollectorId, Currency, CustomerId, Money};
use domain_party::CustomerAccount;

use crate::entry::{EntryStatus, LedgerEntry};
use crate::error::LedgerError;
use crate::projector::project;

/// Whose customers the report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Collector(CollectorId),
}

/// One report line per customer
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub account_number: String,
    pub name: String,
    pub balance: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
    pub pending_entries: usize,
}

/// Totals across every line in the report
#[derive(Debug, Clone, Serialize)]
pub struct SystemRollup {
    pub customers: usize,
    pub total_balance: Money,
    pub total_deposits: Money,
    pub total_withdrawals: Money,
    pub pending_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub customers: Vec<CustomerSummary>,
    pub rollup: SystemRollup,
}

/// Builds the report from each customer paired with their full entry list.
pub fn summarize(
    rows: &[(CustomerAccount, Vec<LedgerEntry>)],
    currency: Currency,
) -> Result<SummaryReport, LedgerError> {
    let mut customers = Vec::with_capacity(rows.len());
    let mut total_balance = Money::zero(currency);
    let mut total_deposits = Money::zero(currency);
    let mut total_withdrawals = Money::zero(currency);
    let mut pending_total = 0;

    for (customer, entries) in rows {
        let projection = project(entries.iter(), currency)?;
        let pending = entries
            .iter()
            .filter(|e| e.status == EntryStatus::Pending)
            .count();

        total_balance = total_balance.checked_add(&projection.balance)?;
        total_deposits = total_deposits.checked_add(&projection.total_deposits)?;
        total_withdrawals = total_withdrawals.checked_add(&projection.total_withdrawals)?;
        pending_total += pending;

        customers.push(CustomerSummary {
            customer_id: customer.id,
            account_number: customer.account_number.clone(),
            name: customer.name.clone(),
            balance: projection.balance,
            total_deposits: projection.total_deposits,
            total_withdrawals: projection.total_withdrawals,
            pending_entries: pending,
        });
    }

    Ok(SummaryReport {
        rollup: SystemRollup {
            customers: customers.len(),
            total_balance,
            total_deposits,
            total_withdrawals,
            pending_entries: pending_total,
        },
        customers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::approval::{apply, EntryAction};
    use core_kernel::Actor;
    use domain_party::AccountType;

    fn customer(number: &str) -> CustomerAccount {
        CustomerAccount::open(number, "Test Customer", AccountType::Daily, Currency::INR).unwrap()
    }

    fn approved_deposit(customer: CustomerId, amount: i64) -> LedgerEntry {
        let entry = LedgerEntry::in_hand_deposit(
            customer,
            Money::new(Decimal::from(amount), Currency::INR),
            Some(CollectorId::new()),
            Utc::now(),
        )
        .unwrap();
        apply(entry, EntryAction::Approve, Actor::admin(Uuid::new_v4()), None).unwrap()
    }

    fn pending_deposit(customer: CustomerId, amount: i64) -> LedgerEntry {
        LedgerEntry::in_hand_deposit(
            customer,
            Money::new(Decimal::from(amount), Currency::INR),
            Some(CollectorId::new()),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_rollup_sums_lines() {
        let a = customer("PGY-9001");
        let b = customer("PGY-9002");
        let rows = vec![
            (
                a.clone(),
                vec![approved_deposit(a.id, 500), pending_deposit(a.id, 100)],
            ),
            (b.clone(), vec![approved_deposit(b.id, 250)]),
        ];

        let report = summarize(&rows, Currency::INR).unwrap();
        assert_eq!(report.customers.len(), 2);
        assert_eq!(report.rollup.customers, 2);
        assert_eq!(
            report.rollup.total_balance,
            Money::new(Decimal::from(750), Currency::INR)
        );
        assert_eq!(report.rollup.pending_entries, 1);

        let line_a = &report.customers[0];
        assert_eq!(line_a.account_number, "PGY-9001");
        assert_eq!(line_a.pending_entries, 1);
        assert_eq!(line_a.balance, Money::new(Decimal::from(500), Currency::INR));
    }

    #[test]
    fn test_empty_report() {
        let report = summarize(&[], Currency::INR).unwrap();
        assert!(report.customers.is_empty());
        assert_eq!(report.rollup.customers, 0);
        assert!(report.rollup.total_balance.is_zero());
    }
}
