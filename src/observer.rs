//! Diagnostics hooks for the report calculations.
//!
//! Calculations stay pure: anything worth telling an operator about is
//! handed to a [`ReportObserver`] supplied by the caller.

use crate::config::{Customer, Order};

pub trait ReportObserver {
    /// A record was left out of a date-windowed aggregate because one of its
    /// timestamps could not be parsed.
    fn malformed_timestamp(&self, _record_id: &str, _field: &str, _raw: &str) {}

    /// `total_spent - monthly_balance` came out negative for a monthly customer.
    fn negative_paid_amount(&self, _customer: &Customer, _paid: f64) {}

    /// An order contributed to a report total.
    fn order_counted(&self, _report: &str, _order: &Order) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ReportObserver for NoopObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ReportObserver for LogObserver {
    fn malformed_timestamp(&self, record_id: &str, field: &str, raw: &str) {
        log::warn!("Skipping record {record_id}: unparseable {field} '{raw}'");
    }

    fn negative_paid_amount(&self, customer: &Customer, paid: f64) {
        log::warn!(
            "Customer {} ({}) has negative paid amount {paid:.2} (total_spent={:.2}, monthly_balance={:.2}); excluded from revenue",
            customer.id,
            customer.name,
            customer.total_spent,
            customer.monthly_balance
        );
    }

    fn order_counted(&self, report: &str, order: &Order) {
        log::trace!(
            "{report}: counted order {} ({:.2}) for {}",
            order.id,
            order.total_amount,
            order.customer_name
        );
    }
}
