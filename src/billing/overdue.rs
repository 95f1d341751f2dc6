use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use std::fmt;

use super::monthly::approved_monthly_orders;
use super::period::current_month_range;
use crate::config::{Customer, Order};
use crate::observer::ReportObserver;

/// Collection priority derived from days overdue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_days(days_overdue: i64) -> Self {
        match days_overdue {
            d if d >= 90 => Self::Critical,
            d if d >= 60 => Self::High,
            d if d >= 30 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Colour token used by the UI badges
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#DC2626",
            Self::High => "#EA580C",
            Self::Medium => "#F59E0B",
            Self::Low => "#EAB308",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Human-readable age of an overdue bill
pub fn format_days_overdue(days: i64) -> String {
    match days {
        0 => "Due today".to_string(),
        1 => "1 day overdue".to_string(),
        d if d < 30 => format!("{d} days overdue"),
        d => match d / 30 {
            1 => "1 month overdue".to_string(),
            months => format!("{months} months overdue"),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct OverdueBill<'a> {
    pub customer: &'a Customer,
    /// The full stored balance, not apportioned between old and new orders
    pub overdue_amount: f64,
    /// Approved monthly orders created before the current month
    pub orders: Vec<&'a Order>,
    pub oldest_order_date: DateTime<FixedOffset>,
    pub days_overdue: i64,
    pub severity: Severity,
}

#[derive(Debug, Default, Serialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Serialize)]
pub struct OverdueReport<'a> {
    /// Most urgent first
    pub bills: Vec<OverdueBill<'a>>,
    pub total_overdue_amount: f64,
    pub total_overdue_customers: usize,
    pub by_severity: SeverityBreakdown,
}

/// Monthly customers whose balance includes orders from a previous month
pub fn calculate_overdue_bills<'a, Tz: TimeZone>(
    orders: &'a [Order],
    customers: &'a [Customer],
    now: &DateTime<Tz>,
    observer: &dyn ReportObserver,
) -> OverdueReport<'a> {
    let month_start = current_month_range(now).start;
    let tz = now.timezone();
    let now = now.fixed_offset();

    let mut bills: Vec<OverdueBill> = Vec::new();

    for customer in customers.iter().filter(|c| c.has_outstanding_balance()) {
        let mut old_orders = Vec::new();
        let mut oldest: Option<DateTime<FixedOffset>> = None;

        for order in approved_monthly_orders(orders, customer) {
            let Some(created) = order.created_at(&tz) else {
                observer.malformed_timestamp(&order.id, "created_at", &order.created_at);
                continue;
            };
            if created < month_start {
                oldest = Some(oldest.map_or(created, |o| o.min(created)));
                observer.order_counted("overdue", order);
                old_orders.push(order);
            }
        }

        // Balance built up entirely this month is not overdue yet
        let Some(oldest_order_date) = oldest else {
            continue;
        };

        let days_overdue = (now - oldest_order_date).num_days().max(0);
        bills.push(OverdueBill {
            customer,
            overdue_amount: customer.monthly_balance,
            orders: old_orders,
            oldest_order_date,
            days_overdue,
            severity: Severity::from_days(days_overdue),
        });
    }

    bills.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));

    let mut by_severity = SeverityBreakdown::default();
    for bill in &bills {
        match bill.severity {
            Severity::Critical => by_severity.critical += 1,
            Severity::High => by_severity.high += 1,
            Severity::Medium => by_severity.medium += 1,
            Severity::Low => by_severity.low += 1,
        }
    }

    OverdueReport {
        total_overdue_amount: bills.iter().map(|b| b.overdue_amount).sum(),
        total_overdue_customers: bills.len(),
        by_severity,
        bills,
    }
}
