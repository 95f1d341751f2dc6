use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::period::{current_month_range, parse_timestamp, DateRange};
use crate::config::{Customer, Order, PaymentType};
use crate::observer::ReportObserver;

/// A monthly customer whose stored balance exceeds their recorded spend
#[derive(Debug, Serialize)]
pub struct BalanceAnomaly<'a> {
    pub customer: &'a Customer,
    pub paid_amount: f64,
}

/// Current-month revenue split into cash walk-ins and monthly settlements
#[derive(Debug, Serialize)]
pub struct RevenueReport<'a> {
    pub period: DateRange,
    pub total_revenue: f64,
    pub walk_in_revenue: f64,
    pub monthly_payments_revenue: f64,
    /// Cash orders counted towards `walk_in_revenue`
    pub revenue_orders: Vec<&'a Order>,
    /// Customers left out of `monthly_payments_revenue` for review
    pub anomalies: Vec<BalanceAnomaly<'a>>,
}

/// Classify approved orders and monthly settlements into revenue buckets for
/// the month containing `now`.
pub fn calculate_revenue<'a, Tz: TimeZone>(
    orders: &'a [Order],
    customers: &'a [Customer],
    now: &DateTime<Tz>,
    observer: &dyn ReportObserver,
) -> RevenueReport<'a> {
    let period = current_month_range(now);
    let tz = now.timezone();

    let revenue_orders: Vec<&Order> = orders
        .iter()
        .filter(|o| o.is_approved() && o.payment_type == PaymentType::Cash)
        .filter(|o| {
            let (field, raw) = o.revenue_timestamp();
            match parse_timestamp(raw, &tz) {
                Some(at) => period.contains(&at),
                None => {
                    observer.malformed_timestamp(&o.id, field, raw);
                    false
                }
            }
        })
        .inspect(|o| observer.order_counted("revenue", o))
        .collect();

    let walk_in_revenue: f64 = revenue_orders.iter().map(|o| o.total_amount).sum();

    let mut monthly_payments_revenue = 0.0;
    let mut anomalies = Vec::new();
    for customer in customers
        .iter()
        .filter(|c| c.is_monthly() && c.total_spent > 0.0)
    {
        let paid = customer.paid_amount();
        if paid > 0.0 {
            monthly_payments_revenue += paid;
        } else if paid < 0.0 {
            observer.negative_paid_amount(customer, paid);
            anomalies.push(BalanceAnomaly {
                customer,
                paid_amount: paid,
            });
        }
    }

    RevenueReport {
        period,
        total_revenue: walk_in_revenue + monthly_payments_revenue,
        walk_in_revenue,
        monthly_payments_revenue,
        revenue_orders,
        anomalies,
    }
}
