use serde::Serialize;

use crate::config::{Customer, Order, PaymentType};
use crate::observer::ReportObserver;

/// One monthly customer with an outstanding balance
#[derive(Debug, Serialize)]
pub struct CustomerBill<'a> {
    pub customer: &'a Customer,
    /// Authoritative unpaid amount: the stored balance, which already
    /// reflects partial payments.
    pub outstanding: f64,
    /// Approved monthly orders, for display only
    pub orders: Vec<&'a Order>,
    /// Sum of `orders`. Display only; diverges from `outstanding` once a
    /// partial payment has been recorded.
    pub orders_total: f64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyBillsReport<'a> {
    pub total_monthly_bills: f64,
    pub customers_with_bills: Vec<CustomerBill<'a>>,
    pub total_customers: usize,
}

/// Approved monthly-billed orders belonging to `customer`
pub(crate) fn approved_monthly_orders<'a>(
    orders: &'a [Order],
    customer: &Customer,
) -> impl Iterator<Item = &'a Order> {
    let customer_id = customer.id.clone();
    orders.iter().filter(move |o| {
        o.customer_id == customer_id && o.is_approved() && o.payment_type == PaymentType::Monthly
    })
}

/// Outstanding balances per monthly-billing customer
pub fn calculate_monthly_bills<'a>(
    orders: &'a [Order],
    customers: &'a [Customer],
    observer: &dyn ReportObserver,
) -> MonthlyBillsReport<'a> {
    let customers_with_bills: Vec<CustomerBill> = customers
        .iter()
        .filter(|c| c.has_outstanding_balance())
        .map(|customer| {
            let orders: Vec<&Order> = approved_monthly_orders(orders, customer)
                .inspect(|o| observer.order_counted("monthly-bills", o))
                .collect();
            let orders_total = orders.iter().map(|o| o.total_amount).sum();
            CustomerBill {
                customer,
                outstanding: customer.monthly_balance,
                orders,
                orders_total,
            }
        })
        .collect();

    MonthlyBillsReport {
        total_monthly_bills: customers_with_bills.iter().map(|b| b.outstanding).sum(),
        total_customers: customers_with_bills.len(),
        customers_with_bills,
    }
}
