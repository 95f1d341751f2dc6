#![allow(dead_code)]

use billing::config::{Customer, Dish, Order, OrderItem, OrderStatus, PaymentType, Role};
use billing::observer::ReportObserver;
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use std::cell::RefCell;

pub fn at(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

pub fn order(
    id: &str,
    customer_id: &str,
    total: f64,
    status: OrderStatus,
    payment_type: PaymentType,
    created_at: &str,
) -> Order {
    Order {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        customer_name: format!("Customer {customer_id}"),
        customer_email: format!("{customer_id}@example.com"),
        items: Vec::new(),
        total_amount: total,
        status,
        payment_type,
        created_at: created_at.to_string(),
        approved_at: None,
        rejected_at: None,
        paid_at: None,
        is_walk_in: None,
        placed_by: None,
    }
}

pub fn item(dish_id: &str, price: Option<f64>, quantity: u32) -> OrderItem {
    OrderItem {
        dish_id: dish_id.to_string(),
        dish_name: None,
        price,
        quantity,
    }
}

pub fn customer(
    id: &str,
    payment_type: PaymentType,
    total_spent: f64,
    monthly_balance: f64,
    number: i64,
) -> Customer {
    Customer {
        id: id.to_string(),
        name: format!("Customer {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        role: Role::Customer,
        payment_type,
        monthly_balance,
        total_spent,
        customer_number: number,
        is_first_login: false,
    }
}

pub fn dish(id: &str, name: &str, price: f64) -> Dish {
    Dish {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        price,
        category: None,
        image_url: None,
        is_available: true,
    }
}

/// Collects observer events for assertions
#[derive(Default)]
pub struct RecordingObserver {
    pub malformed: RefCell<Vec<String>>,
    pub negative: RefCell<Vec<(String, f64)>>,
}

impl ReportObserver for RecordingObserver {
    fn malformed_timestamp(&self, record_id: &str, field: &str, _raw: &str) {
        self.malformed
            .borrow_mut()
            .push(format!("{record_id}:{field}"));
    }

    fn negative_paid_amount(&self, customer: &Customer, paid: f64) {
        self.negative.borrow_mut().push((customer.id.clone(), paid));
    }
}

/// Central European time with its 2026 clock changes: UTC+1, and UTC+2 from
/// 2026-03-29 01:00 UTC until 2026-10-25 01:00 UTC.
#[derive(Debug, Clone, Copy)]
pub struct Cet2026;

fn cet_offset(summer: bool) -> FixedOffset {
    FixedOffset::east_opt(if summer { 2 * 3600 } else { 3600 }).unwrap()
}

fn naive(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").unwrap()
}

/// A wall-clock time in `Cet2026`
pub fn cet(raw: &str) -> DateTime<Cet2026> {
    Cet2026.from_local_datetime(&naive(raw)).earliest().unwrap()
}

impl TimeZone for Cet2026 {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        Cet2026
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let spring_gap = naive("2026-03-29T02:00:00")..naive("2026-03-29T03:00:00");
        let autumn_overlap = naive("2026-10-25T02:00:00")..naive("2026-10-25T03:00:00");

        if spring_gap.contains(local) {
            LocalResult::None
        } else if autumn_overlap.contains(local) {
            LocalResult::Ambiguous(cet_offset(true), cet_offset(false))
        } else {
            let summer = *local >= spring_gap.end && *local < autumn_overlap.start;
            LocalResult::Single(cet_offset(summer))
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        let summer = *utc >= naive("2026-03-29T01:00:00") && *utc < naive("2026-10-25T01:00:00");
        cet_offset(summer)
    }
}
