use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::billing::period::parse_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Monthly,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OrderItem {
    pub dish_id: String,
    #[serde(default)]
    pub dish_name: Option<String>,
    /// Unit price captured when the order was placed
    #[serde(default)]
    pub price: Option<f64>,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_type: PaymentType,
    /// Raw ISO-8601 timestamps; parsed on demand so one bad value cannot
    /// reject the whole snapshot.
    pub created_at: String,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub rejected_at: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub is_walk_in: Option<bool>,
    #[serde(default)]
    pub placed_by: Option<String>,
}

impl Order {
    pub fn is_approved(&self) -> bool {
        self.status == OrderStatus::Approved
    }

    pub fn is_walk_in(&self) -> bool {
        self.is_walk_in.unwrap_or(false)
    }

    pub fn created_at<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.created_at, tz)
    }

    /// Field name and raw value of the timestamp revenue is booked against:
    /// the approval time when there is one, otherwise the creation time.
    pub fn revenue_timestamp(&self) -> (&'static str, &str) {
        match self.approved_at.as_deref() {
            Some(raw) if !raw.trim().is_empty() => ("approved_at", raw),
            _ => ("created_at", self.created_at.as_str()),
        }
    }
}
