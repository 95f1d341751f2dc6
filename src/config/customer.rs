use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::PaymentType;

/// Customer number reserved for anonymous walk-in orders
pub const WALK_IN_CUSTOMER_NUMBER: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Receptionist,
    Admin,
    MasterAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Receptionist => write!(f, "receptionist"),
            Self::Admin => write!(f, "admin"),
            Self::MasterAdmin => write!(f, "master_admin"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    pub payment_type: PaymentType,
    /// Running outstanding amount for monthly billing
    #[serde(default)]
    pub monthly_balance: f64,
    /// Cumulative value of approved orders
    #[serde(default)]
    pub total_spent: f64,
    pub customer_number: i64,
    #[serde(default)]
    pub is_first_login: bool,
}

impl Customer {
    pub fn is_monthly(&self) -> bool {
        self.payment_type == PaymentType::Monthly
    }

    pub fn is_walk_in(&self) -> bool {
        self.customer_number == WALK_IN_CUSTOMER_NUMBER
    }

    pub fn has_outstanding_balance(&self) -> bool {
        self.is_monthly() && self.monthly_balance > 0.0
    }

    /// Amount already paid off. Deliberately unclamped: a negative value
    /// means the stored balance and spend disagree.
    pub fn paid_amount(&self) -> f64 {
        self.total_spent - self.monthly_balance
    }
}
