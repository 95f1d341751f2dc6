use serde::{Deserialize, Serialize};

use crate::billing::Timeframe;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub restaurant: Restaurant,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Restaurant {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BillingSettings {
    pub currency_symbol: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "Rs ".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub default_timeframe: Timeframe,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            default_timeframe: Timeframe::default(),
            top_n: default_top_n(),
        }
    }
}

/// Snapshot file locations, relative to the config directory unless absolute
#[derive(Debug, Deserialize, Serialize)]
pub struct DataSettings {
    #[serde(default = "default_orders")]
    pub orders: String,
    #[serde(default = "default_customers")]
    pub customers: String,
    #[serde(default = "default_dishes")]
    pub dishes: String,
}

fn default_orders() -> String {
    "orders.json".to_string()
}

fn default_customers() -> String {
    "customers.json".to_string()
}

fn default_dishes() -> String {
    "dishes.json".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            orders: default_orders(),
            customers: default_customers(),
            dishes: default_dishes(),
        }
    }
}
