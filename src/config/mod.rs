mod customer;
mod dish;
mod order;
mod settings;

pub use customer::{Customer, Role, WALK_IN_CUSTOMER_NUMBER};
pub use dish::Dish;
pub use order::{Order, OrderItem, OrderStatus, PaymentType};
pub use settings::{AnalyticsSettings, BillingSettings, Config, DataSettings, Restaurant};

use crate::error::{BillingError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.billing/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "billing") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".billing"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a snapshot path from config.toml against the config directory
pub fn resolve_data_path(path: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(BillingError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillingError::ConfigParse { path, source: e })
}

fn load_snapshot<T: DeserializeOwned>(path: PathBuf) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(BillingError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| BillingError::DataParse { path, source: e })
}

/// Load the orders snapshot
pub fn load_orders(config_dir: &Path, config: &Config) -> Result<Vec<Order>> {
    load_snapshot(resolve_data_path(&config.data.orders, config_dir))
}

/// Load the customers snapshot
pub fn load_customers(config_dir: &Path, config: &Config) -> Result<Vec<Customer>> {
    load_snapshot(resolve_data_path(&config.data.customers, config_dir))
}

/// Load the dish catalog
pub fn load_dishes(config_dir: &Path, config: &Config) -> Result<Vec<Dish>> {
    load_snapshot(resolve_data_path(&config.data.dishes, config_dir))
}

/// Write the customers snapshot back after a balance change
pub fn save_customers(config_dir: &Path, config: &Config, customers: &[Customer]) -> Result<()> {
    let path = resolve_data_path(&config.data.customers, config_dir);
    let content = serde_json::to_string_pretty(customers)
        .map_err(|e| BillingError::Serialize(e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[restaurant]
name = "Your Restaurant"

[billing]
currency_symbol = "Rs "

[analytics]
default_timeframe = "month"  # week, month or all
top_n = 5

[data]
# Snapshot files exported from the backend. Relative paths resolve
# against this directory.
orders = "orders.json"
customers = "customers.json"
dishes = "dishes.json"
"#;

/// Template content for customers.json
pub const CUSTOMERS_TEMPLATE: &str = r#"[
  {
    "id": "walk-in",
    "name": "Walk-in Customer",
    "email": "walkin@example.com",
    "role": "customer",
    "payment_type": "cash",
    "monthly_balance": 0,
    "total_spent": 0,
    "customer_number": -1,
    "is_first_login": false
  }
]
"#;

/// Template content for dishes.json
pub const DISHES_TEMPLATE: &str = r#"[
  {
    "id": "chicken-biryani",
    "name": "Chicken Biryani",
    "description": "Fragrant rice with spiced chicken",
    "price": 450,
    "category": "Mains",
    "is_available": true
  },
  {
    "id": "masala-chai",
    "name": "Masala Chai",
    "price": 80,
    "category": "Drinks",
    "is_available": true
  }
]
"#;

/// Template content for orders.json
pub const ORDERS_TEMPLATE: &str = "[]\n";
