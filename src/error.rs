use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Config directory not found at {0}. Run 'billing init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse data file {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Customer '{0}' not found in customers snapshot")]
    CustomerNotFound(String),

    #[error("Customer '{0}' is not on monthly billing")]
    NotMonthlyCustomer(String),

    #[error("Payment amount must be greater than zero")]
    InvalidPaymentAmount,

    #[error("Payment would exceed outstanding balance of {customer} (max {max:.0} remaining)")]
    OverPayment { customer: String, max: f64 },

    #[error("Invalid timestamp '{0}'. Expected RFC 3339 (e.g., 2026-10-17T12:00:00+00:00)")]
    InvalidTimestamp(String),

    #[error("Invalid timeframe '{0}'. Use 'week', 'month', or 'all'.")]
    InvalidTimeframe(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
