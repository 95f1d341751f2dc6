use chrono::{DateTime, Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use billing::analytics::{
    analyze_dish_performance, generate_insights, top_by_revenue, trending_down, trending_up,
    underperforming, DishPerformance,
};
use billing::billing::{
    calculate_monthly_bills, calculate_overdue_bills, calculate_revenue, format_days_overdue,
    Timeframe,
};
use billing::config::{
    config_dir, load_config, load_customers, load_dishes, load_orders, save_customers, Config,
    Customer, CONFIG_TEMPLATE, CUSTOMERS_TEMPLATE, DISHES_TEMPLATE, ORDERS_TEMPLATE,
};
use billing::error::{BillingError, Result};
use billing::observer::LogObserver;

#[derive(Parser)]
#[command(name = "billing")]
#[command(version, about = "Restaurant billing and revenue reports", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.billing or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Report as of this instant (RFC 3339, default: now)
    #[arg(long, global = true, value_name = "TIMESTAMP")]
    now: Option<String>,

    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DishView {
    /// Every catalog dish
    All,
    /// Highest revenue first
    Top,
    /// Positive trend, strongest first
    Rising,
    /// Negative trend, steepest first
    Falling,
    /// Few orders or falling fast
    Under,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show snapshot status
    Status,

    /// List customers in the snapshot
    Customers,

    /// Current-month revenue split into walk-in and monthly payments
    Revenue,

    /// Outstanding monthly bills per customer
    Bills,

    /// Monthly balances carried over from previous months
    Overdue,

    /// Per-dish orders, revenue, trend and rating
    Dishes {
        /// Reporting window: week, month or all (default: from config)
        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Which dishes to show
        #[arg(short, long, value_enum, default_value_t = DishView::All)]
        view: DishView,

        /// Number of dishes to show (default: analytics.top_n for ranked views)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// One-line summaries of dish performance
    Insights {
        /// Reporting window: week, month or all (default: from config)
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },

    /// Record a payment against a monthly customer's balance
    RecordPayment {
        /// Customer id or customer number
        customer: String,

        /// Payment amount
        amount: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let json = cli.json;

    // An explicit --now keeps its fixed offset; the wall clock keeps the
    // local zone so month boundaries follow its DST rules.
    match cli.now.as_deref() {
        Some(raw) => {
            let now = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| BillingError::InvalidTimestamp(raw.to_string()))?;
            dispatch(cli.command, &cfg_dir, &now, json)
        }
        None => dispatch(cli.command, &cfg_dir, &Local::now(), json),
    }
}

fn dispatch<Tz: TimeZone>(
    command: Commands,
    cfg_dir: &Path,
    now: &DateTime<Tz>,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Init => cmd_init(cfg_dir),
        Commands::Status => cmd_status(cfg_dir),
        Commands::Customers => cmd_customers(cfg_dir, json),
        Commands::Revenue => cmd_revenue(cfg_dir, now, json),
        Commands::Bills => cmd_bills(cfg_dir, json),
        Commands::Overdue => cmd_overdue(cfg_dir, now, json),
        Commands::Dishes {
            timeframe,
            view,
            limit,
        } => cmd_dishes(cfg_dir, now, timeframe, view, limit, json),
        Commands::Insights { timeframe } => cmd_insights(cfg_dir, now, timeframe, json),
        Commands::RecordPayment { customer, amount } => {
            cmd_record_payment(cfg_dir, &customer, amount)
        }
    }
}

fn ensure_initialized(cfg_dir: &Path) -> Result<Config> {
    if !cfg_dir.exists() {
        return Err(BillingError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    load_config(cfg_dir)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out =
        serde_json::to_string_pretty(value).map_err(|e| BillingError::Serialize(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(BillingError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("orders.json"), ORDERS_TEMPLATE)?;
    fs::write(cfg_dir.join("customers.json"), CUSTOMERS_TEMPLATE)?;
    fs::write(cfg_dir.join("dishes.json"), DISHES_TEMPLATE)?;

    println!("Initialized billing config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set your restaurant details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Export a snapshot into:       {}/{{orders,customers,dishes}}.json",
        cfg_dir.display()
    );
    println!();
    println!("Then run a report:");
    println!("  billing revenue");

    Ok(())
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "PAYMENT")]
    payment: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
    #[tabled(rename = "SPENT")]
    spent: String,
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "#")]
    number: i64,
    #[tabled(rename = "CUSTOMER")]
    name: String,
    #[tabled(rename = "ORDERS")]
    orders: usize,
    #[tabled(rename = "ORDERS TOTAL")]
    orders_total: String,
    #[tabled(rename = "OUTSTANDING")]
    outstanding: String,
}

#[derive(Tabled)]
struct OverdueRow {
    #[tabled(rename = "CUSTOMER")]
    name: String,
    #[tabled(rename = "OUTSTANDING")]
    amount: String,
    #[tabled(rename = "OLDEST ORDER")]
    oldest: String,
    #[tabled(rename = "AGE")]
    age: String,
    #[tabled(rename = "SEVERITY")]
    severity: String,
}

#[derive(Tabled)]
struct DishRow {
    #[tabled(rename = "DISH")]
    name: String,
    #[tabled(rename = "ORDERS")]
    orders: u32,
    #[tabled(rename = "REVENUE")]
    revenue: String,
    #[tabled(rename = "TREND")]
    trend: String,
    #[tabled(rename = "RATING")]
    rating: String,
}

fn format_whole_money(value: f64, currency_symbol: &str) -> String {
    let rounded = value.round() as i64;
    let grouped = format_grouped_int(rounded);
    format!("{}{:>6}", currency_symbol, grouped)
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Show what the config directory holds
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let customers = load_customers(cfg_dir, &config)?;
    let dishes = load_dishes(cfg_dir, &config)?;

    let pending = orders.iter().filter(|o| !o.is_approved()).count();
    let walk_ins = orders.iter().filter(|o| o.is_walk_in()).count();
    let monthly = customers.iter().filter(|c| c.is_monthly()).count();

    println!("Billing Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Restaurant:       {}", config.restaurant.name);
    println!(
        "Orders:           {} ({} not approved, {} walk-in)",
        orders.len(),
        pending,
        walk_ins
    );
    println!(
        "Customers:        {} ({} on monthly billing)",
        customers.len(),
        monthly
    );
    println!("Dishes:           {}", dishes.len());

    Ok(())
}

/// List customers in the snapshot
fn cmd_customers(cfg_dir: &Path, json: bool) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let customers = load_customers(cfg_dir, &config)?;

    if json {
        return print_json(&customers);
    }

    if customers.is_empty() {
        println!("No customers in snapshot.");
        return Ok(());
    }

    let symbol = &config.billing.currency_symbol;
    let mut sorted: Vec<&Customer> = customers.iter().collect();
    sorted.sort_by_key(|c| c.customer_number);

    let rows: Vec<CustomerRow> = sorted
        .iter()
        .map(|c| CustomerRow {
            number: if c.is_walk_in() {
                "walk-in".to_string()
            } else {
                c.customer_number.to_string()
            },
            id: c.id.clone(),
            name: c.name.clone(),
            role: c.role.to_string(),
            payment: c.payment_type.to_string(),
            balance: format_whole_money(c.monthly_balance, symbol),
            spent: format_whole_money(c.total_spent, symbol),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Current-month revenue breakdown
fn cmd_revenue<Tz: TimeZone>(cfg_dir: &Path, now: &DateTime<Tz>, json: bool) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let customers = load_customers(cfg_dir, &config)?;

    let report = calculate_revenue(&orders, &customers, now, &LogObserver);

    if json {
        return print_json(&report);
    }

    let symbol = &config.billing.currency_symbol;
    println!("Revenue for {}", report.period.start.format("%B %Y"));
    println!("{}", "-".repeat(50));
    println!(
        "Walk-in (cash):    {}",
        format_whole_money(report.walk_in_revenue, symbol)
    );
    println!(
        "Monthly payments:  {}",
        format_whole_money(report.monthly_payments_revenue, symbol)
    );
    println!(
        "Total revenue:     {}",
        format_whole_money(report.total_revenue, symbol)
    );
    println!("Cash orders:       {}", report.revenue_orders.len());

    if !report.anomalies.is_empty() {
        println!();
        println!("Needs review (balance exceeds recorded spend):");
        for anomaly in &report.anomalies {
            println!(
                "  #{} {} - paid {}",
                anomaly.customer.customer_number,
                anomaly.customer.name,
                format_whole_money(anomaly.paid_amount, symbol)
            );
        }
    }

    Ok(())
}

/// Outstanding monthly bills
fn cmd_bills(cfg_dir: &Path, json: bool) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let customers = load_customers(cfg_dir, &config)?;

    let report = calculate_monthly_bills(&orders, &customers, &LogObserver);

    if json {
        return print_json(&report);
    }

    if report.customers_with_bills.is_empty() {
        println!("No outstanding monthly bills.");
        return Ok(());
    }

    let symbol = &config.billing.currency_symbol;
    let rows: Vec<BillRow> = report
        .customers_with_bills
        .iter()
        .map(|bill| BillRow {
            number: bill.customer.customer_number,
            name: bill.customer.name.clone(),
            orders: bill.orders.len(),
            orders_total: format_whole_money(bill.orders_total, symbol),
            outstanding: format_whole_money(bill.outstanding, symbol),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "Total monthly bills: {} across {} customer(s)",
        format_whole_money(report.total_monthly_bills, symbol),
        report.total_customers
    );

    Ok(())
}

/// Balances carried over from previous months, most urgent first
fn cmd_overdue<Tz: TimeZone>(cfg_dir: &Path, now: &DateTime<Tz>, json: bool) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let customers = load_customers(cfg_dir, &config)?;

    let report = calculate_overdue_bills(&orders, &customers, now, &LogObserver);

    if json {
        return print_json(&report);
    }

    if report.bills.is_empty() {
        println!("No overdue bills.");
        return Ok(());
    }

    let symbol = &config.billing.currency_symbol;
    let rows: Vec<OverdueRow> = report
        .bills
        .iter()
        .map(|bill| OverdueRow {
            name: bill.customer.name.clone(),
            amount: format_whole_money(bill.overdue_amount, symbol),
            oldest: bill.oldest_order_date.format("%Y-%m-%d").to_string(),
            age: format_days_overdue(bill.days_overdue),
            severity: bill.severity.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "Total overdue: {} across {} customer(s)",
        format_whole_money(report.total_overdue_amount, symbol),
        report.total_overdue_customers
    );
    println!(
        "Critical: {}  High: {}  Medium: {}  Low: {}",
        report.by_severity.critical,
        report.by_severity.high,
        report.by_severity.medium,
        report.by_severity.low
    );

    Ok(())
}

/// Per-dish performance table
fn cmd_dishes<Tz: TimeZone>(
    cfg_dir: &Path,
    now: &DateTime<Tz>,
    timeframe: Option<Timeframe>,
    view: DishView,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let dishes = load_dishes(cfg_dir, &config)?;

    let timeframe = timeframe.unwrap_or(config.analytics.default_timeframe);
    let performances = analyze_dish_performance(&orders, &dishes, timeframe, now, &LogObserver);

    let ranked_limit = limit.unwrap_or(config.analytics.top_n);
    let selected: Vec<&DishPerformance> = match view {
        DishView::All => {
            let all: Vec<&DishPerformance> = performances.iter().collect();
            match limit {
                Some(n) => all.into_iter().take(n).collect(),
                None => all,
            }
        }
        DishView::Top => top_by_revenue(&performances, ranked_limit),
        DishView::Rising => trending_up(&performances, ranked_limit),
        DishView::Falling => trending_down(&performances, ranked_limit),
        DishView::Under => underperforming(&performances, ranked_limit),
    };

    if json {
        return print_json(&selected);
    }

    if selected.is_empty() {
        println!("No dishes to show (timeframe: {timeframe}).");
        return Ok(());
    }

    let symbol = &config.billing.currency_symbol;
    let rows: Vec<DishRow> = selected
        .iter()
        .map(|p| DishRow {
            name: p.name.clone(),
            orders: p.order_count,
            revenue: format_whole_money(p.total_revenue, symbol),
            trend: format!("{:+.1}%", p.trend_percentage),
            rating: format!("{:.1}", p.average_rating),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Templated dish insights
fn cmd_insights<Tz: TimeZone>(
    cfg_dir: &Path,
    now: &DateTime<Tz>,
    timeframe: Option<Timeframe>,
    json: bool,
) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;
    let orders = load_orders(cfg_dir, &config)?;
    let dishes = load_dishes(cfg_dir, &config)?;

    let timeframe = timeframe.unwrap_or(config.analytics.default_timeframe);
    let performances = analyze_dish_performance(&orders, &dishes, timeframe, now, &LogObserver);
    let insights = generate_insights(&performances);

    if json {
        return print_json(&insights);
    }

    if insights.is_empty() {
        println!("Nothing notable (timeframe: {timeframe}).");
        return Ok(());
    }

    println!("Insights (timeframe: {timeframe}):");
    for insight in &insights {
        println!("  - {}", insight.message);
    }

    Ok(())
}

/// Find a customer by id, or by customer number when the reference is numeric
fn resolve_customer(customers: &[Customer], reference: &str) -> Result<usize> {
    if let Some(idx) = customers.iter().position(|c| c.id == reference) {
        return Ok(idx);
    }

    reference
        .parse::<i64>()
        .ok()
        .and_then(|number| customers.iter().position(|c| c.customer_number == number))
        .ok_or_else(|| BillingError::CustomerNotFound(reference.to_string()))
}

/// Record a payment against a monthly customer's balance
fn cmd_record_payment(cfg_dir: &Path, customer_ref: &str, amount: f64) -> Result<()> {
    let config = ensure_initialized(cfg_dir)?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(BillingError::InvalidPaymentAmount);
    }

    let mut customers = load_customers(cfg_dir, &config)?;
    let idx = resolve_customer(&customers, customer_ref)?;
    let customer = &mut customers[idx];

    if !customer.is_monthly() {
        return Err(BillingError::NotMonthlyCustomer(customer.name.clone()));
    }

    // Guard against overpayment
    let remaining = customer.monthly_balance;
    if amount > remaining + 0.001 {
        return Err(BillingError::OverPayment {
            customer: customer.name.clone(),
            max: remaining.max(0.0),
        });
    }

    // Within the tolerance above, a payment at or over the balance settles it
    let settled = amount >= remaining;
    customer.monthly_balance = if settled { 0.0 } else { remaining - amount };
    let new_balance = customer.monthly_balance;
    let name = customer.name.clone();
    log::info!("Recorded payment of {amount:.2} for customer {}", customer.id);

    save_customers(cfg_dir, &config, &customers)?;

    let symbol = &config.billing.currency_symbol;
    if settled {
        println!(
            "Recorded {} payment for {} (fully paid, balance was {})",
            format_whole_money(amount, symbol),
            name,
            format_whole_money(remaining, symbol)
        );
    } else {
        println!(
            "Recorded {} payment for {} ({} remaining)",
            format_whole_money(amount, symbol),
            name,
            format_whole_money(new_balance, symbol)
        );
    }

    Ok(())
}
