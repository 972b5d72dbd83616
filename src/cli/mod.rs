pub mod categories;
pub mod demo;
pub mod expenses;
pub mod export;
pub mod init;
pub mod receipts;
pub mod report;
pub mod rules;
pub mod status;
pub mod users;
pub mod vendors;

use chrono::{Datelike, Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::settings::{db_path, load_settings};
use crate::store;

/// Open the database and resolve the active user. Every data command
/// operates within this scope.
pub(crate) fn active_context() -> Result<(Connection, i64)> {
    let settings = load_settings();
    if settings.active_user.is_empty() {
        return Err(TallyError::Other(
            "no active user; run `tally init` first".to_string(),
        ));
    }
    let conn = get_connection(&db_path())?;
    let user_id = store::lookup_user(&conn, &settings.active_user)?;
    Ok((conn, user_id))
}

/// Resolve an inclusive [from, to] window: both bounds or neither.
pub(crate) fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    default: (NaiveDate, NaiveDate),
) -> Result<(String, String)> {
    match (from, to) {
        (Some(from), Some(to)) => {
            store::validate_date(from)?;
            store::validate_date(to)?;
            Ok((from.to_string(), to.to_string()))
        }
        (Some(_), None) => Err(TallyError::Other(
            "--from requires --to (both date boundaries must be specified)".to_string(),
        )),
        (None, Some(_)) => Err(TallyError::Other(
            "--to requires --from (both date boundaries must be specified)".to_string(),
        )),
        (None, None) => Ok((default.0.to_string(), default.1.to_string())),
    }
}

pub(crate) fn month_window() -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    let start = today.with_day(1).unwrap_or(today);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    (start, end)
}

pub(crate) fn year_window() -> (NaiveDate, NaiveDate) {
    let year = Local::now().year();
    (
        NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date"),
    )
}

/// Window reaching back `months` whole months from today.
pub(crate) fn trailing_months_window(months: u32) -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    let start = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today);
    (start, today)
}

#[derive(Parser)]
#[command(name = "tally", about = "Receipt and expense tracking CLI with rule-based auto-categorization.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and create the first user.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Username for the initial user
        #[arg(long)]
        username: String,
        /// Email for the initial user
        #[arg(long)]
        email: String,
    },
    /// Manage users (all data is scoped to the active user).
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage vendors.
    Vendors {
        #[command(subcommand)]
        command: VendorsCommands,
    },
    /// Manage expense categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage auto-categorization rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Record and list receipts. Recording a receipt derives its expense.
    Receipts {
        #[command(subcommand)]
        command: ReceiptsCommands,
    },
    /// Manage expenses.
    Expenses {
        #[command(subcommand)]
        command: ExpensesCommands,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export reports to CSV.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Load sample data (categories, vendors, rules, receipts) to explore tally.
    Demo,
    /// Show current database and summary statistics.
    Status,
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a user.
    Add {
        username: String,
        #[arg(long)]
        email: String,
    },
    /// List all users.
    List,
    /// Switch the active user.
    Switch { username: String },
    /// Delete a user and everything it owns.
    Delete { username: String },
}

#[derive(Subcommand)]
pub enum VendorsCommands {
    /// Add a vendor.
    Add {
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "tax-id")]
        tax_identifier: Option<String>,
    },
    /// List all vendors.
    List,
    /// Show one vendor with its expense total.
    Show { name: String },
    /// Delete a vendor and its receipts and expenses.
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List categories with their expense totals.
    List,
    /// Rename a category.
    Rename {
        name: String,
        #[arg(long = "to")]
        new_name: String,
    },
    /// Delete a category (blocked while expenses reference it).
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Add a categorization rule.
    Add {
        /// Pattern matched against merchant names (substring or regex,
        /// case-insensitive)
        pattern: String,
        /// Category name to assign
        #[arg(long)]
        category: String,
        /// Also match any receipt with amount >= this threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Evaluation position (lower runs first; default: end of list)
        #[arg(long)]
        position: Option<i64>,
    },
    /// List rules in evaluation order.
    List,
    /// Update an existing rule.
    Update {
        /// Rule ID (shown in `tally rules list`)
        id: i64,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        position: Option<i64>,
    },
    /// Delete a rule by ID.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReceiptsCommands {
    /// Record a receipt; a categorized expense is derived atomically.
    Add {
        /// Merchant name as printed on the receipt
        merchant: String,
        #[arg(long)]
        amount: f64,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Vendor name
        #[arg(long)]
        vendor: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List receipts.
    List,
}

#[derive(Subcommand)]
pub enum ExpensesCommands {
    /// Add a manual expense (no receipt required).
    Add {
        #[arg(long)]
        amount: f64,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
    },
    /// List expenses, optionally filtered.
    List {
        /// Filter by status: pending, approved, rejected
        #[arg(long)]
        status: Option<String>,
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Approve a pending expense.
    Approve { id: i64 },
    /// Reject a pending expense.
    Reject { id: i64 },
    /// Delete an expense.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Overall totals: all-time, this month, pending count, categories.
    Dashboard,
    /// Expenses in a date window with total/count/average.
    ByDate {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Expense totals grouped by category.
    ByCategory {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Expense totals grouped by vendor, largest first.
    ByVendor {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Pending/approved/rejected totals and counts.
    ByStatus {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Highest-spend vendors.
    TopVendors {
        /// How many vendors to show
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// One vendor's expenses with a running total.
    VendorTransactions {
        /// Vendor name
        vendor: String,
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Per-category monthly spending buckets.
    CategoryTrends {
        /// How many months back to include
        #[arg(long, default_value = "6")]
        months: u32,
    },
    /// Per-category totals, counts, and averages.
    CategorySummary {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Receipts that have no derived expense.
    UnprocessedReceipts,
    /// Receipts in a window with processed/unprocessed counts.
    ReceiptsByDate {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Monthly spending totals and counts.
    MonthlyTrends {
        /// How many months back to include
        #[arg(long, default_value = "12")]
        months: u32,
    },
    /// Compare a year against the one before it.
    YearComparison {
        /// Target year (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Full summary: totals, extremes, status sums, top categories/vendors.
    Summary {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the by-category breakdown to CSV.
    ByCategory {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
        /// Output file path
        #[arg(long)]
        output: String,
    },
    /// Export the by-vendor breakdown to CSV.
    ByVendor {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
        #[arg(long)]
        output: String,
    },
    /// Export monthly trends to CSV.
    MonthlyTrends {
        #[arg(long, default_value = "12")]
        months: u32,
        #[arg(long)]
        output: String,
    },
    /// Export the expense summary to CSV.
    Summary {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
        #[arg(long)]
        output: String,
    },
}
