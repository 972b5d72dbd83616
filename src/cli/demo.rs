use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;

use crate::cli::active_context;
use crate::deriver::{create_receipt_with_expense, NewReceipt};
use crate::error::Result;
use crate::store;

const CATEGORIES: &[(&str, &str)] = &[
    ("Food & Dining", "Groceries, restaurants, and coffee"),
    ("Transportation", "Gas, rideshare, and transit"),
    ("Utilities", "Power, water, and internet"),
    ("Entertainment", "Streaming and going out"),
    ("Shopping", "Online and retail purchases"),
    ("Healthcare", "Pharmacy and medical"),
    ("Other", "Everything else"),
];

const VENDORS: &[&str] = &[
    "Starbucks",
    "Whole Foods",
    "Shell Gas Station",
    "Netflix",
    "Amazon",
    "Walgreens",
    "Uber",
    "Target",
    "City Power & Light",
];

struct DemoRule {
    pattern: &'static str,
    threshold: Option<f64>,
    category: &'static str,
}

// Target has no rule on purpose so some receipts land in Uncategorized.
const RULES: &[DemoRule] = &[
    DemoRule { pattern: "starbucks", threshold: None, category: "Food & Dining" },
    DemoRule { pattern: "whole foods", threshold: None, category: "Food & Dining" },
    DemoRule { pattern: "shell", threshold: None, category: "Transportation" },
    DemoRule { pattern: "uber", threshold: None, category: "Transportation" },
    DemoRule { pattern: "netflix", threshold: None, category: "Entertainment" },
    DemoRule { pattern: "city (power|water)", threshold: Some(150.0), category: "Utilities" },
    DemoRule { pattern: "amazon", threshold: None, category: "Shopping" },
    DemoRule { pattern: "walgreens", threshold: None, category: "Healthcare" },
];

struct DemoReceipt {
    date: String,
    merchant: &'static str,
    vendor: &'static str,
    amount: f64,
}

/// Recurring receipts generated every month.
struct RecurringReceipt {
    day: u32,
    merchant: &'static str,
    vendor: &'static str,
    amount: f64,
}

const RECURRING: &[RecurringReceipt] = &[
    RecurringReceipt { day: 1, merchant: "NETFLIX.COM", vendor: "Netflix", amount: 15.49 },
    RecurringReceipt { day: 3, merchant: "STARBUCKS #4821", vendor: "Starbucks", amount: 6.75 },
    RecurringReceipt { day: 6, merchant: "WHOLE FOODS MKT", vendor: "Whole Foods", amount: 84.12 },
    RecurringReceipt { day: 8, merchant: "SHELL OIL 5703", vendor: "Shell Gas Station", amount: 48.30 },
    RecurringReceipt { day: 12, merchant: "UBER TRIP", vendor: "Uber", amount: 18.40 },
    RecurringReceipt { day: 15, merchant: "AMAZON MARKETPLACE", vendor: "Amazon", amount: 62.99 },
    RecurringReceipt { day: 18, merchant: "TARGET T-1138", vendor: "Target", amount: 37.25 },
    RecurringReceipt { day: 20, merchant: "WHOLE FOODS MKT", vendor: "Whole Foods", amount: 71.88 },
    RecurringReceipt { day: 22, merchant: "SHELL OIL 5703", vendor: "Shell Gas Station", amount: 51.10 },
    RecurringReceipt { day: 25, merchant: "CITY POWER & LIGHT", vendor: "City Power & Light", amount: 185.00 },
];

/// One-off receipts rotated across months, 2 per month.
const ROTATING: &[RecurringReceipt] = &[
    RecurringReceipt { day: 5, merchant: "WALGREENS #9920", vendor: "Walgreens", amount: 23.48 },
    RecurringReceipt { day: 10, merchant: "STARBUCKS #4821", vendor: "Starbucks", amount: 11.20 },
    RecurringReceipt { day: 14, merchant: "UBER TRIP", vendor: "Uber", amount: 26.85 },
    RecurringReceipt { day: 17, merchant: "AMAZON MARKETPLACE", vendor: "Amazon", amount: 129.00 },
    RecurringReceipt { day: 21, merchant: "TARGET T-1138", vendor: "Target", amount: 54.60 },
    RecurringReceipt { day: 27, merchant: "WALGREENS #9920", vendor: "Walgreens", amount: 8.99 },
];

/// Clamp a day to the last valid day of the given year/month.
fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap())
        .pred_opt()
        .unwrap()
        .day();
    day.min(last_day)
}

fn make_date(year: i32, month: u32, day: u32) -> String {
    let d = clamp_day(year, month, day);
    format!("{year:04}-{month:02}-{d:02}")
}

/// Build 6 months of demo receipts ending at the current month.
fn generate_receipts() -> Vec<DemoReceipt> {
    let today = Local::now().date_naive();
    let mut receipts = Vec::new();

    for i in 0..6u32 {
        let months_ago = 5 - i;
        let target = today - chrono::Months::new(months_ago);
        let year = target.year();
        let month = target.month();
        let idx = i as usize;

        // Small deterministic variation so monthly totals differ
        let vary = 1.0 + ((idx % 5) as f64 - 2.0) * 0.03;

        for r in RECURRING {
            receipts.push(DemoReceipt {
                date: make_date(year, month, r.day),
                merchant: r.merchant,
                vendor: r.vendor,
                amount: (r.amount * vary * 100.0).round() / 100.0,
            });
        }

        for j in 0..2usize {
            let pick = (idx * 2 + j) % ROTATING.len();
            let rot = &ROTATING[pick];
            receipts.push(DemoReceipt {
                date: make_date(year, month, rot.day),
                merchant: rot.merchant,
                vendor: rot.vendor,
                amount: rot.amount,
            });
        }
    }

    receipts
}

struct DemoCounts {
    receipts: usize,
    matched: usize,
    uncategorized: usize,
}

fn insert_demo_data(conn: &mut Connection, user_id: i64) -> Result<DemoCounts> {
    for (name, description) in CATEGORIES {
        conn.execute(
            "INSERT OR IGNORE INTO categories (name, description, user_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, description, user_id],
        )?;
    }

    for name in VENDORS {
        conn.execute(
            "INSERT INTO vendors (name, user_id) VALUES (?1, ?2)",
            rusqlite::params![name, user_id],
        )?;
    }

    for (pos, rule) in RULES.iter().enumerate() {
        let category_id = store::lookup_category(conn, user_id, rule.category)?;
        conn.execute(
            "INSERT INTO rules (pattern, amount_threshold, position, category_id, user_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![rule.pattern, rule.threshold, pos as i64, category_id, user_id],
        )?;
    }

    let receipts = generate_receipts();
    let mut matched = 0usize;
    let mut uncategorized = 0usize;
    for r in &receipts {
        let vendor_id = store::lookup_vendor(conn, user_id, r.vendor)?;
        let derivation = create_receipt_with_expense(
            conn,
            user_id,
            &NewReceipt {
                merchant: r.merchant,
                amount: r.amount,
                date: &r.date,
                notes: None,
                vendor_id,
            },
        )?;
        if derivation.matched_rule_id.is_some() {
            matched += 1;
        } else {
            uncategorized += 1;
        }
    }

    Ok(DemoCounts { receipts: receipts.len(), matched, uncategorized })
}

pub fn run() -> Result<()> {
    let (mut conn, user_id) = active_context()?;

    // Idempotency guard
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM vendors WHERE user_id = ?1 AND name = 'Shell Gas Station')",
        [user_id],
        |r| r.get(0),
    )?;
    if exists {
        println!("Demo data already loaded.");
        return Ok(());
    }

    let counts = insert_demo_data(&mut conn, user_id)?;

    println!("Demo data loaded!");
    println!("  Categories:    {}", CATEGORIES.len());
    println!("  Vendors:       {}", VENDORS.len());
    println!("  Rules:         {}", RULES.len());
    println!("  Receipts:      {}", counts.receipts);
    println!("  Categorized:   {}", counts.matched);
    println!("  Uncategorized: {}", counts.uncategorized);
    println!();
    println!("Try these next:");
    println!("  tally expenses list");
    println!("  tally report dashboard");
    println!("  tally report by-category");
    println!("  tally report monthly-trends");
    Ok(())
}
