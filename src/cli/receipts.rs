use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::active_context;
use crate::deriver::{create_receipt_with_expense, NewReceipt};
use crate::error::Result;
use crate::fmt::money;
use crate::store;

pub fn add(
    merchant: &str,
    amount: f64,
    date: Option<&str>,
    vendor: &str,
    notes: Option<&str>,
) -> Result<()> {
    let (mut conn, user_id) = active_context()?;
    let vendor_id = store::lookup_vendor(&conn, user_id, vendor)?;
    let today = Local::now().date_naive().to_string();
    let date = date.unwrap_or(&today);

    let derivation = create_receipt_with_expense(
        &mut conn,
        user_id,
        &NewReceipt {
            merchant,
            amount,
            date,
            notes,
            vendor_id,
        },
    )?;

    println!(
        "Recorded receipt {} ({merchant}, {})",
        derivation.receipt_id,
        money(amount)
    );
    if derivation.matched_rule_id.is_some() {
        println!(
            "Derived expense {} \u{2192} {}",
            derivation.expense_id,
            derivation.category_name.green()
        );
    } else {
        println!(
            "Derived expense {} \u{2192} {} (no rule matched)",
            derivation.expense_id,
            derivation.category_name.yellow()
        );
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let receipts = store::all_receipts(&conn, user_id)?;

    if receipts.is_empty() {
        println!("No receipts recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Merchant", "Amount", "Vendor", "Processed"]);
    for r in &receipts {
        let processed = if r.expense_count > 0 { "yes" } else { "no" };
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.date),
            Cell::new(&r.merchant),
            Cell::new(money(r.amount)),
            Cell::new(&r.vendor_name),
            Cell::new(processed),
        ]);
    }
    println!("Receipts ({})\n{table}", receipts.len());
    Ok(())
}
