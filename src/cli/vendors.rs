use comfy_table::{Cell, Table};

use crate::cli::active_context;
use crate::error::Result;
use crate::fmt::money;
use crate::store;

pub fn add(
    name: &str,
    address: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    tax_identifier: Option<&str>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    conn.execute(
        "INSERT INTO vendors (name, address, phone, email, tax_identifier, user_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![name, address, phone, email, tax_identifier, user_id],
    )?;
    println!("Added vendor: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let vendors = store::list_vendors(&conn, user_id)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Phone", "Email", "Tax ID"]);
    for v in vendors {
        table.add_row(vec![
            Cell::new(v.id),
            Cell::new(v.name),
            Cell::new(v.phone.unwrap_or_default()),
            Cell::new(v.email.unwrap_or_default()),
            Cell::new(v.tax_identifier.unwrap_or_default()),
        ]);
    }
    println!("Vendors\n{table}");
    Ok(())
}

pub fn show(name: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let vendor_id = store::lookup_vendor(&conn, user_id, name)?;
    let (address, phone, email, tax_identifier): (
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    ) = conn.query_row(
        "SELECT address, phone, email, tax_identifier FROM vendors WHERE id = ?1",
        [vendor_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    let (expense_total, expense_count): (f64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM expenses WHERE vendor_id = ?1",
        [vendor_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let receipt_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM receipts WHERE vendor_id = ?1",
        [vendor_id],
        |row| row.get(0),
    )?;

    println!("Vendor:     {name}");
    println!("Address:    {}", address.unwrap_or_default());
    println!("Phone:      {}", phone.unwrap_or_default());
    println!("Email:      {}", email.unwrap_or_default());
    println!("Tax ID:     {}", tax_identifier.unwrap_or_default());
    println!();
    println!("Receipts:   {receipt_count}");
    println!("Expenses:   {expense_count} totaling {}", money(expense_total));
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let vendor_id = store::lookup_vendor(&conn, user_id, name)?;
    let receipts: i64 = conn.query_row(
        "SELECT COUNT(*) FROM receipts WHERE vendor_id = ?1",
        [vendor_id],
        |row| row.get(0),
    )?;
    let expenses: i64 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE vendor_id = ?1",
        [vendor_id],
        |row| row.get(0),
    )?;
    conn.execute("DELETE FROM vendors WHERE id = ?1", [vendor_id])?;
    println!("Deleted vendor {name} ({receipts} receipts, {expenses} expenses removed with it)");
    Ok(())
}
