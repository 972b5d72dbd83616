use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::active_context;
use crate::error::{Result, TallyError};
use crate::fmt::money;
use crate::models::ExpenseStatus;
use crate::store;

pub fn add(
    amount: f64,
    date: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    vendor: Option<&str>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let category_id = match category {
        Some(name) => Some(store::lookup_category(&conn, user_id, name)?),
        None => None,
    };
    let vendor_id = match vendor {
        Some(name) => Some(store::lookup_vendor(&conn, user_id, name)?),
        None => None,
    };
    let today = Local::now().date_naive().to_string();
    let date = date.unwrap_or(&today);

    let id = store::insert_expense(
        &conn,
        user_id,
        &store::NewExpense {
            amount,
            date,
            description,
            category_id,
            vendor_id,
            receipt_id: None,
        },
    )?;
    println!("Added expense {id}: {} on {date}", money(amount));
    Ok(())
}

pub fn list(
    status: Option<&str>,
    category: Option<&str>,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;

    let status = match status {
        Some(s) => Some(ExpenseStatus::parse(s).ok_or_else(|| {
            TallyError::Validation(format!(
                "invalid status '{s}' (expected pending, approved, or rejected)"
            ))
        })?),
        None => None,
    };
    let category_id = match category {
        Some(name) => Some(store::lookup_category(&conn, user_id, name)?),
        None => None,
    };
    let window = match (from_date, to_date) {
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => {
            return Err(TallyError::Other(
                "--from requires --to (both date boundaries must be specified)".to_string(),
            ))
        }
    };

    let expenses = store::expenses_filtered(&conn, user_id, status, category_id, window)?;
    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount", "Status", "Category", "Vendor"]);
    for e in &expenses {
        let status_cell = match e.status {
            ExpenseStatus::Pending => e.status.as_str().yellow().to_string(),
            ExpenseStatus::Approved => e.status.as_str().green().to_string(),
            ExpenseStatus::Rejected => e.status.as_str().red().to_string(),
        };
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(&e.date),
            Cell::new(e.description.as_deref().unwrap_or("")),
            Cell::new(money(e.amount)),
            Cell::new(status_cell),
            Cell::new(e.category_name.as_deref().unwrap_or("\u{2014}")),
            Cell::new(e.vendor_name.as_deref().unwrap_or("")),
        ]);
    }
    println!(
        "Expenses ({} rows, total: {})\n{table}",
        expenses.len(),
        money(total)
    );
    Ok(())
}

fn transition(id: i64, to: ExpenseStatus) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let expense = store::get_expense(&conn, user_id, id)?;
    if expense.status != ExpenseStatus::Pending {
        return Err(TallyError::Other(format!(
            "expense {id} is {}; only pending expenses can be {}",
            expense.status,
            to
        )));
    }
    conn.execute(
        "UPDATE expenses SET status = ?1 WHERE id = ?2",
        rusqlite::params![to.as_str(), id],
    )?;
    println!("Expense {id} {to}");
    Ok(())
}

pub fn approve(id: i64) -> Result<()> {
    transition(id, ExpenseStatus::Approved)
}

pub fn reject(id: i64) -> Result<()> {
    transition(id, ExpenseStatus::Rejected)
}

pub fn delete(id: i64) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let deleted = conn.execute(
        "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
        [id, user_id],
    )?;
    if deleted == 0 {
        return Err(TallyError::NotFound(format!("expense {id}")));
    }
    println!("Deleted expense {id}");
    Ok(())
}
