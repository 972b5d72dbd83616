use chrono::NaiveDate;
use rusqlite::{Connection, Row};

use crate::error::{Result, TallyError};
use crate::models::{Category, Expense, ExpenseStatus, Receipt, Rule, User, Vendor};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| TallyError::Validation(format!("invalid date '{date}' (expected YYYY-MM-DD)")))
}

pub fn validate_amount(amount: f64) -> Result<()> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(TallyError::Validation(format!(
            "amount must be positive, got {amount}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn lookup_user(conn: &Connection, username: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM users WHERE username = ?1",
        [username],
        |row| row.get(0),
    )
    .map_err(|_| TallyError::UnknownUser(username.to_string()))
}

pub fn create_user(conn: &Connection, username: &str, email: &str) -> Result<i64> {
    if username.len() < 3 || username.len() > 50 {
        return Err(TallyError::Validation(
            "username must be 3-50 characters".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(TallyError::Validation(format!("invalid email '{email}'")));
    }
    conn.execute(
        "INSERT INTO users (username, email) VALUES (?1, ?2)",
        [username, email],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TallyError::Validation(format!(
                "a user with username '{username}' or email '{email}' already exists"
            ))
        }
        other => TallyError::Db(other),
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, username, email FROM users ORDER BY username")?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn lookup_category(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM categories WHERE user_id = ?1 AND name = ?2",
        rusqlite::params![user_id, name],
        |row| row.get(0),
    )
    .map_err(|_| TallyError::UnknownCategory(name.to_string()))
}

/// Find a category by exact name, creating it if absent. Idempotent:
/// repeated calls for the same user and name return the same row.
pub fn find_or_create_category(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    if let Ok(id) = lookup_category(conn, user_id, name) {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO categories (name, user_id) VALUES (?1, ?2)",
        rusqlite::params![name, user_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_categories(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description FROM categories WHERE user_id = ?1 ORDER BY name",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

pub fn lookup_vendor(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM vendors WHERE user_id = ?1 AND name = ?2",
        rusqlite::params![user_id, name],
        |row| row.get(0),
    )
    .map_err(|_| TallyError::UnknownVendor(name.to_string()))
}

pub fn list_vendors(conn: &Connection, user_id: i64) -> Result<Vec<Vendor>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, address, phone, email, tax_identifier \
         FROM vendors WHERE user_id = ?1 ORDER BY name",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok(Vendor {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            tax_identifier: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A user's rules with categories resolved, in evaluation order:
/// position ascending, then id. This order is the matcher's contract.
pub fn load_rules(conn: &Connection, user_id: i64) -> Result<Vec<Rule>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.pattern, r.amount_threshold, r.position, r.category_id, c.name \
         FROM rules r JOIN categories c ON r.category_id = c.id \
         WHERE r.user_id = ?1 ORDER BY r.position, r.id",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok(Rule {
            id: row.get(0)?,
            pattern: row.get(1)?,
            amount_threshold: row.get(2)?,
            position: row.get(3)?,
            category_id: row.get(4)?,
            category_name: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Next free position for a new rule (appends to the end of the scan order).
pub fn next_rule_position(conn: &Connection, user_id: i64) -> Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(position) FROM rules WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(max.map_or(0, |m| m + 1))
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

fn expense_from_row(row: &Row) -> rusqlite::Result<Expense> {
    let status_str: String = row.get(4)?;
    let status = ExpenseStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("invalid status: {status_str}").into(),
        )
    })?;
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        status,
        category_id: row.get(5)?,
        category_name: row.get(6)?,
        vendor_id: row.get(7)?,
        vendor_name: row.get(8)?,
        receipt_id: row.get(9)?,
    })
}

const EXPENSE_SELECT: &str = "SELECT e.id, e.amount, e.date, e.description, e.status, \
     e.category_id, c.name, e.vendor_id, v.name, e.receipt_id \
     FROM expenses e \
     LEFT JOIN categories c ON e.category_id = c.id \
     LEFT JOIN vendors v ON e.vendor_id = v.id";

/// A user's expenses within an inclusive date window.
pub fn expenses_in_window(
    conn: &Connection,
    user_id: i64,
    start: &str,
    end: &str,
) -> Result<Vec<Expense>> {
    let sql = format!("{EXPENSE_SELECT} WHERE e.user_id = ?1 AND e.date BETWEEN ?2 AND ?3 ORDER BY e.date, e.id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params![user_id, start, end], expense_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Filtered listing for `tally expenses list`: any combination of status,
/// category, and window.
pub fn expenses_filtered(
    conn: &Connection,
    user_id: i64,
    status: Option<ExpenseStatus>,
    category_id: Option<i64>,
    window: Option<(&str, &str)>,
) -> Result<Vec<Expense>> {
    let mut clauses = vec!["e.user_id = ?1".to_string()];
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id)];
    if let Some(status) = status {
        params.push(Box::new(status.as_str().to_string()));
        clauses.push(format!("e.status = ?{}", params.len()));
    }
    if let Some(cat) = category_id {
        params.push(Box::new(cat));
        clauses.push(format!("e.category_id = ?{}", params.len()));
    }
    if let Some((start, end)) = window {
        params.push(Box::new(start.to_string()));
        let a = params.len();
        params.push(Box::new(end.to_string()));
        clauses.push(format!("e.date BETWEEN ?{a} AND ?{}", params.len()));
    }
    let sql = format!(
        "{EXPENSE_SELECT} WHERE {} ORDER BY e.date DESC, e.id DESC",
        clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), expense_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Expenses for one vendor within a window.
pub fn expenses_for_vendor(
    conn: &Connection,
    user_id: i64,
    vendor_id: i64,
    start: &str,
    end: &str,
) -> Result<Vec<Expense>> {
    let sql = format!(
        "{EXPENSE_SELECT} WHERE e.user_id = ?1 AND e.vendor_id = ?2 \
         AND e.date BETWEEN ?3 AND ?4 ORDER BY e.date, e.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params![user_id, vendor_id, start, end],
        expense_from_row,
    )?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn get_expense(conn: &Connection, user_id: i64, id: i64) -> Result<Expense> {
    let sql = format!("{EXPENSE_SELECT} WHERE e.user_id = ?1 AND e.id = ?2");
    conn.query_row(&sql, rusqlite::params![user_id, id], expense_from_row)
        .map_err(|_| TallyError::NotFound(format!("expense {id}")))
}

pub struct NewExpense<'a> {
    pub amount: f64,
    pub date: &'a str,
    pub description: Option<&'a str>,
    pub category_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub receipt_id: Option<i64>,
}

/// Validate and insert an expense. Status always starts as pending.
pub fn insert_expense(conn: &Connection, user_id: i64, expense: &NewExpense) -> Result<i64> {
    validate_amount(expense.amount)?;
    validate_date(expense.date)?;
    conn.execute(
        "INSERT INTO expenses (amount, date, description, status, category_id, vendor_id, receipt_id, user_id) \
         VALUES (?1, ?2, ?3, 'pending', ?4, ?5, ?6, ?7)",
        rusqlite::params![
            expense.amount,
            expense.date,
            expense.description,
            expense.category_id,
            expense.vendor_id,
            expense.receipt_id,
            user_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

fn receipt_from_row(row: &Row) -> rusqlite::Result<Receipt> {
    Ok(Receipt {
        id: row.get(0)?,
        merchant: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
        vendor_id: row.get(5)?,
        vendor_name: row.get(6)?,
        expense_count: row.get(7)?,
    })
}

const RECEIPT_SELECT: &str = "SELECT r.id, r.merchant, r.amount, r.date, r.notes, \
     r.vendor_id, v.name, \
     (SELECT count(*) FROM expenses e WHERE e.receipt_id = r.id) \
     FROM receipts r JOIN vendors v ON r.vendor_id = v.id";

pub fn receipts_in_window(
    conn: &Connection,
    user_id: i64,
    start: &str,
    end: &str,
) -> Result<Vec<Receipt>> {
    let sql = format!(
        "{RECEIPT_SELECT} WHERE r.user_id = ?1 AND r.date BETWEEN ?2 AND ?3 \
         ORDER BY r.date, r.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params![user_id, start, end], receipt_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn all_receipts(conn: &Connection, user_id: i64) -> Result<Vec<Receipt>> {
    let sql = format!("{RECEIPT_SELECT} WHERE r.user_id = ?1 ORDER BY r.date DESC, r.id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([user_id], receipt_from_row)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
