use comfy_table::{Cell, Table};

use crate::cli::active_context;
use crate::error::{Result, TallyError};
use crate::fmt::money;
use crate::store;

pub fn add(name: &str, description: Option<&str>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO categories (name, description, user_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, description, user_id],
    )?;
    if inserted == 0 {
        return Err(TallyError::Validation(format!(
            "category '{name}' already exists"
        )));
    }
    println!("Added category: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.description, \
         COALESCE(SUM(e.amount), 0), COUNT(e.id) \
         FROM categories c LEFT JOIN expenses e ON e.category_id = c.id \
         WHERE c.user_id = ?1 GROUP BY c.id ORDER BY c.name",
    )?;
    let rows: Vec<(i64, String, Option<String>, f64, i64)> = stmt
        .query_map([user_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Description", "Total", "Expenses"]);
    for (id, name, description, total, count) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(name),
            Cell::new(description.unwrap_or_default()),
            Cell::new(money(total)),
            Cell::new(count),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn rename(name: &str, new_name: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let id = store::lookup_category(&conn, user_id, name)?;
    conn.execute(
        "UPDATE categories SET name = ?1 WHERE id = ?2",
        rusqlite::params![new_name, id],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TallyError::Validation(format!("category '{new_name}' already exists"))
        }
        other => TallyError::Db(other),
    })?;
    println!("Renamed category {name} to: {new_name}");
    Ok(())
}

/// Deletion is blocked while expenses reference the category; rules
/// referencing it are removed with it.
pub fn delete(name: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let id = store::lookup_category(&conn, user_id, name)?;
    let expense_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE category_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    if expense_count > 0 {
        return Err(TallyError::Other(format!(
            "cannot delete category '{name}': {expense_count} expenses still reference it; \
             reassign or delete them first"
        )));
    }
    let rules: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rules WHERE category_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    if rules > 0 {
        println!("Deleted category {name} ({rules} rules removed with it)");
    } else {
        println!("Deleted category {name}");
    }
    Ok(())
}
