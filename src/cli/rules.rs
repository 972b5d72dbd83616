use colored::Colorize;
use comfy_table::{Cell, Table};
use regex::RegexBuilder;

use crate::cli::active_context;
use crate::error::{Result, TallyError};
use crate::store;

pub fn add(
    pattern: &str,
    category: &str,
    threshold: Option<f64>,
    position: Option<i64>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;

    if pattern.trim().is_empty() {
        return Err(TallyError::Validation("pattern must not be empty".to_string()));
    }
    if let Some(t) = threshold {
        if t <= 0.0 {
            return Err(TallyError::Validation(format!(
                "amount threshold must be positive, got {t}"
            )));
        }
    }
    // Non-fatal: the matcher falls back to a plain substring check.
    if RegexBuilder::new(pattern).case_insensitive(true).build().is_err() {
        eprintln!(
            "{}",
            format!("Warning: '{pattern}' is not a valid regex; it will match as a substring only")
                .yellow()
        );
    }

    let category_id = store::lookup_category(&conn, user_id, category)?;
    let position = match position {
        Some(p) => p,
        None => store::next_rule_position(&conn, user_id)?,
    };
    conn.execute(
        "INSERT INTO rules (pattern, amount_threshold, position, category_id, user_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![pattern, threshold, position, category_id, user_id],
    )?;
    println!("Added rule: '{pattern}' \u{2192} {category}");
    Ok(())
}

pub fn list() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let rules = store::load_rules(&conn, user_id)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Position", "Pattern", "Threshold", "Category"]);
    for rule in rules {
        let threshold = rule
            .amount_threshold
            .map(|t| format!("{t:.2}"))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(rule.id),
            Cell::new(rule.position),
            Cell::new(rule.pattern),
            Cell::new(threshold),
            Cell::new(rule.category_name),
        ]);
    }
    println!("Rules (evaluation order)\n{table}");
    Ok(())
}

pub fn update(
    id: i64,
    pattern: Option<&str>,
    category: Option<&str>,
    threshold: Option<f64>,
    position: Option<i64>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rules WHERE id = ?1 AND user_id = ?2",
        [id, user_id],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(TallyError::NotFound(format!("rule {id}")));
    }

    if let Some(pattern) = pattern {
        conn.execute(
            "UPDATE rules SET pattern = ?1 WHERE id = ?2",
            rusqlite::params![pattern, id],
        )?;
    }
    if let Some(category) = category {
        let category_id = store::lookup_category(&conn, user_id, category)?;
        conn.execute(
            "UPDATE rules SET category_id = ?1 WHERE id = ?2",
            [category_id, id],
        )?;
    }
    if let Some(t) = threshold {
        if t <= 0.0 {
            return Err(TallyError::Validation(format!(
                "amount threshold must be positive, got {t}"
            )));
        }
        conn.execute(
            "UPDATE rules SET amount_threshold = ?1 WHERE id = ?2",
            rusqlite::params![t, id],
        )?;
    }
    if let Some(p) = position {
        conn.execute("UPDATE rules SET position = ?1 WHERE id = ?2", [p, id])?;
    }
    println!("Updated rule {id}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let deleted = conn.execute(
        "DELETE FROM rules WHERE id = ?1 AND user_id = ?2",
        [id, user_id],
    )?;
    if deleted == 0 {
        return Err(TallyError::NotFound(format!("rule {id}")));
    }
    println!("Deleted rule {id}");
    Ok(())
}
