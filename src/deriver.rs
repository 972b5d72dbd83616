use rusqlite::Connection;

use crate::error::{Result, TallyError};
use crate::matcher::evaluate_rules;
use crate::store;

/// Category name assigned when no rule matches a receipt.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

pub struct NewReceipt<'a> {
    pub merchant: &'a str,
    pub amount: f64,
    pub date: &'a str,
    pub notes: Option<&'a str>,
    pub vendor_id: i64,
}

pub struct Derivation {
    pub receipt_id: i64,
    pub expense_id: i64,
    pub category_id: i64,
    pub category_name: String,
    /// Id of the rule that decided the category, None when the fallback
    /// category was used.
    pub matched_rule_id: Option<i64>,
}

/// Create a receipt and its derived expense as one atomic unit. The
/// receipt write does not persist if any later step fails. Each call
/// derives exactly one expense; calling twice for identical input
/// produces two receipts and two expenses.
pub fn create_receipt_with_expense(
    conn: &mut Connection,
    user_id: i64,
    receipt: &NewReceipt,
) -> Result<Derivation> {
    if receipt.merchant.trim().is_empty() {
        return Err(TallyError::Validation("merchant must not be empty".to_string()));
    }
    store::validate_amount(receipt.amount)?;
    store::validate_date(receipt.date)?;

    let tx = conn.transaction()?;

    let vendor_owned: i64 = tx.query_row(
        "SELECT count(*) FROM vendors WHERE id = ?1 AND user_id = ?2",
        [receipt.vendor_id, user_id],
        |row| row.get(0),
    )?;
    if vendor_owned == 0 {
        return Err(TallyError::NotFound(format!("vendor {}", receipt.vendor_id)));
    }

    tx.execute(
        "INSERT INTO receipts (merchant, amount, date, notes, vendor_id, user_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            receipt.merchant,
            receipt.amount,
            receipt.date,
            receipt.notes,
            receipt.vendor_id,
            user_id
        ],
    )?;
    let receipt_id = tx.last_insert_rowid();

    let rules = store::load_rules(&tx, user_id)?;
    let matched = evaluate_rules(receipt.merchant, receipt.amount, &rules);
    let (category_id, category_name, matched_rule_id) = match matched {
        Some(m) => (m.category_id, m.category_name, Some(m.rule_id)),
        None => {
            let id = store::find_or_create_category(&tx, user_id, FALLBACK_CATEGORY)?;
            (id, FALLBACK_CATEGORY.to_string(), None)
        }
    };

    let description = format!("{} on {}", receipt.merchant, receipt.date);
    let expense_id = store::insert_expense(
        &tx,
        user_id,
        &store::NewExpense {
            amount: receipt.amount,
            date: receipt.date,
            description: Some(&description),
            category_id: Some(category_id),
            vendor_id: Some(receipt.vendor_id),
            receipt_id: Some(receipt_id),
        },
    )?;

    tx.commit()?;
    Ok(Derivation {
        receipt_id,
        expense_id,
        category_id,
        category_name,
        matched_rule_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::ExpenseStatus;
    use crate::store::{create_user, expenses_filtered, find_or_create_category};

    fn test_db() -> (tempfile::TempDir, Connection, i64, i64) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        let user_id = create_user(&conn, "alice", "alice@example.com").unwrap();
        conn.execute(
            "INSERT INTO vendors (name, user_id) VALUES ('Starbucks', ?1)",
            [user_id],
        )
        .unwrap();
        let vendor_id = conn.last_insert_rowid();
        (dir, conn, user_id, vendor_id)
    }

    fn add_rule(conn: &Connection, user_id: i64, pattern: &str, threshold: Option<f64>, category: &str) {
        let cat = find_or_create_category(conn, user_id, category).unwrap();
        let position: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM rules WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )
            .unwrap();
        conn.execute(
            "INSERT INTO rules (pattern, amount_threshold, position, category_id, user_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![pattern, threshold, position, cat, user_id],
        )
        .unwrap();
    }

    fn receipt<'a>(merchant: &'a str, amount: f64, vendor_id: i64) -> NewReceipt<'a> {
        NewReceipt {
            merchant,
            amount,
            date: "2025-01-15",
            notes: None,
            vendor_id,
        }
    }

    #[test]
    fn test_derives_exactly_one_matching_expense() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        add_rule(&conn, user_id, "starbucks", None, "Food & Dining");
        let d = create_receipt_with_expense(&mut conn, user_id, &receipt("STARBUCKS #42", 15.5, vendor_id))
            .unwrap();
        assert_eq!(d.category_name, "Food & Dining");
        assert!(d.matched_rule_id.is_some());
        let expenses = expenses_filtered(&conn, user_id, None, None, None).unwrap();
        assert_eq!(expenses.len(), 1);
        let e = &expenses[0];
        assert_eq!(e.amount, 15.5);
        assert_eq!(e.date, "2025-01-15");
        assert_eq!(e.status, ExpenseStatus::Pending);
        assert_eq!(e.receipt_id, Some(d.receipt_id));
        assert_eq!(e.vendor_name.as_deref(), Some("Starbucks"));
        assert_eq!(e.description.as_deref(), Some("STARBUCKS #42 on 2025-01-15"));
    }

    #[test]
    fn test_threshold_rule_beats_later_pattern_rule() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        add_rule(&conn, user_id, "starbucks", None, "Food & Dining");
        add_rule(&conn, user_id, "amazon", Some(100.0), "Tech");
        let d = create_receipt_with_expense(&mut conn, user_id, &receipt("Amazon", 250.0, vendor_id))
            .unwrap();
        assert_eq!(d.category_name, "Tech");
    }

    #[test]
    fn test_no_match_falls_back_to_uncategorized() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        add_rule(&conn, user_id, "starbucks", None, "Food & Dining");
        add_rule(&conn, user_id, "amazon", Some(100.0), "Tech");
        let d = create_receipt_with_expense(&mut conn, user_id, &receipt("Unknown Shop", 10.0, vendor_id))
            .unwrap();
        assert_eq!(d.category_name, FALLBACK_CATEGORY);
        assert!(d.matched_rule_id.is_none());
    }

    #[test]
    fn test_fallback_category_created_once() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        create_receipt_with_expense(&mut conn, user_id, &receipt("Mystery A", 10.0, vendor_id)).unwrap();
        create_receipt_with_expense(&mut conn, user_id, &receipt("Mystery B", 20.0, vendor_id)).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM categories WHERE user_id = ?1 AND name = ?2",
                rusqlite::params![user_id, FALLBACK_CATEGORY],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_not_idempotent_two_calls_two_expenses() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        create_receipt_with_expense(&mut conn, user_id, &receipt("Starbucks", 5.0, vendor_id)).unwrap();
        create_receipt_with_expense(&mut conn, user_id, &receipt("Starbucks", 5.0, vendor_id)).unwrap();
        let expenses: i64 = conn
            .query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))
            .unwrap();
        assert_eq!(expenses, 2);
    }

    #[test]
    fn test_rejects_invalid_receipt_without_writing() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        assert!(create_receipt_with_expense(&mut conn, user_id, &receipt("", 10.0, vendor_id)).is_err());
        assert!(create_receipt_with_expense(&mut conn, user_id, &receipt("Shop", -1.0, vendor_id)).is_err());
        let receipts: i64 = conn
            .query_row("SELECT count(*) FROM receipts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(receipts, 0);
    }

    #[test]
    fn test_rejects_vendor_owned_by_other_user() {
        let (_dir, mut conn, user_id, _vendor_id) = test_db();
        let bob = create_user(&conn, "bobby", "bob@example.com").unwrap();
        conn.execute("INSERT INTO vendors (name, user_id) VALUES ('Private', ?1)", [bob])
            .unwrap();
        let bobs_vendor = conn.last_insert_rowid();
        let result = create_receipt_with_expense(&mut conn, user_id, &receipt("Shop", 10.0, bobs_vendor));
        assert!(matches!(result, Err(TallyError::NotFound(_))));
    }

    #[test]
    fn test_receipt_rolls_back_when_expense_insert_fails() {
        let (_dir, mut conn, user_id, vendor_id) = test_db();
        // Force the expense insert to fail after the receipt insert has
        // already happened inside the transaction.
        conn.execute_batch(
            "CREATE TRIGGER block_expenses BEFORE INSERT ON expenses \
             BEGIN SELECT RAISE(ABORT, 'expense insert blocked'); END;",
        )
        .unwrap();
        let result = create_receipt_with_expense(&mut conn, user_id, &receipt("Shop", 10.0, vendor_id));
        assert!(result.is_err());
        let receipts: i64 = conn
            .query_row("SELECT count(*) FROM receipts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(receipts, 0, "receipt must not persist when derivation fails");
    }
}
