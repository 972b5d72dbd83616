use std::fmt;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_identifier: Option<String>,
}

/// A categorization rule with its category already resolved.
/// Rules are evaluated in (position, id) order; the first match wins.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: i64,
    pub pattern: String,
    pub amount_threshold: Option<f64>,
    pub position: i64,
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone)]
pub struct Receipt {
    pub id: i64,
    pub merchant: String,
    pub amount: f64,
    pub date: String,
    pub notes: Option<String>,
    pub vendor_id: i64,
    pub vendor_name: String,
    /// Number of expenses linked to this receipt.
    pub expense_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<ExpenseStatus> {
        match s {
            "pending" => Some(ExpenseStatus::Pending),
            "approved" => Some(ExpenseStatus::Approved),
            "rejected" => Some(ExpenseStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense row with category/vendor names resolved for display and
/// aggregation. Name fields are None when the expense has no link.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub date: String,
    pub description: Option<String>,
    pub status: ExpenseStatus,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub vendor_id: Option<i64>,
    pub vendor_name: Option<String>,
    pub receipt_id: Option<i64>,
}

impl Expense {
    /// Month bucket key: the YYYY-MM prefix of the expense date.
    pub fn month_key(&self) -> &str {
        if self.date.len() >= 7 {
            &self.date[..7]
        } else {
            &self.date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in ["pending", "approved", "rejected"] {
            assert_eq!(ExpenseStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(ExpenseStatus::parse("cancelled").is_none());
    }

    #[test]
    fn test_month_key() {
        let e = Expense {
            id: 1,
            amount: 10.0,
            date: "2025-03-15".to_string(),
            description: None,
            status: ExpenseStatus::Pending,
            category_id: None,
            category_name: None,
            vendor_id: None,
            vendor_name: None,
            receipt_id: None,
        };
        assert_eq!(e.month_key(), "2025-03");
    }
}
