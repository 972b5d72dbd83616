//! Report aggregations over a user's expense/receipt ledger.
//!
//! Every function here is a pure computation over collections the store
//! has already filtered by owner and date window. Empty input is always a
//! defined case: totals, counts, and averages come back zeroed, never as
//! a division error. Every "sorted by sum" ordering uses a stable sort,
//! so entries with equal sums keep their first-appearance order.

use std::collections::HashMap;

use crate::models::{Category, Expense, ExpenseStatus, Receipt};

/// Group amounts by key, preserving the order in which keys first appear.
fn group_sums<'a, I>(pairs: I) -> Vec<(String, f64)>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for (key, amount) in pairs {
        if !sums.contains_key(key) {
            order.push(key.to_string());
        }
        *sums.entry(key.to_string()).or_insert(0.0) += amount;
    }
    order
        .into_iter()
        .map(|key| {
            let total = sums[&key];
            (key, total)
        })
        .collect()
}

fn sort_by_total_desc(groups: &mut [(String, f64)]) {
    // Stable: equal totals keep their pre-sort order.
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

fn sorted_desc_by_date(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    expenses
}

fn month_sums(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut groups = group_sums(expenses.iter().map(|e| (e.month_key(), e.amount)));
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

// ---------------------------------------------------------------------------
// Expenses by date range
// ---------------------------------------------------------------------------

pub struct DateRangeReport {
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

pub fn expenses_by_date(expenses: Vec<Expense>) -> DateRangeReport {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };
    DateRangeReport {
        expenses: sorted_desc_by_date(expenses),
        total,
        count,
        average,
    }
}

// ---------------------------------------------------------------------------
// Expenses by category
// ---------------------------------------------------------------------------

pub struct CategoryBreakdown {
    pub groups: Vec<(String, f64)>,
    pub total: f64,
}

/// Group by category name. Expenses without a category are not listed,
/// matching the by-category report's join semantics.
pub fn expenses_by_category(expenses: &[Expense]) -> CategoryBreakdown {
    let groups = group_sums(
        expenses
            .iter()
            .filter_map(|e| e.category_name.as_deref().map(|name| (name, e.amount))),
    );
    let total = groups.iter().map(|(_, t)| t).sum();
    CategoryBreakdown { groups, total }
}

// ---------------------------------------------------------------------------
// Expenses by vendor
// ---------------------------------------------------------------------------

pub struct VendorBreakdown {
    /// (vendor name, summed amount), descending by sum.
    pub groups: Vec<(String, f64)>,
    pub total: f64,
}

pub fn expenses_by_vendor(expenses: &[Expense]) -> VendorBreakdown {
    let mut groups = group_sums(
        expenses
            .iter()
            .filter_map(|e| e.vendor_name.as_deref().map(|name| (name, e.amount))),
    );
    let total = groups.iter().map(|(_, t)| t).sum();
    sort_by_total_desc(&mut groups);
    VendorBreakdown { groups, total }
}

// ---------------------------------------------------------------------------
// Expenses by status
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
pub struct StatusBucket {
    pub total: f64,
    pub count: usize,
}

pub struct StatusBreakdown {
    pub pending: StatusBucket,
    pub approved: StatusBucket,
    pub rejected: StatusBucket,
    pub total: f64,
    pub count: usize,
}

pub fn expenses_by_status(expenses: &[Expense]) -> StatusBreakdown {
    let mut pending = StatusBucket::default();
    let mut approved = StatusBucket::default();
    let mut rejected = StatusBucket::default();
    for e in expenses {
        let bucket = match e.status {
            ExpenseStatus::Pending => &mut pending,
            ExpenseStatus::Approved => &mut approved,
            ExpenseStatus::Rejected => &mut rejected,
        };
        bucket.total += e.amount;
        bucket.count += 1;
    }
    let total = pending.total + approved.total + rejected.total;
    let count = pending.count + approved.count + rejected.count;
    StatusBreakdown {
        pending,
        approved,
        rejected,
        total,
        count,
    }
}

// ---------------------------------------------------------------------------
// Top vendors
// ---------------------------------------------------------------------------

pub const DEFAULT_TOP_VENDORS: usize = 10;

pub struct VendorRanking {
    pub name: String,
    pub total_amount: f64,
    pub transaction_count: usize,
}

pub fn top_vendors(expenses: &[Expense], limit: usize) -> Vec<VendorRanking> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (f64, usize)> = HashMap::new();
    for e in expenses {
        let Some(name) = e.vendor_name.as_deref() else {
            continue;
        };
        if !stats.contains_key(name) {
            order.push(name.to_string());
        }
        let entry = stats.entry(name.to_string()).or_insert((0.0, 0));
        entry.0 += e.amount;
        entry.1 += 1;
    }
    let mut rankings: Vec<VendorRanking> = order
        .into_iter()
        .map(|name| {
            let (total_amount, transaction_count) = stats[&name];
            VendorRanking {
                name,
                total_amount,
                transaction_count,
            }
        })
        .collect();
    rankings.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    rankings.truncate(limit);
    rankings
}

// ---------------------------------------------------------------------------
// Vendor transactions
// ---------------------------------------------------------------------------

pub struct VendorTransaction {
    pub expense: Expense,
    pub running_total: f64,
}

pub struct VendorTransactions {
    /// Newest first; running totals accumulate oldest first.
    pub rows: Vec<VendorTransaction>,
    pub total: f64,
}

/// Input: one vendor's expenses within a window, in date-ascending order.
pub fn vendor_transactions(expenses: Vec<Expense>) -> VendorTransactions {
    let total = expenses.iter().map(|e| e.amount).sum();
    let mut running = 0.0;
    let mut rows: Vec<VendorTransaction> = expenses
        .into_iter()
        .map(|expense| {
            running += expense.amount;
            VendorTransaction {
                expense,
                running_total: running,
            }
        })
        .collect();
    rows.reverse();
    VendorTransactions { rows, total }
}

// ---------------------------------------------------------------------------
// Category trends
// ---------------------------------------------------------------------------

pub struct CategoryTrend {
    pub category: String,
    /// (YYYY-MM, summed amount), months ascending. Sparse: months with no
    /// expenses are not synthesized.
    pub months: Vec<(String, f64)>,
}

/// One trend per category, categories ordered by name. Categories with no
/// expenses in the window still appear, with no month buckets.
pub fn category_trends(categories: &[Category], expenses: &[Expense]) -> Vec<CategoryTrend> {
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .into_iter()
        .map(|cat| {
            let own: Vec<Expense> = expenses
                .iter()
                .filter(|e| e.category_id == Some(cat.id))
                .cloned()
                .collect();
            CategoryTrend {
                category: cat.name.clone(),
                months: month_sums(&own),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category summary
// ---------------------------------------------------------------------------

pub struct CategoryStat {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub pending: f64,
    pub approved: f64,
}

pub fn category_summary(categories: &[Category], expenses: &[Expense]) -> Vec<CategoryStat> {
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .into_iter()
        .map(|cat| {
            let own: Vec<&Expense> = expenses
                .iter()
                .filter(|e| e.category_id == Some(cat.id))
                .collect();
            let total: f64 = own.iter().map(|e| e.amount).sum();
            let count = own.len();
            let average = if count > 0 { total / count as f64 } else { 0.0 };
            let pending = own
                .iter()
                .filter(|e| e.status == ExpenseStatus::Pending)
                .map(|e| e.amount)
                .sum();
            let approved = own
                .iter()
                .filter(|e| e.status == ExpenseStatus::Approved)
                .map(|e| e.amount)
                .sum();
            CategoryStat {
                category: cat.name.clone(),
                total,
                count,
                average,
                pending,
                approved,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unprocessed receipts
// ---------------------------------------------------------------------------

pub struct UnprocessedReceipts {
    pub receipts: Vec<Receipt>,
    pub total_amount: f64,
}

/// Receipts with no derived expense. Normally empty once derivation is
/// mandatory; meaningful when expenses have been deleted manually.
pub fn unprocessed_receipts(receipts: Vec<Receipt>) -> UnprocessedReceipts {
    let mut unprocessed: Vec<Receipt> = receipts
        .into_iter()
        .filter(|r| r.expense_count == 0)
        .collect();
    unprocessed.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    let total_amount = unprocessed.iter().map(|r| r.amount).sum();
    UnprocessedReceipts {
        receipts: unprocessed,
        total_amount,
    }
}

// ---------------------------------------------------------------------------
// Receipts by date
// ---------------------------------------------------------------------------

pub struct ReceiptsByDate {
    pub receipts: Vec<Receipt>,
    pub total: f64,
    pub processed: usize,
    pub unprocessed: usize,
}

pub fn receipts_by_date(mut receipts: Vec<Receipt>) -> ReceiptsByDate {
    receipts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    let total = receipts.iter().map(|r| r.amount).sum();
    let processed = receipts.iter().filter(|r| r.expense_count > 0).count();
    let unprocessed = receipts.len() - processed;
    ReceiptsByDate {
        receipts,
        total,
        processed,
        unprocessed,
    }
}

// ---------------------------------------------------------------------------
// Monthly trends
// ---------------------------------------------------------------------------

pub struct MonthlyTrends {
    /// (YYYY-MM, summed amount), ascending.
    pub totals: Vec<(String, f64)>,
    /// (YYYY-MM, expense count), ascending.
    pub counts: Vec<(String, usize)>,
}

pub fn monthly_trends(expenses: &[Expense]) -> MonthlyTrends {
    let totals = month_sums(expenses);
    let mut count_map: HashMap<String, usize> = HashMap::new();
    for e in expenses {
        *count_map.entry(e.month_key().to_string()).or_insert(0) += 1;
    }
    let counts = totals
        .iter()
        .map(|(month, _)| (month.clone(), count_map[month]))
        .collect();
    MonthlyTrends { totals, counts }
}

// ---------------------------------------------------------------------------
// Year comparison
// ---------------------------------------------------------------------------

pub struct YearComparison {
    pub current_year: i32,
    pub previous_year: i32,
    pub current_months: Vec<(String, f64)>,
    pub previous_months: Vec<(String, f64)>,
    pub current_total: f64,
    pub previous_total: f64,
    /// Percent change from previous year, rounded to 2 decimal places.
    /// Clamped to 0 when the previous year has no expenses, so a first
    /// year of data reads as "no change" rather than dividing by zero.
    pub change_percentage: f64,
}

pub fn year_comparison(
    current: &[Expense],
    previous: &[Expense],
    current_year: i32,
) -> YearComparison {
    let current_months = month_sums(current);
    let previous_months = month_sums(previous);
    let current_total: f64 = current.iter().map(|e| e.amount).sum();
    let previous_total: f64 = previous.iter().map(|e| e.amount).sum();
    let change_percentage = if previous_total > 0.0 {
        let raw = (current_total - previous_total) / previous_total * 100.0;
        (raw * 100.0).round() / 100.0
    } else {
        0.0
    };
    YearComparison {
        current_year,
        previous_year: current_year - 1,
        current_months,
        previous_months,
        current_total,
        previous_total,
        change_percentage,
    }
}

// ---------------------------------------------------------------------------
// Expense summary
// ---------------------------------------------------------------------------

pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub pending: f64,
    pub approved: f64,
    pub rejected: f64,
    pub top_categories: Vec<(String, f64)>,
    pub top_vendors: Vec<(String, f64)>,
}

pub fn expense_summary(expenses: &[Expense]) -> ExpenseSummary {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };
    let highest = expenses.iter().map(|e| e.amount).fold(0.0, f64::max);
    let lowest = if count > 0 {
        expenses.iter().map(|e| e.amount).fold(f64::INFINITY, f64::min)
    } else {
        0.0
    };
    let status = expenses_by_status(expenses);

    let mut top_categories = expenses_by_category(expenses).groups;
    sort_by_total_desc(&mut top_categories);
    top_categories.truncate(5);

    let mut top_vendors = expenses_by_vendor(expenses).groups;
    top_vendors.truncate(5);

    ExpenseSummary {
        total,
        count,
        average,
        highest,
        lowest,
        pending: status.pending.total,
        approved: status.approved.total,
        rejected: status.rejected.total,
        top_categories,
        top_vendors,
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    pub total_expenses: f64,
    pub monthly_total: f64,
    pub pending_count: usize,
    pub category_count: usize,
}

pub fn dashboard(
    all_expenses: &[Expense],
    month_expenses: &[Expense],
    category_count: usize,
) -> Dashboard {
    Dashboard {
        total_expenses: all_expenses.iter().map(|e| e.amount).sum(),
        monthly_total: month_expenses.iter().map(|e| e.amount).sum(),
        pending_count: all_expenses
            .iter()
            .filter(|e| e.status == ExpenseStatus::Pending)
            .count(),
        category_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(
        id: i64,
        amount: f64,
        date: &str,
        status: ExpenseStatus,
        category: Option<(i64, &str)>,
        vendor: Option<&str>,
    ) -> Expense {
        Expense {
            id,
            amount,
            date: date.to_string(),
            description: None,
            status,
            category_id: category.map(|(cid, _)| cid),
            category_name: category.map(|(_, name)| name.to_string()),
            vendor_id: None,
            vendor_name: vendor.map(|v| v.to_string()),
            receipt_id: None,
        }
    }

    fn receipt(id: i64, amount: f64, date: &str, expense_count: i64) -> Receipt {
        Receipt {
            id,
            merchant: format!("Merchant {id}"),
            amount,
            date: date.to_string(),
            notes: None,
            vendor_id: 1,
            vendor_name: "Vendor".to_string(),
            expense_count,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_date_range_orders_desc_and_averages() {
        let report = expenses_by_date(vec![
            expense(1, 100.0, "2025-01-05", ExpenseStatus::Pending, None, None),
            expense(2, 50.0, "2025-01-20", ExpenseStatus::Pending, None, None),
        ]);
        assert_eq!(report.total, 150.0);
        assert_eq!(report.count, 2);
        assert_eq!(report.average, 75.0);
        assert_eq!(report.expenses[0].date, "2025-01-20");
    }

    #[test]
    fn test_date_range_empty_has_zero_average() {
        let report = expenses_by_date(vec![]);
        assert_eq!(report.total, 0.0);
        assert_eq!(report.count, 0);
        assert_eq!(report.average, 0.0);
    }

    #[test]
    fn test_by_category_skips_uncategorized_rows() {
        let expenses = vec![
            expense(1, 10.0, "2025-01-01", ExpenseStatus::Pending, Some((1, "Food")), None),
            expense(2, 20.0, "2025-01-02", ExpenseStatus::Pending, Some((1, "Food")), None),
            expense(3, 5.0, "2025-01-03", ExpenseStatus::Pending, None, None),
        ];
        let breakdown = expenses_by_category(&expenses);
        assert_eq!(breakdown.groups, vec![("Food".to_string(), 30.0)]);
        assert_eq!(breakdown.total, 30.0);
    }

    #[test]
    fn test_by_vendor_sorted_desc_with_stable_ties() {
        let expenses = vec![
            expense(1, 300.0, "2025-01-01", ExpenseStatus::Pending, None, Some("A")),
            expense(2, 300.0, "2025-01-02", ExpenseStatus::Pending, None, Some("B")),
            expense(3, 200.0, "2025-01-03", ExpenseStatus::Pending, None, Some("C")),
            expense(4, 350.0, "2025-01-04", ExpenseStatus::Pending, None, Some("D")),
        ];
        let breakdown = expenses_by_vendor(&expenses);
        let names: Vec<&str> = breakdown.groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["D", "A", "B", "C"]);
        assert_eq!(breakdown.total, 1150.0);
    }

    #[test]
    fn test_status_buckets_sum_to_window_totals() {
        let expenses = vec![
            expense(1, 10.0, "2025-01-01", ExpenseStatus::Pending, None, None),
            expense(2, 20.0, "2025-01-02", ExpenseStatus::Approved, None, None),
            expense(3, 30.0, "2025-01-03", ExpenseStatus::Approved, None, None),
            expense(4, 40.0, "2025-01-04", ExpenseStatus::Rejected, None, None),
        ];
        let breakdown = expenses_by_status(&expenses);
        assert_eq!(breakdown.pending, StatusBucket { total: 10.0, count: 1 });
        assert_eq!(breakdown.approved, StatusBucket { total: 50.0, count: 2 });
        assert_eq!(breakdown.rejected, StatusBucket { total: 40.0, count: 1 });
        assert_eq!(
            breakdown.total,
            breakdown.pending.total + breakdown.approved.total + breakdown.rejected.total
        );
        assert_eq!(breakdown.count, 4);
    }

    #[test]
    fn test_status_all_buckets_present_when_empty() {
        let breakdown = expenses_by_status(&[]);
        assert_eq!(breakdown.pending, StatusBucket::default());
        assert_eq!(breakdown.approved, StatusBucket::default());
        assert_eq!(breakdown.rejected, StatusBucket::default());
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_top_vendors_limit_with_stable_tie_break() {
        let expenses = vec![
            expense(1, 300.0, "2025-01-01", ExpenseStatus::Pending, None, Some("A")),
            expense(2, 300.0, "2025-01-02", ExpenseStatus::Pending, None, Some("B")),
            expense(3, 200.0, "2025-01-03", ExpenseStatus::Pending, None, Some("C")),
        ];
        let top = top_vendors(&expenses, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "B");
        assert_eq!(top[0].total_amount, 300.0);
    }

    #[test]
    fn test_top_vendors_counts_transactions() {
        let expenses = vec![
            expense(1, 100.0, "2025-01-01", ExpenseStatus::Pending, None, Some("A")),
            expense(2, 50.0, "2025-01-02", ExpenseStatus::Pending, None, Some("A")),
            expense(3, 200.0, "2025-01-03", ExpenseStatus::Pending, None, Some("B")),
        ];
        let top = top_vendors(&expenses, DEFAULT_TOP_VENDORS);
        assert_eq!(top[0].name, "B");
        assert_eq!(top[1].transaction_count, 2);
        assert_eq!(top[1].total_amount, 150.0);
    }

    #[test]
    fn test_vendor_transactions_running_total() {
        let report = vendor_transactions(vec![
            expense(1, 10.0, "2025-01-01", ExpenseStatus::Pending, None, Some("A")),
            expense(2, 20.0, "2025-01-15", ExpenseStatus::Pending, None, Some("A")),
            expense(3, 30.0, "2025-02-01", ExpenseStatus::Pending, None, Some("A")),
        ]);
        assert_eq!(report.total, 60.0);
        // Newest first, running total accumulated oldest first.
        assert_eq!(report.rows[0].expense.date, "2025-02-01");
        assert_eq!(report.rows[0].running_total, 60.0);
        assert_eq!(report.rows[2].expense.date, "2025-01-01");
        assert_eq!(report.rows[2].running_total, 10.0);
    }

    #[test]
    fn test_category_trends_sparse_ascending_months() {
        let categories = vec![category(1, "Food"), category(2, "Transport")];
        let expenses = vec![
            expense(1, 10.0, "2025-03-10", ExpenseStatus::Pending, Some((1, "Food")), None),
            expense(2, 20.0, "2025-01-05", ExpenseStatus::Pending, Some((1, "Food")), None),
            expense(3, 5.0, "2025-01-20", ExpenseStatus::Pending, Some((1, "Food")), None),
        ];
        let trends = category_trends(&categories, &expenses);
        assert_eq!(trends.len(), 2);
        let food = &trends[0];
        assert_eq!(food.category, "Food");
        // February has no expenses and is not synthesized.
        assert_eq!(
            food.months,
            vec![("2025-01".to_string(), 25.0), ("2025-03".to_string(), 10.0)]
        );
        let transport = &trends[1];
        assert!(transport.months.is_empty());
    }

    #[test]
    fn test_category_summary_stats() {
        let categories = vec![category(1, "Food"), category(2, "Transport")];
        let expenses = vec![
            expense(1, 10.0, "2025-01-01", ExpenseStatus::Pending, Some((1, "Food")), None),
            expense(2, 30.0, "2025-01-02", ExpenseStatus::Approved, Some((1, "Food")), None),
        ];
        let stats = category_summary(&categories, &expenses);
        let food = &stats[0];
        assert_eq!(food.total, 40.0);
        assert_eq!(food.count, 2);
        assert_eq!(food.average, 20.0);
        assert_eq!(food.pending, 10.0);
        assert_eq!(food.approved, 30.0);
        let transport = &stats[1];
        assert_eq!(transport.count, 0);
        assert_eq!(transport.average, 0.0);
    }

    #[test]
    fn test_unprocessed_receipts() {
        let report = unprocessed_receipts(vec![
            receipt(1, 10.0, "2025-01-01", 1),
            receipt(2, 20.0, "2025-01-02", 0),
            receipt(3, 30.0, "2025-01-03", 0),
        ]);
        assert_eq!(report.receipts.len(), 2);
        assert_eq!(report.total_amount, 50.0);
        assert_eq!(report.receipts[0].id, 3);
    }

    #[test]
    fn test_receipts_by_date_processed_counts() {
        let report = receipts_by_date(vec![
            receipt(1, 10.0, "2025-01-01", 1),
            receipt(2, 20.0, "2025-01-02", 0),
            receipt(3, 30.0, "2025-01-03", 2),
        ]);
        assert_eq!(report.total, 60.0);
        assert_eq!(report.processed, 2);
        assert_eq!(report.unprocessed, 1);
        assert_eq!(report.receipts[0].date, "2025-01-03");
    }

    #[test]
    fn test_monthly_trends_parallel_maps() {
        let expenses = vec![
            expense(1, 10.0, "2025-02-01", ExpenseStatus::Pending, None, None),
            expense(2, 20.0, "2025-01-15", ExpenseStatus::Pending, None, None),
            expense(3, 30.0, "2025-02-20", ExpenseStatus::Pending, None, None),
        ];
        let trends = monthly_trends(&expenses);
        assert_eq!(
            trends.totals,
            vec![("2025-01".to_string(), 20.0), ("2025-02".to_string(), 40.0)]
        );
        assert_eq!(
            trends.counts,
            vec![("2025-01".to_string(), 1), ("2025-02".to_string(), 2)]
        );
    }

    #[test]
    fn test_year_comparison_change_percentage() {
        let current = vec![
            expense(1, 150.0, "2025-01-10", ExpenseStatus::Pending, None, None),
        ];
        let previous = vec![
            expense(2, 100.0, "2024-03-10", ExpenseStatus::Pending, None, None),
        ];
        let cmp = year_comparison(&current, &previous, 2025);
        assert_eq!(cmp.previous_year, 2024);
        assert_eq!(cmp.current_total, 150.0);
        assert_eq!(cmp.previous_total, 100.0);
        assert_eq!(cmp.change_percentage, 50.0);
    }

    #[test]
    fn test_year_comparison_clamps_when_no_prior_data() {
        let current = vec![
            expense(1, 100.0, "2025-01-10", ExpenseStatus::Pending, None, None),
            expense(2, 50.0, "2025-02-10", ExpenseStatus::Pending, None, None),
        ];
        let cmp = year_comparison(&current, &[], 2025);
        assert_eq!(cmp.previous_total, 0.0);
        assert_eq!(cmp.change_percentage, 0.0);
    }

    #[test]
    fn test_year_comparison_rounds_to_two_places() {
        let current = vec![expense(1, 100.0, "2025-01-10", ExpenseStatus::Pending, None, None)];
        let previous = vec![expense(2, 300.0, "2024-01-10", ExpenseStatus::Pending, None, None)];
        let cmp = year_comparison(&current, &previous, 2025);
        assert_eq!(cmp.change_percentage, -66.67);
    }

    #[test]
    fn test_expense_summary_fields() {
        let expenses = vec![
            expense(1, 100.0, "2025-01-01", ExpenseStatus::Pending, Some((1, "Food")), Some("A")),
            expense(2, 50.0, "2025-01-02", ExpenseStatus::Approved, Some((2, "Tech")), Some("B")),
            expense(3, 10.0, "2025-01-03", ExpenseStatus::Rejected, Some((1, "Food")), Some("A")),
        ];
        let summary = expense_summary(&expenses);
        assert_eq!(summary.total, 160.0);
        assert_eq!(summary.count, 3);
        assert!((summary.average - 53.333333).abs() < 0.0001);
        assert_eq!(summary.highest, 100.0);
        assert_eq!(summary.lowest, 10.0);
        assert_eq!(summary.pending, 100.0);
        assert_eq!(summary.approved, 50.0);
        assert_eq!(summary.rejected, 10.0);
        assert_eq!(summary.top_categories[0], ("Food".to_string(), 110.0));
        assert_eq!(summary.top_vendors[0], ("A".to_string(), 110.0));
    }

    #[test]
    fn test_expense_summary_empty_is_all_zeroes() {
        let summary = expense_summary(&[]);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.highest, 0.0);
        assert_eq!(summary.lowest, 0.0);
        assert!(summary.top_categories.is_empty());
        assert!(summary.top_vendors.is_empty());
    }

    #[test]
    fn test_expense_summary_top_lists_capped_at_five() {
        let names: Vec<String> = (0..7).map(|i| format!("V{i}")).collect();
        let expenses: Vec<Expense> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                expense(
                    i as i64,
                    100.0 - i as f64,
                    "2025-01-01",
                    ExpenseStatus::Pending,
                    None,
                    Some(name.as_str()),
                )
            })
            .collect();
        let summary = expense_summary(&expenses);
        assert_eq!(summary.top_vendors.len(), 5);
        assert_eq!(summary.top_vendors[0].0, "V0");
    }

    #[test]
    fn test_dashboard() {
        let all = vec![
            expense(1, 100.0, "2025-01-01", ExpenseStatus::Pending, None, None),
            expense(2, 50.0, "2025-02-01", ExpenseStatus::Approved, None, None),
        ];
        let month = vec![all[1].clone()];
        let d = dashboard(&all, &month, 3);
        assert_eq!(d.total_expenses, 150.0);
        assert_eq!(d.monthly_total, 50.0);
        assert_eq!(d.pending_count, 1);
        assert_eq!(d.category_count, 3);
    }
}
