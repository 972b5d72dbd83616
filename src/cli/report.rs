use chrono::{Datelike, Local, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{active_context, month_window, resolve_window, trailing_months_window, year_window};
use crate::error::Result;
use crate::fmt::money;
use crate::reports;
use crate::store;

pub fn dashboard() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let all = store::expenses_filtered(&conn, user_id, None, None, None)?;
    let (start, end) = month_window();
    let month = store::expenses_in_window(&conn, user_id, &start.to_string(), &end.to_string())?;
    let categories = store::list_categories(&conn, user_id)?;

    let d = reports::dashboard(&all, &month, categories.len());
    println!("Total expenses:   {}", money(d.total_expenses));
    println!("This month:       {}", money(d.monthly_total));
    println!("Pending:          {}", d.pending_count);
    println!("Categories:       {}", d.category_count);
    Ok(())
}

pub fn by_date(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let report = reports::expenses_by_date(expenses);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Status", "Category", "Vendor"]);
    for e in &report.expenses {
        table.add_row(vec![
            Cell::new(&e.date),
            Cell::new(e.description.as_deref().unwrap_or("")),
            Cell::new(money(e.amount)),
            Cell::new(e.status.as_str()),
            Cell::new(e.category_name.as_deref().unwrap_or("\u{2014}")),
            Cell::new(e.vendor_name.as_deref().unwrap_or("")),
        ]);
    }
    println!("Expenses {start} \u{2192} {end}\n{table}");
    println!(
        "\nTotal: {}   Count: {}   Average: {}",
        money(report.total),
        report.count,
        money(report.average)
    );
    Ok(())
}

pub fn by_category(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let breakdown = reports::expenses_by_category(&expenses);

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount"]);
    for (name, total) in &breakdown.groups {
        table.add_row(vec![Cell::new(name), Cell::new(money(*total))]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(breakdown.total)),
    ]);
    println!("Expenses by Category {start} \u{2192} {end}\n{table}");
    Ok(())
}

pub fn by_vendor(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let breakdown = reports::expenses_by_vendor(&expenses);

    let mut table = Table::new();
    table.set_header(vec!["Vendor", "Amount"]);
    for (name, total) in &breakdown.groups {
        table.add_row(vec![Cell::new(name), Cell::new(money(*total))]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(breakdown.total)),
    ]);
    println!("Expenses by Vendor {start} \u{2192} {end}\n{table}");
    Ok(())
}

pub fn by_status(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let breakdown = reports::expenses_by_status(&expenses);

    let mut table = Table::new();
    table.set_header(vec!["Status", "Amount", "Count"]);
    for (label, bucket) in [
        ("pending".yellow().to_string(), &breakdown.pending),
        ("approved".green().to_string(), &breakdown.approved),
        ("rejected".red().to_string(), &breakdown.rejected),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(bucket.total)),
            Cell::new(bucket.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(breakdown.total)),
        Cell::new(breakdown.count),
    ]);
    println!("Expenses by Status {start} \u{2192} {end}\n{table}");
    Ok(())
}

pub fn top_vendors(
    limit: usize,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), year_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let rankings = reports::top_vendors(&expenses, limit);

    if rankings.is_empty() {
        println!("No vendor expenses found.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Vendor", "Total", "Transactions"]);
    for (i, v) in rankings.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&v.name),
            Cell::new(money(v.total_amount)),
            Cell::new(v.transaction_count),
        ]);
    }
    println!("Top Vendors {start} \u{2192} {end}\n{table}");
    Ok(())
}

pub fn vendor_transactions(
    vendor: &str,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let vendor_id = store::lookup_vendor(&conn, user_id, vendor)?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), year_window())?;
    let expenses = store::expenses_for_vendor(&conn, user_id, vendor_id, &start, &end)?;
    let report = reports::vendor_transactions(expenses);

    if report.rows.is_empty() {
        println!("No transactions for {vendor} in {start} \u{2192} {end}.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Status", "Running"]);
    for row in &report.rows {
        table.add_row(vec![
            Cell::new(&row.expense.date),
            Cell::new(row.expense.description.as_deref().unwrap_or("")),
            Cell::new(money(row.expense.amount)),
            Cell::new(row.expense.status.as_str()),
            Cell::new(money(row.running_total)),
        ]);
    }
    println!(
        "{vendor} {start} \u{2192} {end} (total: {})\n{table}",
        money(report.total)
    );
    Ok(())
}

pub fn category_trends(months: u32) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = trailing_months_window(months);
    let expenses = store::expenses_in_window(&conn, user_id, &start.to_string(), &end.to_string())?;
    let categories = store::list_categories(&conn, user_id)?;
    let trends = reports::category_trends(&categories, &expenses);

    println!("Category Trends {start} \u{2192} {end}");
    for trend in &trends {
        println!("\n{}", trend.category.bold());
        if trend.months.is_empty() {
            println!("  (no expenses)");
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec!["Month", "Amount"]);
        for (month, total) in &trend.months {
            table.add_row(vec![Cell::new(month), Cell::new(money(*total))]);
        }
        println!("{table}");
    }
    Ok(())
}

pub fn category_summary(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let categories = store::list_categories(&conn, user_id)?;
    let stats = reports::category_summary(&categories, &expenses);

    let mut table = Table::new();
    table.set_header(vec!["Category", "Total", "Count", "Average", "Pending", "Approved"]);
    for s in &stats {
        table.add_row(vec![
            Cell::new(&s.category),
            Cell::new(money(s.total)),
            Cell::new(s.count),
            Cell::new(money(s.average)),
            Cell::new(money(s.pending)),
            Cell::new(money(s.approved)),
        ]);
    }
    println!("Category Summary {start} \u{2192} {end}\n{table}");
    Ok(())
}

pub fn unprocessed_receipts() -> Result<()> {
    let (conn, user_id) = active_context()?;
    let receipts = store::all_receipts(&conn, user_id)?;
    let report = reports::unprocessed_receipts(receipts);

    if report.receipts.is_empty() {
        println!("No unprocessed receipts.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Merchant", "Amount", "Vendor"]);
    for r in &report.receipts {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.date),
            Cell::new(&r.merchant),
            Cell::new(money(r.amount)),
            Cell::new(&r.vendor_name),
        ]);
    }
    println!(
        "Unprocessed Receipts ({}, total: {})\n{table}",
        report.receipts.len(),
        money(report.total_amount)
    );
    Ok(())
}

pub fn receipts_by_date(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let receipts = store::receipts_in_window(&conn, user_id, &start, &end)?;
    let report = reports::receipts_by_date(receipts);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Merchant", "Amount", "Vendor", "Processed"]);
    for r in &report.receipts {
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
    println!("Receipts {start} \u{2192} {end}\n{table}");
    println!(
        "\nTotal: {}   Processed: {}   Unprocessed: {}",
        money(report.total),
        report.processed,
        report.unprocessed
    );
    Ok(())
}

pub fn monthly_trends(months: u32) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = trailing_months_window(months);
    let expenses = store::expenses_in_window(&conn, user_id, &start.to_string(), &end.to_string())?;
    let trends = reports::monthly_trends(&expenses);

    let mut table = Table::new();
    table.set_header(vec!["Month", "Amount", "Count"]);
    for ((month, total), (_, count)) in trends.totals.iter().zip(trends.counts.iter()) {
        table.add_row(vec![
            Cell::new(month),
            Cell::new(money(*total)),
            Cell::new(*count),
        ]);
    }
    println!("Monthly Trends {start} \u{2192} {end}\n{table}");
    Ok(())
}

fn year_expenses(
    conn: &rusqlite::Connection,
    user_id: i64,
    year: i32,
) -> Result<Vec<crate::models::Expense>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date");
    store::expenses_in_window(conn, user_id, &start.to_string(), &end.to_string())
}

pub fn year_comparison(year: Option<i32>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let current_year = year.unwrap_or_else(|| Local::now().year());
    let current = year_expenses(&conn, user_id, current_year)?;
    let previous = year_expenses(&conn, user_id, current_year - 1)?;
    let cmp = reports::year_comparison(&current, &previous, current_year);

    let mut table = Table::new();
    table.set_header(vec![
        "Month".to_string(),
        current_year.to_string(),
        (current_year - 1).to_string(),
    ]);
    for month in 1..=12u32 {
        let key_current = format!("{current_year:04}-{month:02}");
        let key_previous = format!("{:04}-{month:02}", current_year - 1);
        let cur = cmp
            .current_months
            .iter()
            .find(|(m, _)| *m == key_current)
            .map(|(_, t)| *t);
        let prev = cmp
            .previous_months
            .iter()
            .find(|(m, _)| *m == key_previous)
            .map(|(_, t)| *t);
        if cur.is_none() && prev.is_none() {
            continue;
        }
        table.add_row(vec![
            Cell::new(format!("{month:02}")),
            Cell::new(money(cur.unwrap_or(0.0))),
            Cell::new(money(prev.unwrap_or(0.0))),
        ]);
    }
    println!("Year Comparison {current_year} vs {}\n{table}", cmp.previous_year);
    let change = if cmp.change_percentage >= 0.0 {
        format!("+{:.2}%", cmp.change_percentage).red().to_string()
    } else {
        format!("{:.2}%", cmp.change_percentage).green().to_string()
    };
    println!(
        "\n{current_year}: {}   {}: {}   Change: {change}",
        money(cmp.current_total),
        cmp.previous_year,
        money(cmp.previous_total)
    );
    Ok(())
}

pub fn summary(from_date: Option<String>, to_date: Option<String>) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), year_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let summary = reports::expense_summary(&expenses);

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total"), Cell::new(money(summary.total))]);
    table.add_row(vec![Cell::new("Count"), Cell::new(summary.count)]);
    table.add_row(vec![Cell::new("Average"), Cell::new(money(summary.average))]);
    table.add_row(vec![Cell::new("Highest"), Cell::new(money(summary.highest))]);
    table.add_row(vec![Cell::new("Lowest"), Cell::new(money(summary.lowest))]);
    table.add_row(vec![
        Cell::new("Pending".yellow()),
        Cell::new(money(summary.pending)),
    ]);
    table.add_row(vec![
        Cell::new("Approved".green()),
        Cell::new(money(summary.approved)),
    ]);
    table.add_row(vec![
        Cell::new("Rejected".red()),
        Cell::new(money(summary.rejected)),
    ]);
    println!("Expense Summary {start} \u{2192} {end}\n{table}");

    if !summary.top_categories.is_empty() {
        let mut cats = Table::new();
        cats.set_header(vec!["Category", "Amount"]);
        for (name, total) in &summary.top_categories {
            cats.add_row(vec![Cell::new(name), Cell::new(money(*total))]);
        }
        println!("\nTop Categories\n{cats}");
    }
    if !summary.top_vendors.is_empty() {
        let mut vendors = Table::new();
        vendors.set_header(vec!["Vendor", "Amount"]);
        for (name, total) in &summary.top_vendors {
            vendors.add_row(vec![Cell::new(name), Cell::new(money(*total))]);
        }
        println!("\nTop Vendors\n{vendors}");
    }

    let status = reports::expenses_by_status(&expenses);
    if status.pending.count > 0 {
        eprintln!(
            "{}",
            format!(
                "Note: {} pending expenses totaling {} await review",
                status.pending.count,
                money(status.pending.total)
            )
            .yellow()
        );
    }
    Ok(())
}
