use crate::cli::{active_context, month_window, resolve_window, trailing_months_window, year_window};
use crate::error::Result;
use crate::reports;
use crate::store;

pub fn by_category(
    from_date: Option<String>,
    to_date: Option<String>,
    output: &str,
) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let breakdown = reports::expenses_by_category(&expenses);

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(["category", "amount"])?;
    for (name, total) in &breakdown.groups {
        writer.write_record([name.to_string(), format!("{total:.2}")])?;
    }
    writer.write_record(["total".to_string(), format!("{:.2}", breakdown.total)])?;
    writer.flush()?;
    println!("Exported category breakdown to {output}");
    Ok(())
}

pub fn by_vendor(from_date: Option<String>, to_date: Option<String>, output: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), month_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let breakdown = reports::expenses_by_vendor(&expenses);

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(["vendor", "amount"])?;
    for (name, total) in &breakdown.groups {
        writer.write_record([name.to_string(), format!("{total:.2}")])?;
    }
    writer.write_record(["total".to_string(), format!("{:.2}", breakdown.total)])?;
    writer.flush()?;
    println!("Exported vendor breakdown to {output}");
    Ok(())
}

pub fn monthly_trends(months: u32, output: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = trailing_months_window(months);
    let expenses = store::expenses_in_window(&conn, user_id, &start.to_string(), &end.to_string())?;
    let trends = reports::monthly_trends(&expenses);

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(["month", "amount", "count"])?;
    for ((month, total), (_, count)) in trends.totals.iter().zip(trends.counts.iter()) {
        writer.write_record([month.to_string(), format!("{total:.2}"), count.to_string()])?;
    }
    writer.flush()?;
    println!("Exported monthly trends to {output}");
    Ok(())
}

pub fn summary(from_date: Option<String>, to_date: Option<String>, output: &str) -> Result<()> {
    let (conn, user_id) = active_context()?;
    let (start, end) = resolve_window(from_date.as_deref(), to_date.as_deref(), year_window())?;
    let expenses = store::expenses_in_window(&conn, user_id, &start, &end)?;
    let summary = reports::expense_summary(&expenses);

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(["metric", "value"])?;
    writer.write_record(["total".to_string(), format!("{:.2}", summary.total)])?;
    writer.write_record(["count".to_string(), summary.count.to_string()])?;
    let metrics = [
        ("average", summary.average),
        ("highest", summary.highest),
        ("lowest", summary.lowest),
        ("pending", summary.pending),
        ("approved", summary.approved),
        ("rejected", summary.rejected),
    ];
    for (metric, value) in metrics {
        writer.write_record([metric.to_string(), format!("{value:.2}")])?;
    }
    for (name, total) in &summary.top_categories {
        writer.write_record([format!("top_category:{name}"), format!("{total:.2}")])?;
    }
    for (name, total) in &summary.top_vendors {
        writer.write_record([format!("top_vendor:{name}"), format!("{total:.2}")])?;
    }
    writer.flush()?;
    println!("Exported expense summary to {output}");
    Ok(())
}
