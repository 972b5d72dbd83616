use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{db_path, load_settings};
use crate::store;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = db_path();

    println!(
        "Active user: {}",
        if settings.active_user.is_empty() { "(not set)" } else { &settings.active_user }
    );
    println!("Data dir:    {}", settings.data_dir);
    println!("Database:    {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:     {}", format_bytes(size));

        let conn = get_connection(&db_path)?;

        let users: i64 = conn.query_row("SELECT count(*) FROM users", [], |r| r.get(0))?;
        println!();
        println!("Users:       {users}");

        if !settings.active_user.is_empty() {
            let user_id = store::lookup_user(&conn, &settings.active_user)?;
            let categories: i64 = conn.query_row(
                "SELECT count(*) FROM categories WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?;
            let vendors: i64 = conn.query_row(
                "SELECT count(*) FROM vendors WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?;
            let rules: i64 = conn.query_row(
                "SELECT count(*) FROM rules WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?;
            let receipts: i64 = conn.query_row(
                "SELECT count(*) FROM receipts WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?;
            let expenses: i64 = conn.query_row(
                "SELECT count(*) FROM expenses WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )?;
            let pending: i64 = conn.query_row(
                "SELECT count(*) FROM expenses WHERE user_id = ?1 AND status = 'pending'",
                [user_id],
                |r| r.get(0),
            )?;

            println!("Categories:  {categories}");
            println!("Vendors:     {vendors}");
            println!("Rules:       {rules}");
            println!("Receipts:    {receipts}");
            println!("Expenses:    {expenses}");
            println!("Pending:     {pending}");
        }
    } else {
        println!();
        println!("Database not found. Run `tally init` to set up.");
    }

    Ok(())
}
