use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::settings::{db_path, load_settings, save_settings};
use crate::store;

pub fn add(username: &str, email: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    store::create_user(&conn, username, email)?;
    println!("Added user: {username} <{email}>");
    Ok(())
}

pub fn list() -> Result<()> {
    let settings = load_settings();
    let conn = get_connection(&db_path())?;
    let users = store::list_users(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Username", "Email", "Active"]);
    for u in users {
        let active = if u.username == settings.active_user { "*" } else { "" };
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(u.username),
            Cell::new(u.email),
            Cell::new(active),
        ]);
    }
    println!("Users\n{table}");
    Ok(())
}

pub fn switch(username: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    store::lookup_user(&conn, username)?;
    let mut settings = load_settings();
    settings.active_user = username.to_string();
    save_settings(&settings)?;
    println!("Active user: {username}");
    Ok(())
}

pub fn delete(username: &str) -> Result<()> {
    let settings = load_settings();
    if settings.active_user == username {
        return Err(TallyError::Other(format!(
            "cannot delete the active user '{username}'; switch to another user first"
        )));
    }
    let conn = get_connection(&db_path())?;
    let user_id = store::lookup_user(&conn, username)?;
    conn.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
    println!("Deleted user {username} and all data it owned");
    Ok(())
}
