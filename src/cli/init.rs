use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::store;

pub fn run(data_dir: Option<String>, username: &str, email: &str) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("exports"))?;

    let conn = get_connection(&resolved.join("tally.db"))?;
    init_db(&conn)?;

    if store::lookup_user(&conn, username).is_err() {
        store::create_user(&conn, username, email)?;
        println!("Created user: {username} <{email}>");
    }
    settings.active_user = username.to_string();
    save_settings(&settings)?;

    println!("Initialized tally at {} (active user: {username})", resolved.display());
    Ok(())
}
