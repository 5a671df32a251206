mod db;
mod errors;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;

    // Captured once; every date default and "current month" view downstream
    // works from this value.
    let today = chrono::Local::now().date_naive();

    match args.len() {
        1 => run::as_tui(&mut db, today),
        _ => run::as_cli(&args, &mut db, today),
    }
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ledgertui", "LedgerTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("ledgertui.db"))
}
