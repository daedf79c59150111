//! CLI status check.
//!
//! # Responsibility
//! - Verify `planbook_core` linkage, configuration and database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use planbook_core::db::migrations::current_version;
use planbook_core::db::{open_db, open_db_in_memory};
use planbook_core::{core_version, init_logging, ping, CoreConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("planbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    let config = CoreConfig::from_env()?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    let (mode, conn) = match config.db_path.as_deref() {
        Some(path) => ("file", open_db(path)?),
        None => ("memory", open_db_in_memory()?),
    };
    log::info!("event=cli_status module=cli status=ok mode={mode}");

    println!("planbook_core ping={}", ping());
    println!("planbook_core version={}", core_version());
    println!("planbook_core db_mode={mode}");
    println!("planbook_core schema_version={}", current_version(&conn)?);
    println!(
        "planbook_core today={}",
        chrono::Local::now().date_naive().format("%Y-%m-%d")
    );
    Ok(())
}
