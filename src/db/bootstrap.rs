//! One-shot process set-up: data directory, schema, fixture rows.
//!
//! None of this runs on the request path; `main` calls it once before
//! serving, tests call it per database.

use crate::db::connection::ConnectionProvider;
use crate::db::schema::{SEED_SENSITIVE, SEED_USERS, SQLITE_DROP, SQLITE_INIT, statements};
use crate::error::LabError;
use sqlx::{Connection, SqliteConnection};
use std::fs;
use tracing::{info, warn};

/// Create the directory holding the database file. Best effort: failures are
/// logged and SQLite is left to report the real problem on open.
pub fn ensure_data_dir(provider: &ConnectionProvider) {
    let file = provider.filename();
    // In-memory and bare-filename stores have no directory to create.
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return;
    };
    if parent.exists() {
        info!(path = %parent.display(), "database directory already exists");
        return;
    }
    match fs::create_dir_all(parent) {
        Ok(()) => info!(path = %parent.display(), "created database directory"),
        Err(e) => warn!(
            path = %parent.display(),
            error = %e,
            "failed to create database directory"
        ),
    }
}

async fn run_script(conn: &mut SqliteConnection, script: &str) -> Result<(), LabError> {
    for stmt in statements(script) {
        sqlx::query(stmt)
            .execute(&mut *conn)
            .await
            .map_err(|e| LabError::Bootstrap(e.to_string()))?;
    }
    Ok(())
}

async fn insert_fixture(conn: &mut SqliteConnection) -> Result<(), LabError> {
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| LabError::Bootstrap(e.to_string()))?;
    for (username, password, email) in SEED_USERS {
        sqlx::query("INSERT INTO users (username, password, email) VALUES (?, ?, ?)")
            .bind(*username)
            .bind(*password)
            .bind(*email)
            .execute(&mut *tx)
            .await
            .map_err(|e| LabError::Bootstrap(e.to_string()))?;
    }
    for (secret_key, credit_card, ssn) in SEED_SENSITIVE {
        sqlx::query("INSERT INTO sensitive_data (secret_key, credit_card, ssn) VALUES (?, ?, ?)")
            .bind(*secret_key)
            .bind(*credit_card)
            .bind(*ssn)
            .execute(&mut *tx)
            .await
            .map_err(|e| LabError::Bootstrap(e.to_string()))?;
    }
    tx.commit()
        .await
        .map_err(|e| LabError::Bootstrap(e.to_string()))
}

/// Create both tables if they are missing.
pub async fn init_schema(provider: &ConnectionProvider) -> Result<(), LabError> {
    let mut conn = provider.open().await?;
    run_script(&mut conn, SQLITE_INIT).await
}

/// Seed the fixture rows when `users` is empty. Returns whether rows were inserted.
pub async fn seed_if_empty(provider: &ConnectionProvider) -> Result<bool, LabError> {
    let mut conn = provider.open().await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut conn)
        .await
        .map_err(|e| LabError::Bootstrap(e.to_string()))?;
    if count > 0 {
        return Ok(false);
    }
    insert_fixture(&mut conn).await?;
    info!(
        users = SEED_USERS.len(),
        sensitive = SEED_SENSITIVE.len(),
        "seeded fixture rows"
    );
    Ok(true)
}

/// Drop and recreate both tables, then reseed. Ids restart from 1.
pub async fn reset(provider: &ConnectionProvider) -> Result<(), LabError> {
    let mut conn = provider.open().await?;
    run_script(&mut conn, SQLITE_DROP).await?;
    run_script(&mut conn, SQLITE_INIT).await?;
    insert_fixture(&mut conn).await?;
    info!("database reset to fixture state");
    Ok(())
}
