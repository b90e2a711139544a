//! Statement boundaries as SQLite's own parser sees them.
//!
//! A query API that prepares one statement runs only the text up to the
//! first statement's end and ignores the rest. sqlx runs every statement in
//! the text, so reads cut it here first.

use libsqlite3_sys as ffi;
use sqlx::SqliteConnection;
use std::ffi::{c_char, c_int};
use std::ptr;
use tracing::trace;

/// The prefix of `sql` that SQLite compiles as its first statement,
/// terminator included. Text SQLite cannot compile is returned whole so
/// executing it reports the engine's own error.
pub async fn leading_statement<'s>(
    conn: &mut SqliteConnection,
    sql: &'s str,
) -> Result<&'s str, sqlx::Error> {
    let Ok(len) = c_int::try_from(sql.len()) else {
        return Ok(sql);
    };
    let mut handle = conn.lock_handle().await?;
    let db = handle.as_raw_handle().as_ptr();

    let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
    let mut tail: *const c_char = ptr::null();
    // SAFETY: `db` is the open handle kept locked by `handle` for this scope;
    // `sql` is valid for `len` bytes and outlives the call.
    let rc = unsafe {
        ffi::sqlite3_prepare_v2(db, sql.as_ptr().cast(), len, &mut stmt, &mut tail)
    };
    // SAFETY: `stmt` is either NULL or a statement prepared above and never
    // shared; finalizing NULL is a no-op.
    unsafe { ffi::sqlite3_finalize(stmt) };

    if rc != ffi::SQLITE_OK || tail.is_null() {
        return Ok(sql);
    }
    // `tail` points into `sql`, at or after its start.
    let consumed = (tail as usize).saturating_sub(sql.as_ptr() as usize);
    let head = sql.get(..consumed).unwrap_or(sql);
    if head.len() < sql.len() {
        trace!(ignored = &sql[head.len()..], "text after first statement ignored");
    }
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::ConnectOptions;
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    async fn memory_conn() -> SqliteConnection {
        let mut conn = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid url")
            .connect()
            .await
            .expect("open in-memory db");
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT)")
            .execute(&mut conn)
            .await
            .expect("create table");
        conn
    }

    #[tokio::test]
    async fn single_statement_is_kept_whole() {
        let mut conn = memory_conn().await;
        let sql = "SELECT username FROM users WHERE id = '1' AND 1=1--'";
        assert_eq!(leading_statement(&mut conn, sql).await.expect("split"), sql);
    }

    #[tokio::test]
    async fn stacked_statements_are_cut_after_the_first() {
        let mut conn = memory_conn().await;
        let sql = "SELECT username FROM users WHERE id = '1'; DELETE FROM users; --'";
        assert_eq!(
            leading_statement(&mut conn, sql).await.expect("split"),
            "SELECT username FROM users WHERE id = '1';"
        );
    }

    #[tokio::test]
    async fn uncompilable_text_is_returned_whole() {
        let mut conn = memory_conn().await;
        let sql = "SELECT password FROM users WHERE id = 1'; DELETE FROM users";
        assert_eq!(leading_statement(&mut conn, sql).await.expect("split"), sql);
    }
}
