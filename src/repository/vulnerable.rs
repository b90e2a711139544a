//! Data access built by string interpolation.
//!
//! Every statement here is assembled with `format!` and handed to
//! [`sqlx::raw_sql`] unprepared. Reads run only the first statement of the
//! resulting text; [`VulnerableUserRepository::create_user`] runs all of it,
//! so stacked statements in an insert payload execute. This is the attack
//! surface of the lab; do not reuse it.

use crate::db::{ConnectionProvider, statement};
use crate::error::LabError;
use crate::repository::{NO_USERS_FOUND, USER_NOT_FOUND, join_rows};
use sqlx::sqlite::SqliteRow;
use sqlx::{ColumnIndex, Executor, Row, SqliteConnection};
use tracing::debug;

/// SQL text builders, one per operation. Exposed so callers can show the
/// exact statement a payload turns into.
pub mod sql {
    pub fn user_by_id(id: &str) -> String {
        format!("SELECT username FROM users WHERE id = '{id}'")
    }

    pub fn create_user(username: &str, password: &str, email: &str) -> String {
        format!(
            "INSERT INTO users (username, password, email) VALUES ('{username}', '{password}', '{email}')"
        )
    }

    pub fn authenticate(username: &str, password: &str) -> String {
        format!("SELECT * FROM users WHERE username = '{username}' AND password = '{password}'")
    }

    /// First step of the profile lookup; the id is already an integer.
    pub fn username_by_numeric_id(user_id: i64) -> String {
        format!("SELECT username FROM users WHERE id = {user_id}")
    }

    pub fn email_by_username(username: &str) -> String {
        format!("SELECT email FROM users WHERE username = '{username}'")
    }

    pub fn user_exists(username: &str) -> String {
        format!("SELECT COUNT(*) AS count FROM users WHERE username = '{username}'")
    }

    pub fn email_by_id(user_id: &str) -> String {
        format!("SELECT email FROM users WHERE id = '{user_id}'")
    }

    pub fn search_by_name(name: &str) -> String {
        format!("SELECT username FROM users WHERE username LIKE '%{name}%'")
    }

    /// Unquoted: the value lands in numeric position.
    pub fn password_by_id(user_id: &str) -> String {
        format!("SELECT password FROM users WHERE id = {user_id}")
    }
}

/// Prefix put in front of engine errors returned by [`VulnerableUserRepository::get_user_password`].
pub const SQL_ERROR_PREFIX: &str = "SQL ERROR: ";

/// Read a column as text whatever its storage class, the way a loosely
/// typed driver would. NULL reads as `None`.
fn text<I>(row: &SqliteRow, index: I) -> Result<Option<String>, sqlx::Error>
where
    I: ColumnIndex<SqliteRow>,
{
    row.try_get_unchecked::<Option<String>, _>(index)
}

async fn fetch_all(conn: &mut SqliteConnection, sql: &str) -> Result<Vec<SqliteRow>, sqlx::Error> {
    let sql = statement::leading_statement(conn, sql).await?;
    debug!(%sql, "executing interpolated statement");
    conn.fetch_all(sqlx::raw_sql(sql)).await
}

/// `Ok(None)` when the statement yields no row.
async fn fetch_optional(
    conn: &mut SqliteConnection,
    sql: &str,
) -> Result<Option<SqliteRow>, sqlx::Error> {
    let sql = statement::leading_statement(conn, sql).await?;
    debug!(%sql, "executing interpolated statement");
    conn.fetch_optional(sqlx::raw_sql(sql)).await
}

async fn password_lookup(
    conn: &mut SqliteConnection,
    sql: &str,
) -> Result<Option<String>, sqlx::Error> {
    match fetch_optional(conn, sql).await? {
        Some(row) => text(&row, "password"),
        None => Ok(None),
    }
}

/// Engine message without sqlx's wrapping, as a JDBC-style driver reports it.
fn engine_message(err: &sqlx::Error) -> String {
    err.as_database_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| err.to_string())
}

#[derive(Debug, Clone)]
pub struct VulnerableUserRepository {
    provider: ConnectionProvider,
}

impl VulnerableUserRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Classic injection. `1' OR '1'='1` returns every username joined.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<String>, LabError> {
        let mut conn = self.provider.open().await?;
        let rows = fetch_all(&mut conn, &sql::user_by_id(id)).await?;
        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(name) = text(row, "username")? {
                names.push(name);
            }
        }
        Ok(join_rows(names))
    }

    /// Stores whatever it is given; the insert itself is injectable too.
    ///
    /// The id is read back with `last_insert_rowid()`. On a fresh connection
    /// that is `0` until a row lands, which is reported as
    /// [`LabError::Creation`].
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<i64, LabError> {
        let mut conn = self.provider.open().await?;
        let insert = sql::create_user(username, password, email);
        debug!(sql = %insert, "executing interpolated statement");
        (&mut conn).execute(sqlx::raw_sql(&insert)).await?;

        let id: i64 = sqlx::query_scalar("SELECT last_insert_rowid()")
            .fetch_one(&mut conn)
            .await?;
        if id == 0 {
            return Err(LabError::Creation);
        }
        Ok(id)
    }

    /// Authentication bypass: true when the interpolated query yields any row.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, LabError> {
        let mut conn = self.provider.open().await?;
        let row = fetch_optional(&mut conn, &sql::authenticate(username, password)).await?;
        Ok(row.is_some())
    }

    /// Second-order injection.
    ///
    /// The id is numeric so the first lookup is harmless; the username it
    /// returns was stored earlier and is spliced into the second query.
    pub async fn get_user_profile(&self, user_id: i64) -> Result<Option<String>, LabError> {
        let mut conn = self.provider.open().await?;
        let Some(row) = fetch_optional(&mut conn, &sql::username_by_numeric_id(user_id)).await?
        else {
            return Ok(None);
        };
        let stored_username = text(&row, "username")?.unwrap_or_default();

        let rows = fetch_all(&mut conn, &sql::email_by_username(&stored_username)).await?;
        let mut emails = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(email) = text(row, "email")? {
                emails.push(email);
            }
        }
        Ok(join_rows(emails))
    }

    /// Boolean-blind injection: the answer leaks one bit per request.
    pub async fn check_user_exists(&self, username: &str) -> Result<bool, LabError> {
        let mut conn = self.provider.open().await?;
        let Some(row) = fetch_optional(&mut conn, &sql::user_exists(username)).await? else {
            return Ok(false);
        };
        let count = row.try_get_unchecked::<i64, _>("count")?;
        Ok(count > 0)
    }

    /// Time-blind injection: `1' AND SLEEP(3)--` stalls the response.
    pub async fn get_user_email(&self, user_id: &str) -> Result<String, LabError> {
        let mut conn = self.provider.open().await?;
        let row = fetch_optional(&mut conn, &sql::email_by_id(user_id)).await?;
        match row {
            Some(row) => Ok(text(&row, "email")?.unwrap_or_default()),
            None => Ok(USER_NOT_FOUND.to_string()),
        }
    }

    /// UNION-based injection. The column is read by position, so whatever a
    /// `UNION SELECT` puts in the first column comes back as a "username".
    pub async fn search_user_by_name(&self, name: &str) -> Result<String, LabError> {
        let mut conn = self.provider.open().await?;
        let rows = fetch_all(&mut conn, &sql::search_by_name(name)).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(value) = text(row, 0usize)? {
                values.push(value);
            }
        }
        Ok(join_rows(values).unwrap_or_else(|| NO_USERS_FOUND.to_string()))
    }

    /// Error-based injection.
    ///
    /// Engine errors are returned as the value, prefixed with
    /// [`SQL_ERROR_PREFIX`]. Only a failure to open the connection is an `Err`.
    pub async fn get_user_password(&self, user_id: &str) -> Result<Option<String>, LabError> {
        let mut conn = self.provider.open().await?;
        match password_lookup(&mut conn, &sql::password_by_id(user_id)).await {
            Ok(password) => Ok(password),
            Err(e) => Ok(Some(format!("{SQL_ERROR_PREFIX}{}", engine_message(&e)))),
        }
    }
}
