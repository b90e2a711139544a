//! Data access with bound parameters.
//!
//! Mirrors [`VulnerableUserRepository`](super::VulnerableUserRepository)
//! operation for operation. Caller values only ever reach SQLite through
//! `?` placeholders, and engine errors are logged here and surfaced as the
//! opaque [`LabError::Query`].

use crate::db::ConnectionProvider;
use crate::error::LabError;
use crate::repository::{NO_USERS_FOUND, USER_NOT_FOUND, join_rows};
use sqlx::{Row, SqliteConnection};
use tracing::warn;

/// Prepared statement texts.
pub mod sql {
    pub const USER_BY_ID: &str = "SELECT username FROM users WHERE id = ?";
    pub const CREATE_USER: &str = "INSERT INTO users (username, password, email) VALUES (?, ?, ?)";
    pub const AUTHENTICATE: &str = "SELECT * FROM users WHERE username = ? AND password = ?";
    pub const USERNAME_BY_ID: &str = "SELECT username FROM users WHERE id = ?";
    pub const EMAIL_BY_USERNAME: &str = "SELECT email FROM users WHERE username = ?";
    pub const USER_EXISTS: &str = "SELECT COUNT(*) AS count FROM users WHERE username = ?";
    pub const EMAIL_BY_ID: &str = "SELECT email FROM users WHERE id = ?";
    pub const SEARCH_BY_NAME: &str = "SELECT username FROM users WHERE username LIKE ?";
    pub const PASSWORD_BY_ID: &str = "SELECT password FROM users WHERE id = ?";
}

fn opaque(op: &'static str) -> impl FnOnce(sqlx::Error) -> LabError {
    move |e| {
        warn!(op, error = %e, "parameterised query failed");
        LabError::Query
    }
}

/// Bind an id as an integer. Anything that is not a plain integer is refused
/// before a statement is prepared.
pub fn bind_integer_id(user_id: &str) -> Result<i64, LabError> {
    user_id
        .parse::<i64>()
        .map_err(|_| LabError::TypeConversion("user id must be an integer".to_string()))
}

#[derive(Debug, Clone)]
pub struct SecureUserRepository {
    provider: ConnectionProvider,
}

impl SecureUserRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<String>, LabError> {
        let mut conn = self.provider.open().await?;
        let rows = sqlx::query(sql::USER_BY_ID)
            .bind(id)
            .fetch_all(&mut conn)
            .await
            .map_err(opaque("get_user_by_id"))?;
        let names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("username"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(opaque("get_user_by_id"))?;
        Ok(join_rows(names))
    }

    /// Returns the id reported by the insert itself.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<i64, LabError> {
        let mut conn = self.provider.open().await?;
        let done = sqlx::query(sql::CREATE_USER)
            .bind(username)
            .bind(password)
            .bind(email)
            .execute(&mut conn)
            .await
            .map_err(opaque("create_user"))?;
        let id = done.last_insert_rowid();
        if done.rows_affected() != 1 || id <= 0 {
            return Err(LabError::Creation);
        }
        Ok(id)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, LabError> {
        let mut conn = self.provider.open().await?;
        let row = sqlx::query(sql::AUTHENTICATE)
            .bind(username)
            .bind(password)
            .fetch_optional(&mut conn)
            .await
            .map_err(opaque("authenticate"))?;
        Ok(row.is_some())
    }

    /// Both steps are bound, including the one fed by the stored username:
    /// data read back from the database is still untrusted.
    pub async fn get_user_profile(&self, user_id: &str) -> Result<Option<String>, LabError> {
        let user_id = bind_integer_id(user_id)?;
        let mut conn = self.provider.open().await?;

        let stored_username: Option<String> = sqlx::query_scalar(sql::USERNAME_BY_ID)
            .bind(user_id)
            .fetch_optional(&mut conn)
            .await
            .map_err(opaque("get_user_profile"))?;
        let Some(stored_username) = stored_username else {
            return Ok(None);
        };

        let email: Option<String> = sqlx::query_scalar(sql::EMAIL_BY_USERNAME)
            .bind(stored_username)
            .fetch_optional(&mut conn)
            .await
            .map_err(opaque("get_user_profile"))?;
        Ok(email)
    }

    pub async fn check_user_exists(&self, username: &str) -> Result<bool, LabError> {
        let mut conn = self.provider.open().await?;
        let count: i64 = sqlx::query_scalar(sql::USER_EXISTS)
            .bind(username)
            .fetch_one(&mut conn)
            .await
            .map_err(opaque("check_user_exists"))?;
        Ok(count > 0)
    }

    pub async fn get_user_email(&self, user_id: &str) -> Result<String, LabError> {
        let mut conn = self.provider.open().await?;
        Self::email_by_id(&mut conn, user_id).await
    }

    /// The lookup behind [`get_user_email`](Self::get_user_email), on a
    /// connection the caller already holds.
    pub async fn email_by_id(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<String, LabError> {
        let email: Option<String> = sqlx::query_scalar(sql::EMAIL_BY_ID)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .map_err(opaque("get_user_email"))?;
        Ok(email.unwrap_or_else(|| USER_NOT_FOUND.to_string()))
    }

    /// Reads the column by name. `%` and `_` in `name` still act as LIKE
    /// wildcards; they cannot change the statement.
    pub async fn search_user_by_name(&self, name: &str) -> Result<String, LabError> {
        let mut conn = self.provider.open().await?;
        let rows = sqlx::query(sql::SEARCH_BY_NAME)
            .bind(format!("%{name}%"))
            .fetch_all(&mut conn)
            .await
            .map_err(opaque("search_user_by_name"))?;
        let names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("username"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(opaque("search_user_by_name"))?;
        Ok(join_rows(names).unwrap_or_else(|| NO_USERS_FOUND.to_string()))
    }

    /// Engine errors stay in the log; the caller sees [`LabError::Query`].
    pub async fn get_user_password(&self, user_id: &str) -> Result<Option<String>, LabError> {
        let mut conn = self.provider.open().await?;
        sqlx::query_scalar(sql::PASSWORD_BY_ID)
            .bind(user_id)
            .fetch_optional(&mut conn)
            .await
            .map_err(opaque("get_user_password"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_bind() {
        assert_eq!(bind_integer_id("42").ok(), Some(42));
    }

    #[test]
    fn non_numeric_ids_are_refused() {
        for input in ["1' OR '1'='1", "", " 1", "1.5", "abc"] {
            let err = bind_integer_id(input).expect_err(input);
            assert!(matches!(err, LabError::TypeConversion(_)), "{input}");
        }
    }
}
