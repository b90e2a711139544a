//! SQL DDL and fixture rows for the lab store.
//! Two fixed tables: `users` (the attack surface) and `sensitive_data`
//! (the exfiltration target for UNION payloads).

/// `users.password` is stored in cleartext on purpose.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username VARCHAR(50) NOT NULL,
    password VARCHAR(50) NOT NULL,
    email VARCHAR(100) NOT NULL
);

CREATE TABLE IF NOT EXISTS sensitive_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    secret_key VARCHAR(255) NOT NULL,
    credit_card VARCHAR(16) NOT NULL,
    ssn VARCHAR(11) NOT NULL
);
"#;

pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS sensitive_data;
"#;

/// (username, password, email)
pub const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "secret123", "admin@example.com"),
    ("user", "password", "user@example.com"),
    ("test", "test123", "test@example.com"),
];

/// (secret_key, credit_card, ssn)
pub const SEED_SENSITIVE: &[(&str, &str, &str)] = &[
    ("API_KEY_12345", "4532111122223333", "123-45-6789"),
    ("SECRET_TOKEN_XYZ", "5555666677778888", "987-65-4321"),
];

/// Split a DDL script into individual statements.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_script_has_both_tables() {
        let stmts: Vec<_> = statements(SQLITE_INIT).collect();
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("users"));
        assert!(stmts[1].contains("sensitive_data"));
    }
}
