//! Attack runner behind the `/api/lab` endpoints.
//!
//! Runs one attack class through a chosen facade, times it, and reports
//! whether the result carries the signature of a working injection.

use crate::error::LabError;
use crate::repository::vulnerable::{SQL_ERROR_PREFIX, sql as vsql};
use crate::repository::{NO_USERS_FOUND, ROW_SEPARATOR, secure::sql as ssql};
use crate::service::UserService;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// A `SLEEP` payload counts as executed once the call took at least this long.
pub const TIME_BLIND_THRESHOLD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attack {
    /// `getUserById`
    Classic,
    /// `authenticate`
    AuthBypass,
    /// `createUser` then `getUserProfile`
    SecondOrder,
    /// `checkUserExists`
    BooleanBlind,
    /// `getUserEmail`
    TimeBlind,
    /// `searchUserByName` with a `UNION SELECT`
    Union,
    /// `getUserPassword`
    ErrorBased,
    /// `searchUserByName` with a predicate payload
    Search,
}

impl Attack {
    pub const ALL: [Attack; 8] = [
        Attack::Classic,
        Attack::AuthBypass,
        Attack::SecondOrder,
        Attack::BooleanBlind,
        Attack::TimeBlind,
        Attack::Union,
        Attack::ErrorBased,
        Attack::Search,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Vulnerable,
    Secure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Safe,
    Error,
}

/// Inputs for an attack; each attack reads the fields it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttackInput {
    pub user_id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub search: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackReport {
    pub attack: Attack,
    pub mode: Mode,
    /// The SQL the payload produced (vulnerable) or the prepared text (secure).
    pub query: String,
    pub outcome: Option<String>,
    pub duration_ms: u64,
    pub exploited: bool,
    pub severity: Severity,
}

fn has_quote(s: &str) -> bool {
    s.contains('\'')
}

fn is_multi_row(outcome: Option<&str>) -> bool {
    outcome.is_some_and(|o| o.contains(ROW_SEPARATOR))
}

/// Statement text shown in the report.
pub fn render_query(attack: Attack, mode: Mode, input: &AttackInput) -> String {
    match mode {
        Mode::Vulnerable => match attack {
            Attack::Classic => vsql::user_by_id(&input.user_id),
            Attack::AuthBypass => vsql::authenticate(&input.username, &input.password),
            Attack::SecondOrder => format!(
                "{}; {}",
                vsql::create_user(&input.username, &input.password, &input.email),
                vsql::email_by_username(&input.username)
            ),
            Attack::BooleanBlind => vsql::user_exists(&input.username),
            Attack::TimeBlind => vsql::email_by_id(&input.user_id),
            Attack::Union | Attack::Search => vsql::search_by_name(&input.search),
            Attack::ErrorBased => vsql::password_by_id(&input.user_id),
        },
        Mode::Secure => match attack {
            Attack::Classic => ssql::USER_BY_ID.to_string(),
            Attack::AuthBypass => ssql::AUTHENTICATE.to_string(),
            Attack::SecondOrder => format!(
                "{}; {}; {}",
                ssql::CREATE_USER,
                ssql::USERNAME_BY_ID,
                ssql::EMAIL_BY_USERNAME
            ),
            Attack::BooleanBlind => ssql::USER_EXISTS.to_string(),
            Attack::TimeBlind => ssql::EMAIL_BY_ID.to_string(),
            Attack::Union | Attack::Search => ssql::SEARCH_BY_NAME.to_string(),
            Attack::ErrorBased => ssql::PASSWORD_BY_ID.to_string(),
        },
    }
}

/// Whether `outcome` shows the attack worked.
pub fn exploited(
    attack: Attack,
    input: &AttackInput,
    outcome: Option<&str>,
    elapsed: Duration,
) -> bool {
    match attack {
        Attack::Classic | Attack::SecondOrder => is_multi_row(outcome),
        Attack::AuthBypass => {
            outcome == Some("true") && (has_quote(&input.username) || has_quote(&input.password))
        }
        Attack::BooleanBlind => outcome == Some("true") && has_quote(&input.username),
        Attack::TimeBlind => {
            input.user_id.to_ascii_uppercase().contains("SLEEP") && elapsed >= TIME_BLIND_THRESHOLD
        }
        Attack::Union => {
            input.search.to_ascii_uppercase().contains("UNION")
                && outcome.is_some_and(|o| o != NO_USERS_FOUND)
        }
        Attack::ErrorBased => outcome.is_some_and(|o| o.starts_with(SQL_ERROR_PREFIX)),
        Attack::Search => has_quote(&input.search) && outcome.is_some_and(|o| o != NO_USERS_FOUND),
    }
}

async fn execute<S: UserService>(
    service: &S,
    attack: Attack,
    input: &AttackInput,
) -> Result<Option<String>, LabError> {
    Ok(match attack {
        Attack::Classic => service.get_user_by_id(&input.user_id).await?,
        Attack::AuthBypass => Some(
            service
                .authenticate(&input.username, &input.password)
                .await?
                .to_string(),
        ),
        Attack::SecondOrder => {
            let id = service
                .create_user(&input.username, &input.password, &input.email)
                .await?;
            service.get_user_profile(&id.to_string()).await?
        }
        Attack::BooleanBlind => Some(service.check_user_exists(&input.username).await?.to_string()),
        Attack::TimeBlind => Some(service.get_user_email(&input.user_id).await?),
        Attack::Union | Attack::Search => Some(service.search_user_by_name(&input.search).await?),
        Attack::ErrorBased => service.get_user_password(&input.user_id).await?,
    })
}

/// Run `attack` through `service`. Errors become a report with
/// [`Severity::Error`] and the error's display text as the outcome.
pub async fn run<S: UserService>(
    service: &S,
    mode: Mode,
    attack: Attack,
    input: &AttackInput,
) -> AttackReport {
    let query = render_query(attack, mode, input);
    let started = Instant::now();
    let result = execute(service, attack, input).await;
    let elapsed = started.elapsed();
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    let (outcome, hit, severity) = match result {
        Ok(outcome) => {
            let hit = exploited(attack, input, outcome.as_deref(), elapsed);
            let severity = if hit { Severity::Critical } else { Severity::Safe };
            (outcome, hit, severity)
        }
        Err(e) => (Some(e.to_string()), false, Severity::Error),
    };

    info!(?attack, ?mode, exploited = hit, duration_ms, "attack executed");

    AttackReport {
        attack,
        mode,
        query,
        outcome,
        duration_ms,
        exploited: hit,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AttackInput {
        AttackInput::default()
    }

    #[test]
    fn attack_names_are_kebab_case() {
        let json = serde_json::to_string(&Attack::ALL).expect("serialize");
        assert_eq!(
            json,
            r#"["classic","auth-bypass","second-order","boolean-blind","time-blind","union","error-based","search"]"#
        );
    }

    #[test]
    fn classic_needs_multiple_rows() {
        let i = input();
        assert!(exploited(Attack::Classic, &i, Some("admin, user"), Duration::ZERO));
        assert!(!exploited(Attack::Classic, &i, Some("admin"), Duration::ZERO));
        assert!(!exploited(Attack::Classic, &i, None, Duration::ZERO));
    }

    #[test]
    fn time_blind_needs_payload_and_delay() {
        let mut i = input();
        i.user_id = "1' AND SLEEP(3)--".to_string();
        assert!(exploited(Attack::TimeBlind, &i, Some("User not found"), Duration::from_secs(3)));
        assert!(!exploited(Attack::TimeBlind, &i, Some("User not found"), Duration::from_millis(5)));
    }

    #[test]
    fn error_based_matches_prefix() {
        let i = input();
        let leaked = format!("{SQL_ERROR_PREFIX}unrecognized token");
        assert!(exploited(Attack::ErrorBased, &i, Some(&leaked), Duration::ZERO));
        assert!(!exploited(Attack::ErrorBased, &i, Some("secret123"), Duration::ZERO));
    }

    #[test]
    fn secure_query_text_has_no_payload() {
        let mut i = input();
        i.search = "' UNION SELECT credit_card FROM sensitive_data--".to_string();
        let rendered = render_query(Attack::Union, Mode::Secure, &i);
        assert!(!rendered.contains("credit_card"));
        let rendered = render_query(Attack::Union, Mode::Vulnerable, &i);
        assert!(rendered.contains("UNION SELECT credit_card"));
    }
}
