mod common;

use common::TestDb;
use sqli_lab::repository::{NO_USERS_FOUND, SecureUserRepository, USER_NOT_FOUND};
use sqli_lab::{LabError, SecureUserService, UserService, VulnerableUserRepository};
use std::time::{Duration, Instant};

#[tokio::test]
async fn get_user_by_id_binds_the_payload_as_text() {
    let db = TestDb::seeded("s-by-id").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert_eq!(repo.get_user_by_id("1").await.unwrap().as_deref(), Some("admin"));
    assert_eq!(repo.get_user_by_id("1' OR '1'='1").await.unwrap(), None);
}

#[tokio::test]
async fn authentication_payloads_do_not_bypass() {
    let db = TestDb::seeded("s-auth").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert!(repo.authenticate("admin", "secret123").await.unwrap());
    assert!(!repo.authenticate("admin' --", "wrongpassword").await.unwrap());
    assert!(!repo.authenticate("' OR '1'='1", "' OR '1'='1").await.unwrap());
}

#[tokio::test]
async fn create_user_stores_payload_verbatim() {
    let db = TestDb::seeded("s-create").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    let payload = "o'brien'); DROP TABLE users; --";
    let id = repo.create_user(payload, "pw", "ob@example.com").await.unwrap();
    assert_eq!(id, 4);
    assert_eq!(repo.get_user_by_id("4").await.unwrap().as_deref(), Some(payload));
    assert!(repo.check_user_exists("admin").await.unwrap());
}

#[tokio::test]
async fn create_user_reports_creation_when_no_row_lands() {
    let db = TestDb::seeded("s-create-ignored").await;
    db.exec("CREATE TRIGGER skip_inserts BEFORE INSERT ON users BEGIN SELECT RAISE(IGNORE); END")
        .await;
    let repo = SecureUserRepository::new(db.provider.clone());

    let err = repo
        .create_user("ghost", "pw", "ghost@example.com")
        .await
        .expect_err("nothing inserted");
    assert!(matches!(err, LabError::Creation));
    assert!(!repo.check_user_exists("ghost").await.unwrap());
}

#[tokio::test]
async fn second_order_payload_stays_inert() {
    let db = TestDb::seeded("s-second-order").await;
    let service = SecureUserService::new(db.provider.clone());

    let id = service
        .create_user("hackerr' or 1=1--", "password123", "hacker@example.com")
        .await
        .unwrap();
    let profile = service.get_user_profile(&id.to_string()).await.unwrap();
    assert_eq!(profile.as_deref(), Some("hacker@example.com"));
}

#[tokio::test]
async fn profile_binds_stored_username_written_by_vulnerable_path() {
    let db = TestDb::seeded("s-second-order-stored").await;
    let id = VulnerableUserRepository::new(db.provider.clone())
        .create_user("hackerr'' or 1=1--", "password123", "hacker@example.com")
        .await
        .unwrap();

    let profile = SecureUserRepository::new(db.provider.clone())
        .get_user_profile(&id.to_string())
        .await
        .unwrap();
    assert_eq!(profile.as_deref(), Some("hacker@example.com"));
}

#[tokio::test]
async fn profile_rejects_non_integer_id() {
    let db = TestDb::seeded("s-profile-type").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    let err = repo
        .get_user_profile("1 OR 1=1")
        .await
        .expect_err("type conversion");
    assert!(matches!(err, LabError::TypeConversion(_)));
    assert_eq!(repo.get_user_profile("999").await.unwrap(), None);
}

#[tokio::test]
async fn boolean_blind_payload_is_a_plain_name() {
    let db = TestDb::seeded("s-boolean").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert!(repo.check_user_exists("admin").await.unwrap());
    let payload = "admin' AND SUBSTR(password,1,1)='s'--";
    for _ in 0..3 {
        assert!(!repo.check_user_exists(payload).await.unwrap());
    }
}

#[tokio::test]
async fn time_blind_payload_does_not_sleep() {
    let db = TestDb::seeded("s-time").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert_eq!(repo.get_user_email("1' AND SLEEP(3)--").await.unwrap(), USER_NOT_FOUND);

    // Time the bound lookup alone; opening the file connection is not part of it.
    let mut conn = db.provider.open().await.expect("open connection");
    let started = Instant::now();
    let result = SecureUserRepository::email_by_id(&mut conn, "1' AND SLEEP(3)--")
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result, USER_NOT_FOUND);
    assert!(elapsed < Duration::from_millis(100), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn union_payload_finds_nothing() {
    let db = TestDb::seeded("s-union").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    let result = repo
        .search_user_by_name("' UNION SELECT credit_card FROM sensitive_data--")
        .await
        .unwrap();
    assert_eq!(result, NO_USERS_FOUND);
    assert!(!result.contains("4532"));
}

#[tokio::test]
async fn search_matches_substrings() {
    let db = TestDb::seeded("s-search").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert_eq!(repo.search_user_by_name("s").await.unwrap(), "user, test");
    assert_eq!(repo.search_user_by_name("' OR '1'='1").await.unwrap(), NO_USERS_FOUND);
}

#[tokio::test]
async fn password_lookup_never_returns_engine_text() {
    let db = TestDb::seeded("s-password").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    assert_eq!(repo.get_user_password("1").await.unwrap().as_deref(), Some("secret123"));
    for payload in ["1'", "1 AND (SELECT 1 FROM no_such_table)"] {
        assert_eq!(repo.get_user_password(payload).await.unwrap(), None, "{payload}");
    }
}

#[tokio::test]
async fn query_errors_are_opaque() {
    let db = TestDb::seeded("s-opaque").await;
    db.exec("DROP TABLE users").await;
    let repo = SecureUserRepository::new(db.provider.clone());

    let err = repo.get_user_password("1").await.expect_err("missing table");
    assert!(matches!(err, LabError::Query));
    let shown = err.to_string();
    assert!(!shown.contains("users"), "{shown}");
    assert!(!shown.contains("SELECT"), "{shown}");
}
