#![allow(dead_code)]

use sqli_lab::db::{ConnectionProvider, bootstrap};
use sqlx::Executor;
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// A seeded temp-file database, removed on drop.
pub struct TestDb {
    pub provider: ConnectionProvider,
    path: PathBuf,
}

impl TestDb {
    pub async fn seeded(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "sqli-lab-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));

        let database_url = format!("sqlite:{}", path.display());
        let provider = ConnectionProvider::from_url(&database_url).expect("parse database url");
        bootstrap::init_schema(&provider).await.expect("init schema");
        bootstrap::seed_if_empty(&provider)
            .await
            .expect("seed fixture");

        Self { provider, path }
    }

    /// Run a setup statement directly, outside both repositories.
    pub async fn exec(&self, sql: &str) {
        let mut conn = self.provider.open().await.expect("open connection");
        (&mut conn)
            .execute(sqlx::raw_sql(sql))
            .await
            .expect("setup statement");
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}
