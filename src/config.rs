use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `SQLLAB_DATABASE_URL`.
pub const ENV_PREFIX: &str = "SQLLAB_";

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/sqllib.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite connection string; trusted verbatim, pragmas included.
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Insert the fixture rows at start-up when `users` is empty.
    pub seed_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            loglevel: "info".to_string(),
            seed_on_start: true,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load defaults overlaid with `SQLLAB_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_file_store() {
        let cfg = Config::default();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert!(cfg.seed_on_start);
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SQLLAB_DATABASE_URL", "sqlite::memory:");
            jail.set_env("SQLLAB_SEED_ON_START", "false");
            let cfg = Config::load()?;
            assert_eq!(cfg.database_url, "sqlite::memory:");
            assert!(!cfg.seed_on_start);
            assert_eq!(cfg.loglevel, "info");
            Ok(())
        });
    }
}
