use crate::db::sleep;
use crate::error::LabError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqliteConnection};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Opens one SQLite connection per call with the lab's pragmas and the
/// `SLEEP` function attached.
///
/// Cheap to clone; holds only the parsed connect options.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    options: SqliteConnectOptions,
}

impl ConnectionProvider {
    pub fn new(options: SqliteConnectOptions) -> Self {
        let options = options
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Off);
        Self { options }
    }

    /// Parse a `sqlite:` connection string. The string is trusted verbatim.
    pub fn from_url(database_url: &str) -> Result<Self, LabError> {
        let options = SqliteConnectOptions::from_str(database_url).map_err(LabError::Connection)?;
        Ok(Self::new(options))
    }

    pub fn filename(&self) -> &Path {
        self.options.get_filename()
    }

    /// Open a fresh connection. The caller owns it; dropping it closes it.
    pub async fn open(&self) -> Result<SqliteConnection, LabError> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(LabError::Connection)?;
        sleep::register(&mut conn)
            .await
            .map_err(LabError::Connection)?;
        debug!(db = %self.filename().display(), "connection opened");
        Ok(conn)
    }
}
