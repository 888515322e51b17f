use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::SqliteConnection;

use crate::config::Config;
use crate::error::AppError;

pub(crate) type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("schema.sql");

/// SQLite keeps these per connection, so they are applied on every checkout
/// from the pool. Without `foreign_keys` the cascade on `food.user_fk` is inert.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

pub(crate) fn build_pool(config: &Config) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: config.busy_timeout,
        }))
        .build(manager)
}

/// Creates the tables if they are missing. Must run once before serving.
pub(crate) fn initialize(pool: &DbPool) -> Result<(), AppError> {
    let conn = pool.get()?;
    conn.batch_execute(SCHEMA)?;
    log::info!("database schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use tempfile::TempDir;

    /// Pool over a fresh database file. Keep the `TempDir` alive for the test.
    pub(crate) fn setup_pool() -> (TempDir, DbPool) {
        let test_dir = TempDir::new().unwrap();
        let db_path = test_dir.path().join("test.sqlite");

        let config = Config {
            database_url: db_path.to_str().unwrap().to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            pool_size: 2,
            busy_timeout: Duration::from_millis(1000),
        };
        let pool = build_pool(&config).unwrap();
        initialize(&pool).unwrap();

        (test_dir, pool)
    }
}
