//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8`. Opening the pool stands in for the
//! repository contract's `Open`; dropping the last clone closes it. Idle
//! connections are kept at half the maximum, the sizing rule this service
//! has always used.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Bootstrap DDL executed when the pool opens, covering the single table the
/// service owns. A full migration harness is not warranted here.
const BOOTSTRAP_DDL: &str = "CREATE TABLE IF NOT EXISTS users (\
     id SERIAL PRIMARY KEY, \
     name VARCHAR NOT NULL DEFAULT '', \
     gender VARCHAR NOT NULL DEFAULT '', \
     birthday VARCHAR NOT NULL DEFAULT '')";

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Description of the checkout failure.
        message: String,
    },

    /// Failed to build the connection pool or bootstrap the schema.
    #[error("failed to open connection pool: {message}")]
    Open {
        /// Description of the open failure.
        message: String,
    },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create an open error with the given message.
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Create a configuration with the given database URL, a pool of 10
    /// connections, and a 30-second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Idle connections kept warm: half the maximum, at least one.
    pub fn min_idle(&self) -> u32 {
        (self.max_size / 2).max(1)
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open a pool with the given configuration and ensure the `users` table
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Open`] when the pool cannot be constructed or
    /// the bootstrap DDL fails.
    pub async fn open(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle()))
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::open(err.to_string()))?;

        let db = Self { inner: pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if a connection cannot be obtained
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    async fn ensure_schema(&self) -> Result<(), PoolError> {
        let mut conn = self
            .get()
            .await
            .map_err(|err| PoolError::open(err.to_string()))?;
        diesel::sql_query(BOOTSTRAP_DDL)
            .execute(&mut conn)
            .await
            .map_err(|err| PoolError::open(err.to_string()))?;
        Ok(())
    }
}
