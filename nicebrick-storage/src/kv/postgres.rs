//! PostgreSQL-backed store.
//!
//! Counters and set members live in two plain tables. Atomicity comes from
//! single-statement upserts: `INSERT .. ON CONFLICT DO UPDATE .. RETURNING`
//! for `incr` and `INSERT .. ON CONFLICT DO NOTHING` for `sadd`.
//! `record_vote` chains both through a data-modifying CTE, so the counter
//! upsert only sees a row when the member insert produced one.
//!
//! The tables are created on first use. A failed attempt is not remembered,
//! so a store built while the server was down heals once it comes back.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use nicebrick_core::StorageError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_postgres::NoTls;

use super::{KvStore, StoreResult};

const BACKEND: &str = "postgres";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nicebrick_kv_counters (
    key   TEXT PRIMARY KEY,
    value BIGINT NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS nicebrick_kv_set_members (
    key    TEXT NOT NULL,
    member TEXT NOT NULL,
    PRIMARY KEY (key, member)
);
";

const RECORD_VOTE: &str = "
WITH added AS (
    INSERT INTO nicebrick_kv_set_members (key, member) VALUES ($1, $2)
    ON CONFLICT DO NOTHING
    RETURNING 1
)
INSERT INTO nicebrick_kv_counters (key, value)
SELECT $3::text, 1::bigint FROM added
ON CONFLICT (key) DO UPDATE SET value = nicebrick_kv_counters.value + 1
RETURNING value
";

const TABLES_PRESENT: &str = "
SELECT to_regclass('nicebrick_kv_counters') IS NOT NULL
   AND to_regclass('nicebrick_kv_set_members') IS NOT NULL
";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait/create timeout for pooled connections
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "nicebrick".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_size: 16,
            timeout: Duration::from_secs(5),
        }
    }
}

impl DbConfig {
    /// Read `NICEBRICK_DB_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("NICEBRICK_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("NICEBRICK_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("NICEBRICK_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("NICEBRICK_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("NICEBRICK_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("NICEBRICK_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("NICEBRICK_DB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Create a connection pool from this configuration.
    ///
    /// No connection is opened here; the first checkout connects.
    pub fn create_pool(&self) -> StoreResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = deadpool_postgres::PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        pool_cfg.timeouts.create = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StorageError::unavailable(BACKEND, format!("failed to create pool: {}", e)))
    }
}

// ============================================================================
// STORE
// ============================================================================

/// [`KvStore`] over a deadpool-postgres pool.
#[derive(Clone)]
pub struct PgKvStore {
    pool: Pool,
    schema: Arc<OnceCell<()>>,
}

impl PgKvStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            schema: Arc::new(OnceCell::new()),
        }
    }

    pub fn from_config(config: &DbConfig) -> StoreResult<Self> {
        Ok(Self::new(config.create_pool()?))
    }

    /// Create the backing tables if they do not exist.
    ///
    /// Runs at most once successfully per store; every primitive calls it,
    /// so after a failure the next operation tries again.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        self.schema
            .get_or_try_init(|| async {
                let conn = self.checkout().await?;
                conn.batch_execute(SCHEMA)
                    .await
                    .map_err(|e| query_failed("ensure_schema", e))?;
                tracing::info!(backend = BACKEND, "Store schema ready");
                Ok::<(), StorageError>(())
            })
            .await
            .map(|_| ())
    }

    /// Whether the schema has been created by this store.
    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    /// Current number of pooled connections.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    async fn conn(&self) -> StoreResult<deadpool_postgres::Object> {
        self.ensure_schema().await?;
        self.checkout().await
    }

    async fn checkout(&self) -> StoreResult<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::unavailable(BACKEND, e.to_string()))
    }
}

fn query_failed(operation: &str, err: tokio_postgres::Error) -> StorageError {
    if err.is_closed() {
        StorageError::unavailable(BACKEND, err.to_string())
    } else {
        StorageError::operation(operation, err.to_string())
    }
}

fn to_counter(key: &str, value: i64) -> StoreResult<u64> {
    u64::try_from(value).map_err(|_| StorageError::CorruptValue {
        key: key.to_string(),
        reason: format!("negative counter value {}", value),
    })
}

#[async_trait]
impl KvStore for PgKvStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn get(&self, key: &str) -> StoreResult<Option<u64>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT value FROM nicebrick_kv_counters WHERE key = $1",
                &[&key],
            )
            .await
            .map_err(|e| query_failed("get", e))?;

        match row {
            Some(row) => {
                let value: i64 = row.try_get(0).map_err(|e| query_failed("get", e))?;
                Ok(Some(to_counter(key, value)?))
            }
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> StoreResult<u64> {
        let conn = self.conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO nicebrick_kv_counters (key, value) VALUES ($1, 1) \
                 ON CONFLICT (key) DO UPDATE SET value = nicebrick_kv_counters.value + 1 \
                 RETURNING value",
                &[&key],
            )
            .await
            .map_err(|e| query_failed("incr", e))?;
        let value: i64 = row.try_get(0).map_err(|e| query_failed("incr", e))?;
        to_counter(key, value)
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let conn = self.conn().await?;
        let inserted = conn
            .execute(
                "INSERT INTO nicebrick_kv_set_members (key, member) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
                &[&key, &member],
            )
            .await
            .map_err(|e| query_failed("sadd", e))?;
        Ok(inserted == 1)
    }

    async fn record_vote(
        &self,
        voters_key: &str,
        member: &str,
        counter_key: &str,
    ) -> StoreResult<bool> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(RECORD_VOTE, &[&voters_key, &member, &counter_key])
            .await
            .map_err(|e| query_failed("record_vote", e))?;
        Ok(row.is_some())
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT 1 FROM nicebrick_kv_set_members WHERE key = $1 AND member = $2",
                &[&key, &member],
            )
            .await
            .map_err(|e| query_failed("sismember", e))?;
        Ok(row.is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        let conn = self.conn().await?;
        let row = conn
            .query_one(TABLES_PRESENT, &[])
            .await
            .map_err(|e| query_failed("ping", e))?;
        let present: bool = row.try_get(0).map_err(|e| query_failed("ping", e))?;
        if present {
            Ok(())
        } else {
            Err(StorageError::unavailable(BACKEND, "store tables are missing"))
        }
    }
}
