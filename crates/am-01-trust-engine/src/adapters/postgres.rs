//! PostgreSQL Adapters
//!
//! `sqlx` implementations of the store ports. Every statement is a constant
//! with positional parameters; caller data only ever travels through `bind`.
//!
//! ## Expected Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     external_id    TEXT PRIMARY KEY,
//!     trust_level    SMALLINT NULL,
//!     email_verified BOOLEAN NOT NULL DEFAULT FALSE
//! );
//!
//! CREATE TABLE verification_tokens (
//!     token      TEXT PRIMARY KEY,
//!     user_id    TEXT NOT NULL REFERENCES users (external_id),
//!     created_at TIMESTAMPTZ NOT NULL,
//!     expires_at TIMESTAMPTZ NOT NULL,
//!     consumed   BOOLEAN NOT NULL DEFAULT FALSE
//! );
//!
//! CREATE TABLE orders (
//!     id      BIGSERIAL PRIMARY KEY,
//!     user_id TEXT NOT NULL REFERENCES users (external_id),
//!     status  TEXT NOT NULL
//! );
//! ```

use crate::domain::{
    AccountId, ConfigError, StoreError, TokenValue, TrustLevel, TrustRecord, VerificationToken,
};
use crate::ports::outbound::{OrderLedger, TokenStore, TrustStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

const READ_TRUST_SQL: &str =
    "SELECT trust_level, email_verified FROM users WHERE external_id = $1";

const WRITE_TRUST_SQL: &str = "UPDATE users SET trust_level = $1 WHERE external_id = $2";

const MARK_VERIFIED_SQL: &str = "UPDATE users SET email_verified = TRUE WHERE external_id = $1";

// The COALESCE mirrors `TrustRecord::effective_level`: an explicit level wins,
// otherwise the verified flag decides between $3 (VERIFIED) and $4 (NEW).
const RAISE_TRUST_SQL: &str = "UPDATE users SET trust_level = $1 \
     WHERE external_id = $2 \
     AND COALESCE(NULLIF(trust_level, 0), CASE WHEN email_verified THEN $3 ELSE $4 END) < $1";

const ACCOUNT_EXISTS_SQL: &str = "SELECT 1 FROM users WHERE external_id = $1";

const INSERT_TOKEN_SQL: &str = "INSERT INTO verification_tokens \
     (token, user_id, created_at, expires_at, consumed) VALUES ($1, $2, $3, $4, FALSE)";

const CONSUME_TOKEN_SQL: &str = "UPDATE verification_tokens SET consumed = TRUE \
     WHERE token = $1 AND consumed = FALSE AND expires_at > $2 RETURNING user_id";

const COMPLETED_ORDERS_SQL: &str =
    "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND status = $2";

const COMPLETED_STATUS: &str = "completed";

/// Connection settings for the Postgres adapters.
#[derive(Clone, Serialize, Deserialize)]
pub struct PgStoreConfig {
    /// Connection string. Holds credentials, so it is redacted in `Debug`.
    pub database_url: String,
    /// Pool size.
    pub max_connections: u32,
    /// Wait limit for a pooled connection.
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    /// Config for `database_url` with default pool settings.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Read `DATABASE_URL` (required) and `MARKET_DB_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Invalid("DATABASE_URL is not set".into()))?;
        let mut config = Self::new(url);

        if let Ok(raw) = env::var("MARKET_DB_MAX_CONNECTIONS") {
            config.max_connections = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("MARKET_DB_MAX_CONNECTIONS={raw:?} is not a number"))
            })?;
        }

        if config.max_connections == 0 {
            return Err(ConfigError::Invalid("max_connections cannot be 0".into()));
        }
        Ok(config)
    }
}

impl fmt::Debug for PgStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgStoreConfig")
            .field("database_url", &"***")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Build the shared pool. Connections are opened on first use.
///
/// Create one pool at startup and hand clones to each adapter; call
/// `PgPool::close` on shutdown.
pub fn connect_pool(config: &PgStoreConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(&config.database_url)?;

    info!(
        max_connections = config.max_connections,
        "Postgres pool created"
    );
    Ok(pool)
}

/// Map a stored `trust_level` column to the domain.
///
/// NULL and 0 mean "no explicit level". Anything else outside 1..=4 is a
/// corrupt row.
fn decode_level(raw: Option<i16>) -> Result<Option<TrustLevel>, StoreError> {
    match raw {
        None | Some(0) => Ok(None),
        Some(value) => TrustLevel::from_ordinal(i64::from(value))
            .map(Some)
            .map_err(|_| StoreError::Corrupt(format!("trust_level={value}"))),
    }
}

/// Account trust attributes in the `users` table.
#[derive(Clone)]
pub struct PgTrustStore {
    pool: PgPool,
}

impl PgTrustStore {
    /// Wrap a shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrustStore for PgTrustStore {
    async fn read_trust(&self, account: &AccountId) -> Result<TrustRecord, StoreError> {
        let row = sqlx::query(READ_TRUST_SQL)
            .bind(account.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(TrustRecord::absent());
        };

        let level = decode_level(row.try_get::<Option<i16>, _>("trust_level")?)?;
        let verified = row
            .try_get::<Option<bool>, _>("email_verified")?
            .unwrap_or(false);
        Ok(TrustRecord::stored(level, verified))
    }

    async fn write_trust(&self, account: &AccountId, level: TrustLevel) -> Result<(), StoreError> {
        let result = sqlx::query(WRITE_TRUST_SQL)
            .bind(level.ordinal())
            .bind(account.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("account {account}")));
        }
        Ok(())
    }

    async fn mark_verified(&self, account: &AccountId) -> Result<(), StoreError> {
        let result = sqlx::query(MARK_VERIFIED_SQL)
            .bind(account.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("account {account}")));
        }
        Ok(())
    }

    async fn raise_trust(
        &self,
        account: &AccountId,
        floor: TrustLevel,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(RAISE_TRUST_SQL)
            .bind(floor.ordinal())
            .bind(account.as_str())
            .bind(TrustLevel::Verified.ordinal())
            .bind(TrustLevel::New.ordinal())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing raised: either already at or above `floor`, or no row.
        let exists = sqlx::query(ACCOUNT_EXISTS_SQL)
            .bind(account.as_str())
            .fetch_optional(&self.pool)
            .await?;
        match exists {
            Some(_) => Ok(false),
            None => Err(StoreError::NotFound(format!("account {account}"))),
        }
    }
}

/// Verification tokens in the `verification_tokens` table.
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    /// Wrap a shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn insert(&self, token: &VerificationToken) -> Result<(), StoreError> {
        sqlx::query(INSERT_TOKEN_SQL)
            .bind(token.value.expose())
            .bind(token.account_id.as_str())
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn consume_if_valid(
        &self,
        token: &TokenValue,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, StoreError> {
        // One conditional UPDATE: concurrent redeems of the same token
        // serialize on the row lock and only the first sees consumed = FALSE.
        let user_id = sqlx::query_scalar::<_, String>(CONSUME_TOKEN_SQL)
            .bind(token.expose())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        match user_id {
            Some(raw) => {
                let account = AccountId::parse(&raw)
                    .map_err(|_| StoreError::Corrupt("verification_tokens.user_id".into()))?;
                Ok(Some(account))
            }
            None => {
                debug!("No redeemable verification token matched");
                Ok(None)
            }
        }
    }
}

/// Completed-order counts from the `orders` table.
#[derive(Clone)]
pub struct PgOrderLedger {
    pool: PgPool,
}

impl PgOrderLedger {
    /// Wrap a shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderLedger for PgOrderLedger {
    async fn completed_order_count(&self, account: &AccountId) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(COMPLETED_ORDERS_SQL)
            .bind(account.as_str())
            .bind(COMPLETED_STATUS)
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|_| StoreError::Corrupt(format!("order count {count}")))
    }
}
