//! PostgreSQL storage implementation.
//!
//! Uniqueness of `session_id` is enforced by the database, and completion is a
//! conditional `UPDATE` so concurrent duplicate deliveries write at most once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use deposit_core::{Deposit, DepositId, DepositStatus, NewDeposit};

use crate::error::{Result, StoreError};
use crate::DepositStore;

/// Default size of the connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

const SELECT_COLUMNS: &str =
    "id, amount, session_id, status, created_at, updated_at, completed_at";

/// PostgreSQL-backed storage implementation.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct DepositRow {
    id: String,
    amount: Decimal,
    session_id: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<DepositRow> for Deposit {
    type Error = StoreError;

    fn try_from(row: DepositRow) -> Result<Self> {
        Ok(Self {
            id: row
                .id
                .parse()
                .map_err(|e| StoreError::Serialization(format!("deposit id {}: {e}", row.id)))?,
            amount: row.amount,
            session_id: row.session_id,
            status: row
                .status
                .parse::<DepositStatus>()
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

impl PgStore {
    /// Connect to PostgreSQL and run pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool. Migrations are not run.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Deposit schema migrations applied");
        Ok(())
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> Result<Option<Deposit>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM deposits WHERE {column} = $1");

        sqlx::query_as::<_, DepositRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .map(Deposit::try_from)
            .transpose()
    }
}

#[async_trait]
impl DepositStore for PgStore {
    async fn create(&self, deposit: NewDeposit) -> Result<DepositId> {
        let id = DepositId::generate();
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO deposits (id, amount, session_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(id.to_string())
        .bind(deposit.amount)
        .bind(&deposit.session_id)
        .bind(DepositStatus::Pending.as_str())
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateSession {
                    session_id: deposit.session_id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &DepositId) -> Result<Option<Deposit>> {
        self.fetch_one_where("id", &id.to_string()).await
    }

    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Deposit>> {
        self.fetch_one_where("session_id", session_id).await
    }

    async fn mark_completed(&self, id: &DepositId) -> Result<bool> {
        let id = id.to_string();

        let updated = sqlx::query(
            "UPDATE deposits \
             SET status = $2, completed_at = now(), updated_at = now() \
             WHERE id = $1 AND status = $3",
        )
        .bind(&id)
        .bind(DepositStatus::Completed.as_str())
        .bind(DepositStatus::Pending.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 1 {
            return Ok(true);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM deposits WHERE id = $1)")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(false)
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deposits")
            .fetch_one(&self.pool)
            .await?;

        usize::try_from(count).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Deposit>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM deposits ORDER BY id DESC LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, DepositRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Deposit::try_from)
            .collect()
    }
}
