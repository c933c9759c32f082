//! Durable persona store (SQLite, WAL mode)
//!
//! Owns the seller/buyer installation records, the synced cognition assets
//! and the rental rows. All multi-statement mutations run inside a
//! transaction, and every call is bounded by a query timeout that surfaces
//! as a retryable store error.
//!
//! The asset API only accepts and returns `CognitionProfile` values; raw
//! memory source text has no route into or out of this store.

use crate::config::StoreConfig;
use crate::distill::{CognitionProfile, DOCUMENT_DIR, DOCUMENT_FILE};
use crate::error::{Error, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Installation record upserted on every sync (sellers) or pull (buyers).
/// Timestamps are owned by the store: `first_seen` is set once, `last_seen`
/// only ever advances.
#[derive(Debug, Clone)]
pub struct InstallRecord {
    pub user_id: String,
    pub host_fingerprint: String,
    pub metadata: serde_json::Value,
}

/// Seller/buyer row as persisted
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InstallRow {
    pub user_id: String,
    pub host_fingerprint: String,
    pub first_seen: String,
    pub last_seen: String,
    pub metadata: Option<String>,
}

/// Rental row as persisted. `token` is the opaque value without the
/// display namespace prefix.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RentalRow {
    pub token: String,
    pub seller_user_id: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub revoked: bool,
}

#[derive(Clone)]
pub struct PersonaStore {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl PersonaStore {
    /// Open (creating if missing) the store at the configured path.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let opts = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}?mode=rwc",
            config.db_path.display()
        ))
        .map_err(|e| Error::Store(format!("invalid database path: {e}")))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        let store = Self {
            pool,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Idempotent schema creation.
    async fn init_schema(&self) -> Result<()> {
        let ddl = [
            "CREATE TABLE IF NOT EXISTS sellers (
                user_id          TEXT PRIMARY KEY,
                host_fingerprint TEXT NOT NULL,
                first_seen       TEXT NOT NULL,
                last_seen        TEXT NOT NULL,
                metadata         TEXT
            )",
            "CREATE TABLE IF NOT EXISTS buyers (
                user_id          TEXT PRIMARY KEY,
                host_fingerprint TEXT NOT NULL,
                first_seen       TEXT NOT NULL,
                last_seen        TEXT NOT NULL,
                metadata         TEXT
            )",
            "CREATE TABLE IF NOT EXISTS memory_data (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                file_path    TEXT NOT NULL,
                content      TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                scanned_at   TEXT NOT NULL,
                user_id      TEXT NOT NULL,
                UNIQUE(user_id, file_path)
            )",
            "CREATE TABLE IF NOT EXISTS rentals (
                token          TEXT PRIMARY KEY,
                seller_user_id TEXT NOT NULL,
                created_at     TEXT NOT NULL,
                expires_at     TEXT,
                revoked        INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE INDEX IF NOT EXISTS idx_memory_user ON memory_data(user_id)",
        ];
        for stmt in ddl {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Bound a store future by the configured timeout; a timeout surfaces as
    /// a retryable store error.
    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Store(format!(
                "query timed out after {}s",
                self.query_timeout.as_secs()
            ))),
        }
    }

    // ─── Installation records ────────────────────────────────────────────

    pub async fn upsert_seller(&self, record: &InstallRecord) -> Result<()> {
        self.upsert_install("sellers", record).await
    }

    pub async fn upsert_buyer(&self, record: &InstallRecord) -> Result<()> {
        self.upsert_install("buyers", record).await
    }

    async fn upsert_install(&self, table: &'static str, record: &InstallRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let metadata = record.metadata.to_string();
        let sql = format!(
            "INSERT INTO {table} (user_id, host_fingerprint, first_seen, last_seen, metadata)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
               host_fingerprint = excluded.host_fingerprint,
               last_seen = MAX(last_seen, excluded.last_seen),
               metadata = excluded.metadata"
        );
        self.with_timeout(async {
            sqlx::query(&sql)
                .bind(&record.user_id)
                .bind(&record.host_fingerprint)
                .bind(&now)
                .bind(&now)
                .bind(&metadata)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await
    }

    pub async fn get_seller(&self, user_id: &str) -> Result<Option<InstallRow>> {
        self.with_timeout(async {
            Ok(sqlx::query_as("SELECT * FROM sellers WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?)
        })
        .await
    }

    pub async fn get_buyer(&self, user_id: &str) -> Result<Option<InstallRow>> {
        self.with_timeout(async {
            Ok(sqlx::query_as("SELECT * FROM buyers WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?)
        })
        .await
    }

    // ─── Cognition assets ────────────────────────────────────────────────

    /// Canonical stored path of a seller's cognition asset
    fn asset_path() -> String {
        format!("{DOCUMENT_DIR}/{DOCUMENT_FILE}")
    }

    /// Save (fully replacing) a seller's cognition asset.
    ///
    /// The replacement is a single upsert, so readers observe either the
    /// previous complete profile or the new complete profile, never a mix.
    pub async fn save_asset(&self, user_id: &str, profile: &CognitionProfile) -> Result<()> {
        let content = serde_json::to_string(profile)?;
        let content_hash = hex::encode(Sha256::digest(content.as_bytes()));
        let now = Utc::now().to_rfc3339();
        let path = Self::asset_path();

        self.with_timeout(async {
            sqlx::query(
                "INSERT INTO memory_data (file_path, content, content_hash, scanned_at, user_id)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(user_id, file_path) DO UPDATE SET
                   content = excluded.content,
                   content_hash = excluded.content_hash,
                   scanned_at = excluded.scanned_at",
            )
            .bind(&path)
            .bind(&content)
            .bind(&content_hash)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    /// Load a seller's cognition asset. `SellerNotFound` when absent.
    pub async fn get_asset(&self, user_id: &str) -> Result<CognitionProfile> {
        let row: Option<(String,)> = self
            .with_timeout(async {
                Ok(sqlx::query_as(
                    "SELECT content FROM memory_data
                     WHERE user_id = ? ORDER BY scanned_at DESC LIMIT 1",
                )
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?)
            })
            .await?;

        match row {
            Some((content,)) => Ok(serde_json::from_str(&content)?),
            None => Err(Error::SellerNotFound),
        }
    }

    /// Whether the seller has any saved asset.
    pub async fn has_asset(&self, user_id: &str) -> Result<bool> {
        self.with_timeout(async {
            let row: (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM memory_data WHERE user_id = ?")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(row.0 > 0)
        })
        .await
    }

    // ─── Rentals ─────────────────────────────────────────────────────────

    /// Persist a freshly issued rental. Token values are never re-issued;
    /// a primary-key conflict is a hard store error, not an upsert.
    pub async fn insert_rental(&self, row: &RentalRow) -> Result<()> {
        self.with_timeout(async {
            sqlx::query(
                "INSERT INTO rentals (token, seller_user_id, created_at, expires_at, revoked)
                 VALUES (?, ?, ?, ?, 0)",
            )
            .bind(&row.token)
            .bind(&row.seller_user_id)
            .bind(&row.created_at)
            .bind(&row.expires_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    /// Resolve the seller behind a rental token's opaque value.
    pub async fn get_seller_id(&self, opaque: &str) -> Result<Option<String>> {
        self.with_timeout(async {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT seller_user_id FROM rentals WHERE token = ?")
                    .bind(opaque)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row.map(|(id,)| id))
        })
        .await
    }

    pub async fn get_rental(&self, opaque: &str) -> Result<Option<RentalRow>> {
        self.with_timeout(async {
            Ok(sqlx::query_as("SELECT * FROM rentals WHERE token = ?")
                .bind(opaque)
                .fetch_optional(&self.pool)
                .await?)
        })
        .await
    }

    /// Fetch a rental together with its seller's asset content in one
    /// transaction, so validation and the subsequent read see a single
    /// consistent snapshot.
    pub async fn rental_with_asset(
        &self,
        opaque: &str,
    ) -> Result<Option<(RentalRow, Option<String>)>> {
        self.with_timeout(async {
            let mut tx = self.pool.begin().await?;
            let rental: Option<RentalRow> =
                sqlx::query_as("SELECT * FROM rentals WHERE token = ?")
                    .bind(opaque)
                    .fetch_optional(&mut *tx)
                    .await?;

            let Some(rental) = rental else {
                tx.commit().await?;
                return Ok(None);
            };

            let asset: Option<(String,)> = sqlx::query_as(
                "SELECT content FROM memory_data
                 WHERE user_id = ? ORDER BY scanned_at DESC LIMIT 1",
            )
            .bind(&rental.seller_user_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.commit().await?;

            Ok(Some((rental, asset.map(|(content,)| content))))
        })
        .await
    }

    /// Mark a rental revoked. Idempotent: revoking an unknown, expired or
    /// already-revoked token is a successful no-op.
    pub async fn revoke_rental(&self, opaque: &str) -> Result<()> {
        self.with_timeout(async {
            sqlx::query("UPDATE rentals SET revoked = 1 WHERE token = ?")
                .bind(opaque)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await
    }
}
