//! Relational item store on SQLite

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::ItemStore;
use crate::catalog::{Item, NewItem};

/// `items` table behind a connection pool
#[derive(Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open the database at `url`, creating the file and schema if missing
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        info!("Opening relational item store");

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same database.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        Self::run_migrations(&pool).await?;
        info!("Items table is ready");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                stock INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Relational item store closed");
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn list(&self) -> StoreResult<Vec<Item>> {
        let items: Vec<Item> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, stock FROM items ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    async fn create(&self, item: NewItem) -> StoreResult<Item> {
        let created: Item = sqlx::query_as(
            r#"
            INSERT INTO items (name, description, price, stock)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, description, price, stock
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.stock)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = created.id, name = %created.name, "Inserted item");
        Ok(created)
    }

    async fn update(&self, id: i64, item: NewItem) -> StoreResult<Item> {
        let updated: Option<Item> = sqlx::query_as(
            r#"
            UPDATE items SET name = ?1, description = ?2, price = ?3, stock = ?4
            WHERE id = ?5
            RETURNING id, name, description, price, stock
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.stock)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let updated = updated.ok_or_else(|| StoreError::not_found("Item", id))?;
        debug!(id, "Replaced item");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM items WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Item", id));
        }

        debug!(id, "Deleted item");
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
