//! SQLite order repository implementation.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use guriri_core::repository::order::OrderRepository;
use guriri_types::error::RepositoryError;
use guriri_types::order::Order;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `OrderRepository` (table `pedidos`).
pub struct SqliteOrderRepository {
    pool: DatabasePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Look up a single order by id.
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, cliente, coleta, entrega, obs, created_at FROM pedidos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let order_row =
                    OrderRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(order_row.into_order()?))
            }
            None => Ok(None),
        }
    }
}

struct OrderRow {
    id: String,
    cliente: Option<String>,
    coleta: Option<String>,
    entrega: Option<String>,
    obs: Option<String>,
    created_at: String,
}

impl OrderRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            cliente: row.try_get("cliente")?,
            coleta: row.try_get("coleta")?,
            entrega: row.try_get("entrega")?,
            obs: row.try_get("obs")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_order(self) -> Result<Order, RepositoryError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;
        Ok(Order {
            id: self.id,
            cliente: self.cliente,
            coleta: self.coleta,
            entrega: self.entrega,
            obs: self.obs,
            created_at,
        })
    }
}

impl OrderRepository for SqliteOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO pedidos (id, cliente, coleta, entrega, obs, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.id)
        .bind(&order.cliente)
        .bind(&order.coleta)
        .bind(&order.entrega)
        .bind(&order.obs)
        .bind(order.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("order '{}' already exists", order.id))
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;
        Ok(())
    }

    async fn count_orders(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM pedidos")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        row.try_get("count")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}
