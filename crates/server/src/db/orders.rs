//! Order repository for database operations.
//!
//! Placement and cancellation are multi-statement transactions driven by
//! [`crate::services::orders::OrderService`]; the repository exposes the
//! individual statements against an open `PgConnection` plus plain pool
//! queries for the read side.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, QueryBuilder};

use shopmax_core::{ItemId, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderLineView};

/// A line item ready to be inserted for a new order.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderLine {
    pub item_id: ItemId,
    pub count: i32,
    /// Price snapshot: `item.price * count` at placement time.
    pub order_price: i64,
}

/// A stored line item as needed for stock restoration.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StoredLine {
    pub item_id: ItemId,
    pub count: i32,
}

const ORDER_COLUMNS: &str = "id, user_id, order_date, status";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Transactional operations
    // =========================================================================

    /// Insert an order header inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: UserId,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, order_date, status) \
             VALUES ($1, $2, 'order') \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(order_date)
        .fetch_one(conn)
        .await?;

        Ok(order)
    }

    /// Batch-insert the line items of a new order.
    ///
    /// The parent order row must already exist in the same transaction
    /// (foreign-key ordering).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_lines(
        conn: &mut PgConnection,
        order_id: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<(), RepositoryError> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("INSERT INTO order_items (order_id, item_id, count, order_price) ");
        builder.push_values(lines, |mut b, line| {
            b.push_bind(order_id)
                .push_bind(line.item_id)
                .push_bind(line.count)
                .push_bind(line.order_price);
        });
        builder.build().execute(conn).await?;

        Ok(())
    }

    /// Lock an order row for a status transition (`SELECT ... FOR UPDATE`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    /// Fetch the stored line items of an order inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stored_lines(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Vec<StoredLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, StoredLine>(
            "SELECT item_id, count FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }

    /// Update an order's status inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Read side
    // =========================================================================

    /// Count a user's orders, optionally within an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(
        &self,
        user_id: UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR order_date BETWEEN $2 AND $3)",
        )
        .bind(user_id)
        .bind(range.map(|r| r.0))
        .bind(range.map(|r| r.1))
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Fetch one page of a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page_for_user(
        &self,
        user_id: UserId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR order_date BETWEEN $2 AND $3) \
             ORDER BY order_date DESC \
             LIMIT $4 OFFSET $5"
        ))
        .bind(user_id)
        .bind(range.map(|r| r.0))
        .bind(range.map(|r| r.1))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Fetch the enriched line items for a set of orders: item id, name and
    /// current price, the purchased count, the charged price snapshot, and
    /// the item's representative image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn line_views(
        &self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderLineView>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = order_ids.iter().map(|id| id.as_i32()).collect();

        let lines = sqlx::query_as::<_, OrderLineView>(
            "SELECT oi.order_id, oi.item_id, i.name, i.price, oi.count, oi.order_price, \
                    img.url AS image_url \
             FROM order_items oi \
             JOIN items i ON i.id = oi.item_id \
             LEFT JOIN item_images img ON img.item_id = i.id AND img.representative \
             WHERE oi.order_id = ANY($1) \
             ORDER BY oi.id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Hard-delete an order; line items go via cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
