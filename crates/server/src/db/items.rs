//! Item repository for database operations.
//!
//! Stock mutations happen inside order transactions; the helpers that take a
//! `PgConnection` are meant to be called with an open transaction so that the
//! row lock and the later write share the same unit of work.

use sqlx::{PgConnection, PgPool};

use shopmax_core::{ItemId, SellStatus};

use super::RepositoryError;
use crate::models::item::{
    CreateItemInput, Item, ItemDetail, ItemFilter, ItemImage, ItemSummary, SearchCategory,
};

const ITEM_COLUMNS: &str = "id, name, price, stock_number, sell_status, detail, \
                            created_at, updated_at";

/// Internal row type for the item listing (item + representative image).
#[derive(Debug, sqlx::FromRow)]
struct ItemSummaryRow {
    #[sqlx(flatten)]
    item: Item,
    image_url: Option<String>,
}

impl From<ItemSummaryRow> for ItemSummary {
    fn from(row: ItemSummaryRow) -> Self {
        Self {
            item: row.item,
            image_url: row.image_url,
        }
    }
}

/// A minimal projection of an item row locked for a stock mutation.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct LockedItem {
    pub id: ItemId,
    pub price: i64,
    pub stock_number: i32,
}

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count items matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ItemFilter) -> Result<i64, RepositoryError> {
        let search_detail = filter.search_category == SearchCategory::Detail;

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM items \
             WHERE ($1::text IS NULL \
                    OR (CASE WHEN $2 THEN detail ELSE name END) ILIKE '%' || $1 || '%') \
               AND ($3::sell_status IS NULL OR sell_status = $3)",
        )
        .bind(filter.search_term.as_deref())
        .bind(search_detail)
        .bind(filter.sell_category)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// List items matching a filter, newest first, with their representative
    /// images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ItemFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItemSummary>, RepositoryError> {
        let search_detail = filter.search_category == SearchCategory::Detail;

        let rows = sqlx::query_as::<_, ItemSummaryRow>(
            "SELECT i.id, i.name, i.price, i.stock_number, i.sell_status, i.detail, \
                    i.created_at, i.updated_at, img.url AS image_url \
             FROM items i \
             LEFT JOIN item_images img ON img.item_id = i.id AND img.representative \
             WHERE ($1::text IS NULL \
                    OR (CASE WHEN $2 THEN i.detail ELSE i.name END) ILIKE '%' || $1 || '%') \
               AND ($3::sell_status IS NULL OR i.sell_status = $3) \
             ORDER BY i.created_at DESC \
             LIMIT $4 OFFSET $5",
        )
        .bind(filter.search_term.as_deref())
        .bind(search_detail)
        .bind(filter.sell_category)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an item with all of its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_detail(&self, id: ItemId) -> Result<Option<ItemDetail>, RepositoryError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(item) = item else {
            return Ok(None);
        };

        let images = sqlx::query_as::<_, ItemImage>(
            "SELECT id, item_id, origin_name, url, representative \
             FROM item_images WHERE item_id = $1 \
             ORDER BY representative DESC, id ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(ItemDetail { item, images }))
    }

    /// Create an item together with its images, in one transaction.
    ///
    /// The first image URL becomes the representative image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// persisted in that case.
    pub async fn create_with_images(
        &self,
        input: &CreateItemInput,
    ) -> Result<ItemDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (name, price, stock_number, detail, sell_status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock_number)
        .bind(&input.detail)
        .bind(if input.stock_number > 0 {
            SellStatus::Sell
        } else {
            SellStatus::SoldOut
        })
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::with_capacity(input.image_urls.len());
        for (index, url) in input.image_urls.iter().enumerate() {
            let image = sqlx::query_as::<_, ItemImage>(
                "INSERT INTO item_images (item_id, origin_name, url, representative) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, item_id, origin_name, url, representative",
            )
            .bind(item.id)
            .bind(url.rsplit('/').next().unwrap_or(url))
            .bind(url)
            .bind(index == 0)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image);
        }

        tx.commit().await?;

        Ok(ItemDetail { item, images })
    }

    /// Delete an item; its images go via cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Transactional stock operations
    // =========================================================================

    /// Lock an item row for a stock mutation (`SELECT ... FOR UPDATE`).
    ///
    /// The lock is held until the surrounding transaction commits or rolls
    /// back, which closes the race between the stock check and the stock
    /// write under concurrent placements.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: ItemId,
    ) -> Result<Option<LockedItem>, RepositoryError> {
        let row = sqlx::query_as::<_, LockedItem>(
            "SELECT id, price, stock_number FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row)
    }

    /// Write a new absolute stock level for a previously locked item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_stock(
        conn: &mut PgConnection,
        id: ItemId,
        stock_number: i32,
        sell_status: SellStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE items SET stock_number = $2, sell_status = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(stock_number)
        .bind(sell_status)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Add `count` back to an item's stock (cancellation path).
    ///
    /// Restored stock is always positive, so the item goes back on sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn restore_stock(
        conn: &mut PgConnection,
        id: ItemId,
        count: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE items \
             SET stock_number = stock_number + $2, sell_status = 'sell', updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(count)
        .execute(conn)
        .await?;

        Ok(())
    }
}
