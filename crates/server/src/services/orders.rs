//! The order processor: transactional placement, paginated listing,
//! cancellation with stock restoration, and administrative deletion.
//!
//! Stock is the only shared mutable resource. Every mutation goes through a
//! transaction that locks the affected item rows (`SELECT ... FOR UPDATE`),
//! so the check-then-decrement sequence cannot race with a concurrent
//! placement regardless of the database's default isolation level. Items are
//! locked in ascending id order to keep concurrent placements deadlock-free.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use shopmax_core::{ItemId, OrderId, OrderStatus, SellStatus, UserId};

use crate::db::orders::{NewOrderLine, OrderRepository};
use crate::db::{ItemRepository, RepositoryError, UserRepository};
use crate::models::order::{
    ListOrdersQuery, OrderLine, OrderPage, OrderView, Pagination, PlacedOrder,
};

/// Default page size for the order listing.
const DEFAULT_PAGE_SIZE: u32 = 5;

/// Errors produced by the order processor.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requesting user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// A requested item does not exist.
    #[error("item {item_id} not found")]
    ItemNotFound { item_id: ItemId },

    /// A requested quantity exceeds the available stock.
    #[error("item {item_id} has insufficient stock (requested {requested}, available {available})")]
    InsufficientStock {
        item_id: ItemId,
        requested: i32,
        available: i32,
    },

    /// The order does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// The order was already cancelled; a second cancellation is an error,
    /// not a no-op.
    #[error("order is already cancelled")]
    AlreadyCancelled,

    /// The order belongs to a different user.
    #[error("no permission to modify this order")]
    NotOwner,

    /// Placement requires at least one line.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// The same item appears in more than one line. Duplicates are rejected
    /// rather than silently merged.
    #[error("item {item_id} appears more than once in the order")]
    DuplicateItem { item_id: ItemId },

    /// A line's quantity is zero or negative.
    #[error("invalid count for item {item_id}")]
    InvalidCount { item_id: ItemId },

    /// `price * count` (or the order total) does not fit in an `i64`.
    #[error("order total overflows for item {item_id}")]
    PriceOverflow { item_id: ItemId },

    /// Underlying storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The order processor.
///
/// Explicitly constructed with a pool reference; owns no global state.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: create the header, decrement stock per line, and
    /// record the line items with price snapshots, all in one transaction.
    ///
    /// On success returns the new order id and the total price, computed from
    /// pre-decrement item prices. On any failure the transaction rolls back
    /// and no stock change, order, or line item is persisted.
    ///
    /// # Errors
    ///
    /// Returns `EmptyOrder`, `DuplicateItem`, or `InvalidCount` for invalid
    /// input; `UserNotFound`, `ItemNotFound`, or `InsufficientStock` when a
    /// precondition fails; `Repository` for storage errors.
    pub async fn place_order(
        &self,
        user_id: UserId,
        lines: &[OrderLine],
    ) -> Result<PlacedOrder, OrderError> {
        validate_lines(lines)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        if !UserRepository::exists(&mut *tx, user_id).await? {
            return Err(OrderError::UserNotFound);
        }

        let order = OrderRepository::insert(&mut *tx, user_id, Utc::now()).await?;

        // Lock items in ascending id order so two concurrent placements can
        // never hold each other's locks.
        let mut indexed: Vec<(usize, OrderLine)> =
            lines.iter().copied().enumerate().collect();
        indexed.sort_by_key(|(_, line)| line.item_id);

        let mut new_lines: Vec<Option<NewOrderLine>> = vec![None; lines.len()];
        let mut total_price: i64 = 0;

        for (index, line) in indexed {
            let item = ItemRepository::find_for_update(&mut *tx, line.item_id)
                .await?
                .ok_or(OrderError::ItemNotFound {
                    item_id: line.item_id,
                })?;

            if line.count > item.stock_number {
                return Err(OrderError::InsufficientStock {
                    item_id: line.item_id,
                    requested: line.count,
                    available: item.stock_number,
                });
            }

            let remaining = item.stock_number - line.count;
            let sell_status = if remaining == 0 {
                SellStatus::SoldOut
            } else {
                SellStatus::Sell
            };
            ItemRepository::update_stock(&mut *tx, item.id, remaining, sell_status).await?;

            let order_price = line_price(item.price, line.count, line.item_id)?;
            total_price = total_price
                .checked_add(order_price)
                .ok_or(OrderError::PriceOverflow {
                    item_id: line.item_id,
                })?;
            new_lines[index] = Some(NewOrderLine {
                item_id: line.item_id,
                count: line.count,
                order_price,
            });
        }

        let new_lines: Vec<NewOrderLine> = new_lines.into_iter().flatten().collect();
        OrderRepository::insert_lines(&mut *tx, order.id, &new_lines).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            lines = new_lines.len(),
            total_price,
            "order placed"
        );

        Ok(PlacedOrder {
            order_id: order.id,
            total_price,
        })
    }

    /// List a user's orders, newest first, with enriched line items and a
    /// pagination block.
    ///
    /// The date filter applies only when both bounds are present and covers
    /// the entire end day (up to 23:59:59).
    ///
    /// # Errors
    ///
    /// Returns `Repository` for storage errors.
    pub async fn list_orders(
        &self,
        user_id: UserId,
        query: &ListOrdersQuery,
    ) -> Result<OrderPage, OrderError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let offset = i64::from(page - 1) * i64::from(limit);
        let range = date_range(query.start_date, query.end_date);

        let repo = OrderRepository::new(self.pool);
        let count = repo.count_for_user(user_id, range).await?;
        let orders = repo
            .page_for_user(user_id, range, i64::from(limit), offset)
            .await?;

        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let mut lines_by_order: HashMap<OrderId, Vec<_>> = HashMap::new();
        for line in repo.line_views(&ids).await? {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }

        let orders = orders
            .into_iter()
            .map(|order| OrderView {
                id: order.id,
                order_date: order.order_date,
                status: order.status,
                items: lines_by_order.remove(&order.id).unwrap_or_default(),
            })
            .collect();

        Ok(OrderPage {
            orders,
            pagination: Pagination {
                total_order: count,
                total_pages: total_pages(count, limit),
                current_page: page,
                limit,
            },
        })
    }

    /// Cancel an order: restore each line's stock and flip the status to
    /// CANCEL, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order does not exist, `NotOwner` when
    /// `requester` is set and does not match the order's owner, and
    /// `AlreadyCancelled` if it was cancelled before; `Repository` for
    /// storage errors. Any failure rolls back all restorations.
    pub async fn cancel_order(
        &self,
        order_id: OrderId,
        requester: Option<UserId>,
    ) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = OrderRepository::find_for_update(&mut *tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if requester.is_some_and(|user_id| order.user_id != user_id) {
            return Err(OrderError::NotOwner);
        }

        if order.status == OrderStatus::Cancel {
            return Err(OrderError::AlreadyCancelled);
        }

        let mut lines = OrderRepository::stored_lines(&mut *tx, order_id).await?;
        lines.sort_by_key(|line| line.item_id);
        for line in lines {
            ItemRepository::restore_stock(&mut *tx, line.item_id, line.count).await?;
        }

        OrderRepository::set_status(&mut *tx, order_id, OrderStatus::Cancel).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(order_id = %order_id, "order cancelled");

        Ok(())
    }

    /// Hard-delete an order; line items are removed by the cascade rule.
    ///
    /// Deliberately does not restore stock: deletion is an administrative
    /// cleanup, not a cancellation.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order does not exist; `Repository` for
    /// storage errors.
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), OrderError> {
        let deleted = OrderRepository::new(self.pool).delete(order_id).await?;
        if !deleted {
            return Err(OrderError::OrderNotFound);
        }

        tracing::info!(order_id = %order_id, "order deleted");

        Ok(())
    }
}

/// Validate placement lines before touching the database: the list must be
/// non-empty, quantities positive, and item ids unique.
fn validate_lines(lines: &[OrderLine]) -> Result<(), OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    let mut seen = std::collections::HashSet::new();
    for line in lines {
        if line.count <= 0 {
            return Err(OrderError::InvalidCount {
                item_id: line.item_id,
            });
        }
        if !seen.insert(line.item_id) {
            return Err(OrderError::DuplicateItem {
                item_id: line.item_id,
            });
        }
    }

    Ok(())
}

/// Price snapshot for one line: `price * count`, overflow-checked.
fn line_price(price: i64, count: i32, item_id: ItemId) -> Result<i64, OrderError> {
    price
        .checked_mul(i64::from(count))
        .ok_or(OrderError::PriceOverflow { item_id })
}

/// Total page count: `ceil(count / limit)`.
fn total_pages(count: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    (count + limit - 1) / limit
}

/// Build the inclusive timestamp range for a date filter.
///
/// Only applies when both bounds are present; the end bound is pushed to the
/// last second of its day so orders placed on the end date are included.
fn date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, end) = start.zip(end)?;
    let day_end = NaiveTime::from_hms_opt(23, 59, 59).expect("valid time");
    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(day_end).and_utc(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(item_id: i32, count: i32) -> OrderLine {
        OrderLine {
            item_id: ItemId::new(item_id),
            count,
        }
    }

    #[test]
    fn test_validate_lines_ok() {
        assert!(validate_lines(&[line(1, 2), line(2, 1)]).is_ok());
    }

    #[test]
    fn test_validate_lines_empty() {
        assert!(matches!(validate_lines(&[]), Err(OrderError::EmptyOrder)));
    }

    #[test]
    fn test_validate_lines_duplicate() {
        let err = validate_lines(&[line(1, 2), line(1, 1)]).unwrap_err();
        assert!(matches!(
            err,
            OrderError::DuplicateItem { item_id } if item_id == ItemId::new(1)
        ));
    }

    #[test]
    fn test_validate_lines_bad_count() {
        assert!(matches!(
            validate_lines(&[line(1, 0)]),
            Err(OrderError::InvalidCount { .. })
        ));
        assert!(matches!(
            validate_lines(&[line(1, -3)]),
            Err(OrderError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_line_price_overflow_is_an_error() {
        assert_eq!(line_price(100, 3, ItemId::new(1)).unwrap(), 300);
        assert!(matches!(
            line_price(i64::MAX, 2, ItemId::new(7)),
            Err(OrderError::PriceOverflow { item_id }) if item_id == ItemId::new(7)
        ));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        assert!(date_range(Some(date), None).is_none());
        assert!(date_range(None, Some(date)).is_none());
        assert!(date_range(None, None).is_none());
    }

    #[test]
    fn test_date_range_covers_end_day() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        let (lo, hi) = date_range(Some(start), Some(end)).unwrap();
        assert_eq!(lo.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(hi.to_rfc3339(), "2025-01-16T23:59:59+00:00");
    }

    #[test]
    fn test_insufficient_stock_message_carries_ids() {
        let err = OrderError::InsufficientStock {
            item_id: ItemId::new(7),
            requested: 3,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("requested 3"));
        assert!(msg.contains("available 2"));
    }
}
