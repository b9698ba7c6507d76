//! Order domain types and request/response payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shopmax_core::{ItemId, OrderId, OrderStatus, UserId};

/// An order header.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// One requested line of an order placement: buy `count` of `item_id`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: ItemId,
    pub count: i32,
}

/// Request body for order placement.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLine>,
}

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: OrderId,
    /// Sum of `price * count` over all lines, at pre-decrement prices.
    pub total_price: i64,
}

/// A line item of an existing order, enriched for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    #[serde(skip)]
    pub order_id: OrderId,
    pub item_id: ItemId,
    /// Item name at read time.
    pub name: String,
    /// Current item price (the charged price is `order_price`).
    pub price: i64,
    /// Quantity purchased.
    pub count: i32,
    /// Price charged at purchase time (snapshot).
    pub order_price: i64,
    /// Representative image URL, if the item has one.
    pub image_url: Option<String>,
}

/// An order with its enriched line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderLineView>,
}

/// Query parameters for the order listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Inclusive start of the date range (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the date range (YYYY-MM-DD); the filter covers the
    /// whole end day, up to 23:59:59.
    pub end_date: Option<NaiveDate>,
}

/// Pagination block returned alongside the order listing.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching orders.
    pub total_order: i64,
    /// `ceil(total_order / limit)`.
    pub total_pages: i64,
    pub current_page: u32,
    pub limit: u32,
}

/// One page of a user's orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub orders: Vec<OrderView>,
    pub pagination: Pagination,
}
