//! Item catalog domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopmax_core::{ImageId, ItemId, SellStatus};

/// A sellable item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Price in the integer currency unit (won).
    pub price: i64,
    /// Available stock; never negative after a committed operation.
    pub stock_number: i32,
    /// Whether the item is on sale or sold out.
    pub sell_status: SellStatus,
    /// Long-form description.
    pub detail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image metadata attached to an item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemImage {
    pub id: ImageId,
    pub item_id: ItemId,
    /// Original file name as uploaded.
    pub origin_name: String,
    /// Public URL of the image.
    pub url: String,
    /// Whether this is the item's representative image.
    pub representative: bool,
}

/// An item with its representative image, as shown in listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    #[serde(flatten)]
    pub item: Item,
    /// Representative image URL, if any.
    pub image_url: Option<String>,
}

/// An item with all of its images, as shown on the detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub images: Vec<ItemImage>,
}

/// Input for creating a new item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    pub name: String,
    pub price: i64,
    pub stock_number: i32,
    #[serde(default)]
    pub detail: String,
    /// Image URLs; the first one becomes the representative image.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Which item column a search term applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchCategory {
    #[default]
    #[serde(rename = "itemNm")]
    Name,
    #[serde(rename = "itemDetail")]
    Detail,
}

/// Filter for the item listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Substring to search for.
    pub search_term: Option<String>,
    /// Column the search term applies to (name by default).
    #[serde(default)]
    pub search_category: SearchCategory,
    /// Restrict to a sell status (SELL or SOLD_OUT).
    pub sell_category: Option<SellStatus>,
}
