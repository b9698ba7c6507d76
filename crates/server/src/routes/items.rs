//! Item catalog route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Serialize;

use shopmax_core::ItemId;

use crate::db::items::ItemRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::item::{CreateItemInput, ItemDetail, ItemFilter, ItemSummary};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Build the item router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/item", get(list_items).post(create_item))
        .route("/item/{id}", get(get_item).delete(delete_item))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemPagination {
    total_items: i64,
    total_pages: i64,
    current_page: u32,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct ListItemsResponse {
    success: bool,
    message: String,
    items: Vec<ItemSummary>,
    pagination: ItemPagination,
}

#[derive(Debug, Serialize)]
struct ItemDetailResponse {
    success: bool,
    message: String,
    item: ItemDetail,
}

#[derive(Debug, Serialize)]
struct AckResponse {
    success: bool,
    message: String,
}

/// List items with optional search and sell-status filters, newest first.
///
/// GET /item?page=&limit=&searchTerm=&searchCategory=&sellCategory=
async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<ListItemsResponse>, AppError> {
    let page = filter.page.unwrap_or(1).max(1);
    let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let offset = i64::from(page - 1) * i64::from(limit);

    let repo = ItemRepository::new(state.pool());
    let count = repo.count(&filter).await?;
    let items = repo.list(&filter, i64::from(limit), offset).await?;

    let total_pages = (count + i64::from(limit) - 1) / i64::from(limit);

    Ok(Json(ListItemsResponse {
        success: true,
        message: "items fetched".to_string(),
        items,
        pagination: ItemPagination {
            total_items: count,
            total_pages,
            current_page: page,
            limit,
        },
    }))
}

/// Get an item with all of its images.
///
/// GET /item/{id}
async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<ItemDetailResponse>, AppError> {
    let item = ItemRepository::new(state.pool())
        .get_detail(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {item_id}")))?;

    Ok(Json(ItemDetailResponse {
        success: true,
        message: "item fetched".to_string(),
        item,
    }))
}

/// Create an item with its images (admin only). The first image URL becomes
/// the representative image.
///
/// POST /item
async fn create_item(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<ItemDetailResponse>), AppError> {
    validate_item_input(&input)?;

    let item = ItemRepository::new(state.pool())
        .create_with_images(&input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemDetailResponse {
            success: true,
            message: "item created".to_string(),
            item,
        }),
    ))
}

/// Delete an item (admin only); images go via cascade.
///
/// DELETE /item/{id}
async fn delete_item(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(item_id): Path<ItemId>,
) -> Result<Json<AckResponse>, AppError> {
    let deleted = ItemRepository::new(state.pool()).delete(item_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("item {item_id}")));
    }

    Ok(Json(AckResponse {
        success: true,
        message: "item deleted".to_string(),
    }))
}

fn validate_item_input(input: &CreateItemInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("item name is required".to_string()));
    }
    if input.price < 0 {
        return Err(AppError::BadRequest(
            "item price must not be negative".to_string(),
        ));
    }
    if input.stock_number < 0 {
        return Err(AppError::BadRequest(
            "stock number must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: i64, stock: i32) -> CreateItemInput {
        CreateItemInput {
            name: name.to_string(),
            price,
            stock_number: stock,
            detail: String::new(),
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn test_validate_item_input_ok() {
        assert!(validate_item_input(&input("Widget", 1000, 5)).is_ok());
    }

    #[test]
    fn test_validate_item_input_rejects_blank_name() {
        assert!(validate_item_input(&input("   ", 1000, 5)).is_err());
    }

    #[test]
    fn test_validate_item_input_rejects_negative_price() {
        assert!(validate_item_input(&input("Widget", -1, 5)).is_err());
    }

    #[test]
    fn test_validate_item_input_rejects_negative_stock() {
        assert!(validate_item_input(&input("Widget", 1000, -1)).is_err());
    }
}
