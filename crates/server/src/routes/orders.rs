//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Serialize;

use shopmax_core::{OrderId, UserRole};

use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::order::{ListOrdersQuery, OrderView, Pagination, PlaceOrderRequest};
use crate::services::OrderService;
use crate::state::AppState;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(place_order))
        .route("/order/list", get(list_orders))
        .route("/order/cancel/{id}", post(cancel_order))
        .route("/order/delete/{id}", delete(delete_order))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderResponse {
    success: bool,
    message: String,
    order_id: OrderId,
    total_price: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOrdersResponse {
    success: bool,
    message: String,
    orders: Vec<OrderView>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct AckResponse {
    success: bool,
    message: String,
}

/// Place an order.
///
/// POST /order
async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), AppError> {
    let placed = OrderService::new(state.pool())
        .place_order(user.id, &body.items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            message: "order placed".to_string(),
            order_id: placed.order_id,
            total_price: placed.total_price,
        }),
    ))
}

/// List the current user's orders, newest first.
///
/// GET /order/list?page=&limit=&startDate=&endDate=
async fn list_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListOrdersResponse>, AppError> {
    let page = OrderService::new(state.pool())
        .list_orders(user.id, &query)
        .await?;

    Ok(Json(ListOrdersResponse {
        success: true,
        message: "orders fetched".to_string(),
        orders: page.orders,
        pagination: page.pagination,
    }))
}

/// Cancel an order and restore its stock.
///
/// Admins may cancel any order; regular users only their own.
///
/// POST /order/cancel/{id}
async fn cancel_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<AckResponse>, AppError> {
    let requester = (user.role != UserRole::Admin).then_some(user.id);
    OrderService::new(state.pool())
        .cancel_order(order_id, requester)
        .await?;

    Ok(Json(AckResponse {
        success: true,
        message: "order cancelled".to_string(),
    }))
}

/// Hard-delete an order (admin only). Line items go via cascade; stock is not
/// restored.
///
/// DELETE /order/delete/{id}
async fn delete_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
) -> Result<Json<AckResponse>, AppError> {
    OrderService::new(state.pool()).delete_order(order_id).await?;

    Ok(Json(AckResponse {
        success: true,
        message: "order deleted".to_string(),
    }))
}
