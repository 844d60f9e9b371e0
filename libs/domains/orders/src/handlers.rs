use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{AuthUser, ErrorResponse, IdPath, MessageResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{Order, OrderItem, OrderLine, OrderStatus, PlaceOrder, UpdateOrderStatus};
use crate::repository::OrderRepository;
use crate::service::OrderService;

pub const TAG: &str = "orders";

/// OpenAPI documentation for Orders API
#[derive(OpenApi)]
#[openapi(
    paths(place_order, list_orders, get_order, cancel_order, update_order_status),
    components(schemas(
        Order,
        OrderItem,
        OrderLine,
        OrderStatus,
        PlaceOrder,
        UpdateOrderStatus,
        MessageResponse,
        ErrorResponse
    )),
    tags((name = TAG, description = "Order placement and lifecycle"))
)]
pub struct ApiDoc;

/// Routes for any authenticated user. Handlers read the caller from
/// [`AuthUser`], so `require_auth` must run in front of this router.
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/cancel", put(cancel_order))
        .with_state(Arc::new(service))
}

/// `PUT /orders/{id}/status`, to be placed behind `require_admin`
pub fn admin_router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/orders/{id}/status", put(update_order_status))
        .with_state(Arc::new(service))
}

/// Place an order for the caller
#[utoipa::path(
    post,
    path = "/orders",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = PlaceOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Invalid input or insufficient stock", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn place_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    caller: AuthUser,
    ValidatedJson(input): ValidatedJson<PlaceOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.place_order(caller, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders owned by the caller", body = Vec<Order>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    caller: AuthUser,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_orders(caller).await?;
    Ok(Json(orders))
}

/// Get one of the caller's orders (any order for admins)
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    caller: AuthUser,
    IdPath(id): IdPath,
) -> OrderResult<Json<Order>> {
    let order = service.get_order(caller, id).await?;
    Ok(Json(order))
}

/// Cancel a pending order
#[utoipa::path(
    put,
    path = "/orders/{id}/cancel",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = MessageResponse),
        (status = 400, description = "Order is not pending", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the order", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn cancel_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    caller: AuthUser,
    IdPath(id): IdPath,
) -> OrderResult<Json<MessageResponse>> {
    service.cancel_order(caller, id).await?;
    Ok(Json(MessageResponse::new("Order cancelled successfully")))
}

/// Set an order's status (admin)
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderStatus,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn update_order_status<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderStatus>,
) -> OrderResult<Json<Order>> {
    let order = service.update_status(id, &input.status).await?;
    Ok(Json(order))
}
