//! `POST /orders/{order_id}/add_item/`

use super::AppState;
use crate::{core::order_item, errors::Result};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

/// Message returned with every successful addition.
pub const ITEM_ADDED_MESSAGE: &str = "Product added to order";

/// Request body for adding a product to an order.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddItemRequest {
    /// Product to add
    pub product_id: i32,
    /// Units to add
    pub quantity: i32,
}

/// Response body for a successful addition.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AddItemResponse {
    /// Confirmation text
    pub message: String,
    /// Order the product was added to
    pub order_id: i32,
    /// Product that was added
    pub product_id: i32,
    /// Total units of the product now on the order
    pub quantity: i32,
}

/// Adds a product to an order, merging with an existing line.
pub async fn add_item_to_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<AddItemResponse>> {
    let line = order_item::add_item(
        &state.database,
        order_id,
        request.product_id,
        request.quantity,
    )
    .await?;

    Ok(Json(AddItemResponse {
        message: ITEM_ADDED_MESSAGE.to_string(),
        order_id: line.order_id,
        product_id: line.product_id,
        quantity: line.quantity,
    }))
}
