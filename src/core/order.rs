//! Order business logic - Creating, reading and removing orders.
//!
//! Line items are added through [`crate::core::order_item::add_item`].

use crate::{
    entities::{Client, Order, OrderItem, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Opens a new, empty order for an existing client.
///
/// # Errors
/// Returns `Error::ClientNotFound` if the client does not exist, or a
/// database error if the insert fails.
#[instrument(skip(db))]
pub async fn create_order(db: &DatabaseConnection, client_id: i32) -> Result<order::Model> {
    Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let order = order::ActiveModel {
        client_id: Set(client_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let order = order.insert(db).await?;
    info!("Created order {} for client {}", order.id, client_id);
    Ok(order)
}

/// Retrieves an order by its ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the line items of an order in insertion order.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_order_items(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<Vec<order_item::Model>> {
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes an order and all of its line items.
///
/// Stock consumed by the items is not returned to the products.
///
/// # Returns
/// The number of line items removed.
///
/// # Errors
/// Returns `Error::OrderNotFound` if the order does not exist, or a database
/// error if any step fails.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i32) -> Result<u64> {
    let txn = db.begin().await?;

    Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let items = OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    Order::delete_by_id(order_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted order {} with {} items",
        order_id, items.rows_affected
    );
    Ok(items.rows_affected)
}
