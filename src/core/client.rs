//! Client business logic.
//!
//! Deleting a client takes its orders and their line items with it.

use crate::{
    entities::{Client, Order, OrderItem, client, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Creates a client.
///
/// Blank addresses are stored as `NULL`.
///
/// # Errors
/// Returns an error if the name is empty or the database insert fails.
#[instrument(skip(db, address))]
pub async fn create_client(
    db: &DatabaseConnection,
    name: String,
    address: Option<String>,
) -> Result<client::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let address = address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    let client = client::ActiveModel {
        name: Set(name.trim().to_string()),
        address: Set(address),
        ..Default::default()
    };
    client.insert(db).await.map_err(Into::into)
}

/// Retrieves a client by its ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a client, every order it placed and the items of those orders.
///
/// # Returns
/// The number of orders removed along with the client.
///
/// # Errors
/// Returns `Error::ClientNotFound` if the client does not exist, or a
/// database error if any step fails.
#[instrument(skip(db))]
pub async fn delete_client(db: &DatabaseConnection, client_id: i32) -> Result<u64> {
    let txn = db.begin().await?;

    Client::find_by_id(client_id)
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let order_ids: Vec<i32> = Order::find()
        .select_only()
        .column(order::Column::Id)
        .filter(order::Column::ClientId.eq(client_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let items = OrderItem::delete_many()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .exec(&txn)
        .await?;
    let orders = Order::delete_many()
        .filter(order::Column::ClientId.eq(client_id))
        .exec(&txn)
        .await?;
    Client::delete_by_id(client_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted client {} with {} orders and {} order items",
        client_id, orders.rows_affected, items.rows_affected
    );
    Ok(orders.rows_affected)
}
