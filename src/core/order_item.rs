//! Adding products to orders.
//!
//! [`add_item`] is the only operation that consumes stock. It checks the
//! request, then inside one transaction merges the quantity into the order's
//! existing line for the product (or creates the line with the product's
//! current price) and takes the units out of stock.
//!
//! Concurrent calls for the same product serialize on the product row: it is
//! read with `SELECT ... FOR UPDATE` where the backend supports row locks, and
//! the stock decrement is a conditional `UPDATE` that refuses to go past the
//! stock rule even if two callers saw the same quantity.

use crate::{
    entities::{Order, OrderItem, Product, order_item, product},
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseTransaction, QuerySelect, Select, Set,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// State of an order line after an addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderItemView {
    /// Order the line belongs to
    pub order_id: i32,
    /// Product on the line
    pub product_id: i32,
    /// Total units on the line
    pub quantity: i32,
    /// Unit price captured when the line was created
    pub price: Decimal,
}

impl From<order_item::Model> for OrderItemView {
    fn from(item: order_item::Model) -> Self {
        Self {
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Whether `available` units cover a request for `requested` units.
///
/// Stock has to stay strictly above the request, so the last unit of a
/// product is never handed out.
#[must_use]
pub const fn has_stock_for(available: i32, requested: i32) -> bool {
    available > requested
}

/// Adds `quantity` units of a product to an order.
///
/// If the order already has a line for the product its quantity grows;
/// otherwise a new line is created at the product's current price. The
/// product's stock drops by `quantity` in the same transaction.
///
/// # Errors
/// Checked in this order:
/// - `Error::InvalidQuantity` if `quantity <= 0` (no database access)
/// - `Error::OrderNotFound` if the order does not exist
/// - `Error::ProductNotFound` if the product does not exist
/// - `Error::InsufficientStock` if stock is not strictly greater than `quantity`
///
/// Storage failures surface as `Error::Database`. Nothing is written unless
/// the call succeeds.
#[instrument(skip(db))]
pub async fn add_item(
    db: &DatabaseConnection,
    order_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<OrderItemView> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;
    let view = match upsert_line(&txn, order_id, product_id, quantity).await {
        Ok(view) => view,
        Err(e) => {
            if let Err(rollback_error) = txn.rollback().await {
                warn!("Rollback after failed add_item also failed: {}", rollback_error);
            }
            return Err(e);
        }
    };
    txn.commit().await?;

    info!(
        "Added {} x product {} to order {} (line total {})",
        quantity, product_id, order_id, view.quantity
    );
    Ok(view)
}

/// Adds `FOR UPDATE` on backends with row locks. `SQLite` serializes writers
/// at the database level instead.
fn for_update<E: EntityTrait>(select: Select<E>, backend: DatabaseBackend) -> Select<E> {
    match backend {
        DatabaseBackend::Sqlite => select,
        _ => select.lock_exclusive(),
    }
}

/// Runs the checks and writes of [`add_item`] inside `txn`.
///
/// Returns the line as it stands once the transaction commits. The line row
/// is locked for the whole transaction, so its merged quantity is known
/// without reading it back.
async fn upsert_line(
    txn: &DatabaseTransaction,
    order_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<OrderItemView> {
    Order::find_by_id(order_id)
        .one(txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let backend = txn.get_database_backend();
    let product = for_update(Product::find_by_id(product_id), backend)
        .one(txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if !has_stock_for(product.quantity, quantity) {
        return Err(Error::InsufficientStock {
            available: product.quantity,
            requested: quantity,
        });
    }

    let existing = for_update(OrderItem::find(), backend)
        .filter(order_item::Column::OrderId.eq(order_id))
        .filter(order_item::Column::ProductId.eq(product_id))
        .one(txn)
        .await?;

    let view = if let Some(item) = existing {
        debug!("Merging into existing line {}", item.id);
        OrderItem::update_many()
            .col_expr(
                order_item::Column::Quantity,
                Expr::col(order_item::Column::Quantity).add(quantity),
            )
            .filter(order_item::Column::Id.eq(item.id))
            .exec(txn)
            .await?;
        OrderItemView {
            quantity: item.quantity + quantity,
            ..item.into()
        }
    } else {
        let line = order_item::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(product.price),
            ..Default::default()
        };
        let line = line.insert(txn).await?;
        debug!("Created line {} at price {}", line.id, line.price);
        line.into()
    };

    // Guarded decrement: matches no row if stock moved under us.
    let decremented = Product::update_many()
        .col_expr(
            product::Column::Quantity,
            Expr::col(product::Column::Quantity).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Quantity.gt(quantity))
        .exec(txn)
        .await?;
    if decremented.rows_affected != 1 {
        return Err(Error::InsufficientStock {
            available: product.quantity,
            requested: quantity,
        });
    }

    Ok(view)
}
