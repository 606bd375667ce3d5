//! Product business logic - Handles catalog products and their stock.
//!
//! Prices are fixed-point decimals rounded to two fractional digits. Stock is
//! only decremented through [`crate::core::order_item::add_item`]; this module
//! creates products, reprices them and removes them when no order refers to
//! them any more.

use crate::{
    entities::{Category, OrderItem, Product, order_item, product},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Number of fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 2;

fn validate_price(price: Decimal) -> Result<Decimal> {
    if price < Decimal::ZERO {
        return Err(Error::InvalidPrice { price });
    }
    Ok(price.round_dp(PRICE_SCALE))
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product with an initial stock level.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The initial quantity is negative
/// - The price is negative
/// - `category_id` does not reference an existing category
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    quantity: i32,
    price: Decimal,
    category_id: Option<i32>,
) -> Result<product::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if quantity < 0 {
        return Err(Error::Validation {
            message: "Stock quantity cannot be negative".to_string(),
        });
    }

    let price = validate_price(price)?;

    if let Some(category_id) = category_id {
        Category::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or(Error::CategoryNotFound { id: category_id })?;
    }

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        quantity: Set(quantity),
        price: Set(price),
        category_id: Set(category_id),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Sets a new unit price for a product.
///
/// Existing order items keep the price they were created with.
///
/// # Errors
/// Returns an error if the price is negative, the product does not exist, or
/// the database update fails.
#[instrument(skip(db))]
pub async fn update_product_price(
    db: &DatabaseConnection,
    product_id: i32,
    new_price: Decimal,
) -> Result<product::Model> {
    let new_price = validate_price(new_price)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.price = Set(new_price);
    let updated = product.update(db).await?;
    info!("Updated price for product {}: {}", product_id, updated.price);
    Ok(updated)
}

/// Deletes a product that no order item refers to.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - Order items still reference the product (`Error::ProductInUse`)
/// - The database delete operation fails
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let line_items = OrderItem::find()
        .filter(order_item::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if line_items > 0 {
        return Err(Error::ProductInUse {
            id: product_id,
            line_items,
        });
    }

    Product::delete_by_id(product_id).exec(&txn).await?;
    txn.commit().await?;
    info!("Deleted product {}", product_id);
    Ok(())
}
