//! Shared test utilities for `OrderDesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{category, client, order, product},
    entities::{self, Product},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set,
    prelude::Decimal,
};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is capped at one connection so every query sees the same
/// in-memory database; concurrent callers queue for it.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a price from an amount in cents.
pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Creates a test category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i32>,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), parent_id).await
}

/// Creates a test product with the given stock.
///
/// # Defaults
/// * price: 10.50
/// * category: none
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    quantity: i32,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), quantity, price(1050), None).await
}

/// Creates a test product with custom price and category.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    quantity: i32,
    unit_price: Decimal,
    category_id: Option<i32>,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), quantity, unit_price, category_id).await
}

/// Creates a test client without an address.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, name.to_string(), None).await
}

/// Opens an empty order for the client.
pub async fn create_test_order(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<entities::order::Model> {
    order::create_order(db, client_id).await
}

/// Inserts an order item directly, bypassing stock checks and merging.
pub async fn insert_raw_order_item(
    db: &DatabaseConnection,
    order_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<entities::order_item::Model> {
    entities::order_item::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        price: Set(price(1050)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Current stock of a product.
pub async fn product_stock(db: &DatabaseConnection, product_id: i32) -> Result<i32> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .map(|p| p.quantity)
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Sets up a database with one client, one empty order and one product.
/// Returns (db, order, product) for order-item tests.
pub async fn setup_with_order_and_product(
    stock: i32,
) -> Result<(
    DatabaseConnection,
    entities::order::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let client = create_test_client(&db, "Test Client").await?;
    let order = create_test_order(&db, client.id).await?;
    let product = create_test_product(&db, "Test Product", stock).await?;
    Ok((db, order, product))
}
