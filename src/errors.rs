//! Unified error type for `OrderDesk`.
//!
//! Client-facing variants carry the reason text returned in HTTP `detail`
//! bodies; the ids and amounts they hold are for logs.

use sea_orm::prelude::Decimal;
use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested or initial quantity is out of range.
    #[error("Quantity must be greater than 0")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// Product price below zero.
    #[error("Price must not be negative")]
    InvalidPrice {
        /// The rejected price
        price: Decimal,
    },

    /// Free-form input validation failure (blank names and the like).
    #[error("{message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// No order with the given id.
    #[error("Order not found")]
    OrderNotFound {
        /// Missing order id
        id: i32,
    },

    /// No product with the given id.
    #[error("Product not found")]
    ProductNotFound {
        /// Missing product id
        id: i32,
    },

    /// No client with the given id.
    #[error("Client not found")]
    ClientNotFound {
        /// Missing client id
        id: i32,
    },

    /// No category with the given id.
    #[error("Category not found")]
    CategoryNotFound {
        /// Missing category id
        id: i32,
    },

    /// Stock must stay strictly above the requested quantity.
    #[error("Not enough product in stock")]
    InsufficientStock {
        /// Units on hand when the request was checked
        available: i32,
        /// Units requested
        requested: i32,
    },

    /// Product deletion blocked by order items that still reference it.
    #[error("Product is referenced by orders")]
    ProductInUse {
        /// Product id
        id: i32,
        /// Number of referencing order items
        line_items: u64,
    },

    /// Settings missing or malformed at startup.
    #[error("Configuration error: {message}")]
    Config {
        /// What was missing or malformed
        message: String,
    },

    /// Any storage-layer failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Listener or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
