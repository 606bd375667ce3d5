//! Core business logic - framework-agnostic catalog, client and order operations.
//!
//! Every function takes the `SeaORM` connection explicitly. Operations that
//! touch more than one row open their own transaction and commit it only when
//! every step succeeded.

/// Category tree creation, lookup and subtree deletion
pub mod category;
/// Client creation, lookup and deletion
pub mod client;
/// Order creation, lookup and deletion
pub mod order;
/// Adding products to orders
pub mod order_item;
/// Product creation, pricing and deletion
pub mod product;
