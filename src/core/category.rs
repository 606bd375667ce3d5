//! Category business logic - Handles the product category tree.
//!
//! Categories form a tree through `parent_id`. Deleting a category removes
//! its entire subtree and detaches every product filed under it.

use crate::{
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, Value, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Creates a category, optionally under an existing parent.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - `parent_id` does not reference an existing category
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    parent_id: Option<i32>,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    if let Some(parent_id) = parent_id {
        Category::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or(Error::CategoryNotFound { id: parent_id })?;
    }

    let category = category::ActiveModel {
        name: Set(name.trim().to_string()),
        parent_id: Set(parent_id),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Retrieves a category by its ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the direct children of a category, ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_child_categories(
    db: &DatabaseConnection,
    parent_id: i32,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::ParentId.eq(parent_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category together with all of its descendants.
///
/// Products filed under any removed category keep existing with
/// `category_id = NULL`. Categories are removed leaves first, all inside one
/// transaction.
///
/// # Returns
/// The number of categories removed.
///
/// # Errors
/// Returns `Error::CategoryNotFound` if the category does not exist, or a
/// database error if any step fails (nothing is removed in that case).
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i32) -> Result<u64> {
    let txn = db.begin().await?;

    Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    // Breadth-first walk, so reversing the list yields leaves before parents.
    let mut subtree = vec![category_id];
    let mut frontier = vec![category_id];
    while !frontier.is_empty() {
        let children: Vec<i32> = Category::find()
            .filter(category::Column::ParentId.is_in(frontier))
            .all(&txn)
            .await?
            .into_iter()
            .map(|child| child.id)
            .collect();
        subtree.extend(&children);
        frontier = children;
    }

    let detached = Product::update_many()
        .col_expr(product::Column::CategoryId, Expr::value(Value::Int(None)))
        .filter(product::Column::CategoryId.is_in(subtree.clone()))
        .exec(&txn)
        .await?;

    let mut removed = 0;
    for id in subtree.iter().rev() {
        removed += Category::delete_by_id(*id).exec(&txn).await?.rows_affected;
    }

    txn.commit().await?;
    info!(
        "Deleted category {} with {} descendants, detached {} products",
        category_id,
        removed.saturating_sub(1),
        detached.rows_affected
    );
    Ok(removed)
}
