use sqlx::{PgPool, prelude::FromRow};
use tracing::debug;

use crate::types::TableName;

/// A row of the products table as read back from the database.
///
/// Every column is cast to a fixed type in the query, so integer columns of any width
/// decode into `i64`. `NULL` prices and counts come back as `None`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProductRow {
    pub sku: String,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub count: Option<i64>,
}

/// Column values written for a single product.
///
/// `None` in `price` or `count` is written as `NULL`.
#[derive(Debug, Clone, Copy)]
pub struct ProductValues<'a> {
    pub sku: &'a str,
    pub name: &'a str,
    pub price: Option<i64>,
    pub count: Option<i64>,
}

/// Fetches every product ordered by sku.
pub async fn fetch_products(pool: &PgPool, table: &TableName) -> sqlx::Result<Vec<ProductRow>> {
    let query = format!(
        r#"
        select sku::text as sku, name::text as name, price::bigint as price, count::bigint as count
        from {}
        order by sku
        "#,
        table.as_quoted_identifier()
    );

    sqlx::query_as::<_, ProductRow>(&query)
        .fetch_all(pool)
        .await
}

/// Inserts a new product.
///
/// Fails if a row with the same sku already exists and the table enforces uniqueness.
pub async fn insert_product(
    pool: &PgPool,
    table: &TableName,
    product: ProductValues<'_>,
) -> sqlx::Result<()> {
    let query = format!(
        r#"
        insert into {} (sku, name, price, count)
        values ($1, $2, $3, $4)
        "#,
        table.as_quoted_identifier()
    );

    sqlx::query(&query)
        .bind(product.sku)
        .bind(product.name)
        .bind(product.price)
        .bind(product.count)
        .execute(pool)
        .await?;

    Ok(())
}

/// Overwrites name, price and count of the product with the given sku.
///
/// Returns the number of rows affected, which is zero when no row matches.
pub async fn update_product(
    pool: &PgPool,
    table: &TableName,
    product: ProductValues<'_>,
) -> sqlx::Result<u64> {
    let query = format!(
        r#"
        update {}
        set name = $1, price = $2, count = $3
        where sku = $4
        "#,
        table.as_quoted_identifier()
    );

    let result = sqlx::query(&query)
        .bind(product.name)
        .bind(product.price)
        .bind(product.count)
        .bind(product.sku)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes the product with the given sku.
///
/// Returns the number of rows removed.
pub async fn delete_product(pool: &PgPool, table: &TableName, sku: &str) -> sqlx::Result<u64> {
    let query = format!(
        r#"
        delete from {}
        where sku = $1
        "#,
        table.as_quoted_identifier()
    );

    let result = sqlx::query(&query).bind(sku).execute(pool).await?;

    Ok(result.rows_affected())
}

/// Deletes every product whose sku is in `skus` with a single statement.
///
/// The skus are bound as one text array parameter, so the list length never changes the
/// statement text.
pub async fn delete_products(
    pool: &PgPool,
    table: &TableName,
    skus: &[String],
) -> sqlx::Result<u64> {
    if skus.is_empty() {
        debug!("no skus to delete from {}", table);
        return Ok(0);
    }

    let query = format!(
        r#"
        delete from {}
        where sku = any($1)
        "#,
        table.as_quoted_identifier()
    );

    let result = sqlx::query(&query).bind(skus).execute(pool).await?;

    Ok(result.rows_affected())
}
