use catalog_config::shared::PgConnectionConfig;
use catalog_postgres::db::connect_to_database;
use catalog_postgres::products;
use catalog_postgres::types::TableName;
use sqlx::PgPool;
use tracing::debug;

use crate::error::SyncResult;
use crate::store::ProductStore;
use crate::types::Product;

/// [`ProductStore`] backed by a Postgres products table.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    table: TableName,
}

impl PostgresStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// Opens the run's connection and returns a store using it.
    ///
    /// Connection failures are classified like any other [`sqlx::Error`], so an unreachable
    /// server surfaces as [`crate::error::ErrorKind::StoreConnectionFailed`] and rejected
    /// credentials as [`crate::error::ErrorKind::StoreAuthenticationFailed`].
    pub async fn connect(config: &PgConnectionConfig, table: TableName) -> SyncResult<Self> {
        let pool = connect_to_database(config).await?;
        debug!(table = %table, "connected to catalog database");

        Ok(Self::new(pool, table))
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Deletes every product in `skus` with a single statement.
    pub async fn delete_products(&self, skus: &[String]) -> SyncResult<u64> {
        let removed = products::delete_products(&self.pool, &self.table, skus).await?;

        Ok(removed)
    }

    /// Closes the pool, waiting for its connection to shut down.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!(table = %self.table, "closed catalog database connection");
    }
}

impl ProductStore for PostgresStore {
    async fn load_products(&self) -> SyncResult<Vec<Product>> {
        let rows = products::fetch_products(&self.pool, &self.table).await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert_product(&self, product: &Product) -> SyncResult<()> {
        products::insert_product(&self.pool, &self.table, product.as_values()).await?;

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> SyncResult<u64> {
        let updated =
            products::update_product(&self.pool, &self.table, product.as_values()).await?;

        Ok(updated)
    }

    async fn delete_product(&self, sku: &str) -> SyncResult<u64> {
        let removed = products::delete_product(&self.pool, &self.table, sku).await?;

        Ok(removed)
    }
}
