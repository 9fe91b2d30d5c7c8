use std::future::Future;

use crate::error::SyncResult;
use crate::types::Product;

/// Trait for reading and writing the persisted product catalog.
///
/// Every method issues exactly one independent write or read; there is no transaction
/// spanning calls. Implementations report failures as [`crate::error::SyncError`] and
/// never retry.
pub trait ProductStore {
    /// Returns every persisted product ordered by sku.
    ///
    /// Repeated skus are returned as stored.
    fn load_products(&self) -> impl Future<Output = SyncResult<Vec<Product>>> + Send;

    /// Inserts a product that is not yet persisted.
    fn insert_product(&self, product: &Product) -> impl Future<Output = SyncResult<()>> + Send;

    /// Overwrites the name, price and count of every row matching the product's sku.
    ///
    /// Returns the number of rows changed. Zero is not an error.
    fn update_product(&self, product: &Product)
    -> impl Future<Output = SyncResult<u64>> + Send;

    /// Removes every row with the given sku and returns how many were removed.
    fn delete_product(&self, sku: &str) -> impl Future<Output = SyncResult<u64>> + Send;
}
