use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{ErrorKind, SyncResult};
use crate::store::ProductStore;
use crate::types::Product;
use crate::{bail, sync_error};

/// A single call made against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Load,
    Insert(String),
    Update(String),
    Delete(String),
}

#[derive(Debug)]
struct Inner {
    products: Vec<Product>,
    operations: Vec<StoreOperation>,
    failures: HashSet<StoreOperation>,
}

/// In-memory product store for testing.
///
/// Rows are kept in insertion order and, like a table without a unique index, may repeat
/// a sku when seeded through [`MemoryStore::with_products`]. Every successful call is
/// recorded so tests can assert on the exact sequence of writes.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Creates a store holding `products` as already persisted rows.
    pub fn with_products(products: Vec<Product>) -> Self {
        let inner = Inner {
            products,
            operations: Vec::new(),
            failures: HashSet::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns a copy of the stored rows in insertion order.
    pub async fn products(&self) -> Vec<Product> {
        let inner = self.inner.lock().await;
        inner.products.clone()
    }

    /// Returns every successful operation in call order.
    pub async fn operations(&self) -> Vec<StoreOperation> {
        let inner = self.inner.lock().await;
        inner.operations.clone()
    }

    /// Forgets the recorded operations, keeping the rows.
    pub async fn clear_operations(&self) {
        let mut inner = self.inner.lock().await;
        inner.operations.clear();
    }

    /// Makes `operation` fail with [`ErrorKind::StoreQueryFailed`] whenever it is attempted.
    pub async fn fail_on(&self, operation: StoreOperation) {
        let mut inner = self.inner.lock().await;
        inner.failures.insert(operation);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn attempt(&mut self, operation: StoreOperation) -> SyncResult<()> {
        if self.failures.contains(&operation) {
            return Err(sync_error!(
                ErrorKind::StoreQueryFailed,
                "Injected store failure",
                format!("{operation:?}")
            ));
        }

        self.operations.push(operation);
        Ok(())
    }
}

impl ProductStore for MemoryStore {
    async fn load_products(&self) -> SyncResult<Vec<Product>> {
        let mut inner = self.inner.lock().await;
        inner.attempt(StoreOperation::Load)?;

        let mut products = inner.products.clone();
        products.sort_by(|a, b| a.sku.cmp(&b.sku));

        Ok(products)
    }

    async fn insert_product(&self, product: &Product) -> SyncResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.products.iter().any(|row| row.sku == product.sku) {
            bail!(
                ErrorKind::StoreConstraintViolation,
                "Duplicate sku",
                product.sku.clone()
            );
        }
        inner.attempt(StoreOperation::Insert(product.sku.clone()))?;

        inner.products.push(product.clone());

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> SyncResult<u64> {
        let mut inner = self.inner.lock().await;
        inner.attempt(StoreOperation::Update(product.sku.clone()))?;

        let mut updated = 0;
        for row in inner.products.iter_mut().filter(|row| row.sku == product.sku) {
            row.name = product.name.clone();
            row.price = product.price;
            row.count = product.count;
            updated += 1;
        }

        Ok(updated)
    }

    async fn delete_product(&self, sku: &str) -> SyncResult<u64> {
        let mut inner = self.inner.lock().await;
        inner.attempt(StoreOperation::Delete(sku.to_owned()))?;

        let before = inner.products.len();
        inner.products.retain(|row| row.sku != sku);

        Ok((before - inner.products.len()) as u64)
    }
}
