//! Reconciles a product catalog file with the products table.
//!
//! A run loads every row of the catalog file, fetches the persisted products in sku
//! order, computes which skus to add, delete and update, and applies those changes one
//! statement at a time. See [`sync::sync_catalog`] for the entry point.

pub mod conversions;
pub mod error;
mod macros;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod sync;
pub mod types;
