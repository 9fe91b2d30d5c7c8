//! Postgres access for the products table.
//!
//! Holds connection helpers and the typed statements used by the syncer. Statements are
//! always parameterized; only the table identifier is interpolated, after quoting.

pub mod db;
pub mod products;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod types;
