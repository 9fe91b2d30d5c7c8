use catalog_postgres::products::{ProductRow, ProductValues};

use crate::conversions::numeric::{NumericField, coerce_integer};
use crate::types::SourceRow;

/// Column holding the natural key of a product.
pub const SKU_COLUMN: &str = "sku";
pub const NAME_COLUMN: &str = "name";
pub const PRICE_COLUMN: &str = "price";
pub const COUNT_COLUMN: &str = "count";

/// Columns every catalog file must declare in its header.
pub const REQUIRED_COLUMNS: [&str; 4] = [SKU_COLUMN, NAME_COLUMN, PRICE_COLUMN, COUNT_COLUMN];

/// A product as compared and written by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub price: NumericField,
    pub count: NumericField,
}

impl Product {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price: NumericField,
        count: NumericField,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            price,
            count,
        }
    }

    /// Builds a candidate product from a catalog file row.
    ///
    /// Returns `None` when the row has no usable sku. Missing name, price or count fields
    /// are read as empty text, so a missing numeric field becomes the sentinel.
    pub fn from_source_row(row: &SourceRow) -> Option<Product> {
        let sku = row.get(SKU_COLUMN).filter(|sku| !sku.trim().is_empty())?;

        Some(Product {
            sku: sku.to_owned(),
            name: row.get(NAME_COLUMN).unwrap_or_default().to_owned(),
            price: coerce_integer(row.get(PRICE_COLUMN).unwrap_or_default()),
            count: coerce_integer(row.get(COUNT_COLUMN).unwrap_or_default()),
        })
    }

    /// Returns the column values written to the products table.
    pub fn as_values(&self) -> ProductValues<'_> {
        ProductValues {
            sku: &self.sku,
            name: &self.name,
            price: self.price.as_integer(),
            count: self.count.as_integer(),
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            sku: row.sku,
            name: row.name.unwrap_or_default(),
            price: row.price.into(),
            count: row.count.into(),
        }
    }
}
