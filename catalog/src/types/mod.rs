mod product;
mod source_row;

pub use crate::conversions::numeric::NumericField;
pub use product::*;
pub use source_row::*;
