use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::ValidationError;

/// Default schema of the products table.
pub const DEFAULT_TABLE_SCHEMA: &str = "public";

/// Default name of the products table.
pub const DEFAULT_TABLE_NAME: &str = "products";

/// Schema-qualified name of the table kept in sync with the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TableConfig {
    #[serde(default = "default_table_schema")]
    pub schema: String,
    #[serde(default = "default_table_name")]
    pub name: String,
}

fn default_table_schema() -> String {
    DEFAULT_TABLE_SCHEMA.to_owned()
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_owned()
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema.trim().is_empty() {
            return Err(ValidationError::EmptyTableSchema);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTableName);
        }

        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            schema: default_table_schema(),
            name: default_table_name(),
        }
    }
}

impl fmt::Display for TableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}
