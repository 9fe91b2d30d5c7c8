use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The source file path is empty.
    #[error("`source.path` cannot be empty")]
    EmptySourcePath,
    /// The target table name is empty.
    #[error("`table.name` cannot be empty")]
    EmptyTableName,
    /// The target table schema is empty.
    #[error("`table.schema` cannot be empty")]
    EmptyTableSchema,
    /// A boolean-like setting holds a value that is neither truthy nor falsy.
    #[error("invalid boolean value `{value}` for `{key}`")]
    InvalidFlag { key: String, value: String },
}
