use std::collections::HashMap;

/// A row of the catalog file, exactly as read.
///
/// Fields are keyed by header name and kept as text; coercion happens when the row is
/// turned into a [`crate::types::Product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based position of the row among the data rows; the header is not counted.
    pub line: u64,
    pub fields: HashMap<String, String>,
}

impl SourceRow {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Returns the value of `column`, or `None` if the row has no such field.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}
