use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::shared::ValidationError;

/// Default path of the catalog file, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "products.csv";

/// Location of the CSV file holding the desired catalog state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SourceConfig {
    /// Path to the CSV file.
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

fn default_source_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_PATH)
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::EmptySourcePath);
        }

        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}
