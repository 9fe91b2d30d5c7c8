use serde::Deserialize;

use crate::{Config, OverrideKind, VariableOverride};
use crate::shared::{PgConnectionConfig, SourceConfig, TableConfig, ValidationError};

/// Complete configuration for one reconciliation run.
///
/// This intentionally does not implement [`serde::Serialize`] to avoid accidentally
/// leaking the database password into serialized forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    /// Where the desired catalog state is read from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Connection to the database holding the persisted catalog.
    #[serde(default)]
    pub database: PgConnectionConfig,
    /// Table holding the persisted catalog.
    #[serde(default)]
    pub table: TableConfig,
}

impl SyncConfig {
    /// Validates every section of the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source.validate()?;
        self.table.validate()
    }
}

impl Config for SyncConfig {
    const VARIABLE_OVERRIDES: &'static [VariableOverride] = &[
        pg_variable("PGHOST", "database.host", OverrideKind::Text),
        pg_variable("PGPORT", "database.port", OverrideKind::Text),
        pg_variable("PGDATABASE", "database.name", OverrideKind::Text),
        pg_variable("PGUSER", "database.username", OverrideKind::Text),
        pg_variable("PGPASSWORD", "database.password", OverrideKind::Text),
        pg_variable("PGSSL", "database.tls.enabled", OverrideKind::Flag),
    ];
}

const fn pg_variable(
    variable: &'static str,
    key: &'static str,
    kind: OverrideKind,
) -> VariableOverride {
    VariableOverride {
        variable,
        key,
        kind,
    }
}
