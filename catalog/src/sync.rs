use catalog_config::shared::SyncConfig;
use catalog_postgres::types::TableName;
use tracing::{error, info};

use crate::error::SyncResult;
use crate::reconcile::{Reconciler, SyncReport};
use crate::source::{collect_candidates, load_source_file};
use crate::store::postgres::PostgresStore;

/// Runs one full reconciliation of the configured catalog file against its table.
///
/// The file is read and parsed before the database is contacted, so a bad file never
/// opens a connection. Once opened, the connection is closed whether the pass succeeds
/// or fails.
pub async fn sync_catalog(config: &SyncConfig) -> SyncResult<SyncReport> {
    let rows = load_source_file(&config.source.path).await?;
    let candidates = collect_candidates(&rows);

    let table = TableName::from(&config.table);
    let store = PostgresStore::connect(&config.database, table).await?;

    let reconciler = Reconciler::new(store);
    let result = reconciler.reconcile(&candidates).await;
    reconciler.store().close().await;

    match &result {
        Ok(report) => info!(
            table = %reconciler.store().table(),
            added = report.added,
            deleted = report.deleted,
            updated = report.updated,
            "catalog sync completed"
        ),
        Err(err) => error!(
            table = %reconciler.store().table(),
            kind = ?err.kind(),
            "catalog sync failed"
        ),
    }

    result
}
