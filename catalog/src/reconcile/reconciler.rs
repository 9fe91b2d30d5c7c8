use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use crate::error::{ErrorKind, SyncError, SyncResult};
use crate::reconcile::SyncPlan;
use crate::store::ProductStore;
use crate::types::Product;
use crate::{bail, sync_error};

/// Counts of the writes applied by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub deleted: usize,
    pub updated: usize,
    /// Updates whose sku no longer matched any row when the statement ran.
    pub missed_updates: usize,
}

impl SyncReport {
    /// Number of writes issued, including updates that matched nothing.
    pub fn applied(&self) -> usize {
        self.added + self.deleted + self.updated + self.missed_updates
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} deleted, {} updated",
            self.added, self.deleted, self.updated
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Add,
    Delete,
    Update,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Add => f.write_str("add"),
            Change::Delete => f.write_str("delete"),
            Change::Update => f.write_str("update"),
        }
    }
}

/// Applies the difference between a candidate catalog and a [`ProductStore`].
///
/// A pass loads the persisted products, diffs them against the candidates by sku and then
/// writes all additions, all deletions and all updates in that order, one statement per
/// change. Updates overwrite every field without comparing values. The first failing
/// write ends the pass; the writes before it stay applied.
#[derive(Debug)]
pub struct Reconciler<S> {
    store: S,
}

impl<S> Reconciler<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one reconciliation pass for `candidates`, given in catalog file order.
    pub async fn reconcile(&self, candidates: &[Product]) -> SyncResult<SyncReport> {
        let persisted = self.store.load_products().await?;

        let plan = SyncPlan::new(
            candidates.iter().map(|product| product.sku.as_str()),
            persisted.iter().map(|product| product.sku.as_str()),
        );
        debug!(
            to_add = plan.to_add.len(),
            to_delete = plan.to_delete.len(),
            to_update = plan.to_update.len(),
            "computed sync plan"
        );

        let mut by_sku: HashMap<&str, &Product> = HashMap::with_capacity(candidates.len());
        for product in candidates {
            by_sku.entry(product.sku.as_str()).or_insert(product);
        }

        let total = plan.len();
        let mut report = SyncReport::default();

        for sku in &plan.to_add {
            let product = candidate(&by_sku, sku)?;
            self.store
                .insert_product(product)
                .await
                .map_err(|err| stopped(err, Change::Add, sku, &report, total))?;
            info!("added sku {sku}");
            report.added += 1;
        }

        for sku in &plan.to_delete {
            self.store
                .delete_product(sku)
                .await
                .map_err(|err| stopped(err, Change::Delete, sku, &report, total))?;
            info!("deleted sku {sku}");
            report.deleted += 1;
        }

        for sku in &plan.to_update {
            let product = candidate(&by_sku, sku)?;
            let updated = self
                .store
                .update_product(product)
                .await
                .map_err(|err| stopped(err, Change::Update, sku, &report, total))?;

            if updated == 0 {
                debug!("update for sku {sku} matched no rows");
                report.missed_updates += 1;
            } else {
                info!("updated sku {sku}");
                report.updated += 1;
            }
        }

        Ok(report)
    }
}

fn candidate<'a>(by_sku: &HashMap<&str, &'a Product>, sku: &str) -> SyncResult<&'a Product> {
    match by_sku.get(sku) {
        Some(product) => Ok(*product),
        None => bail!(
            ErrorKind::InvalidState,
            "Planned sku has no candidate product",
            sku
        ),
    }
}

/// Wraps the error of a failed write with how far the pass got.
fn stopped(
    err: SyncError,
    change: Change,
    sku: &str,
    report: &SyncReport,
    total: usize,
) -> SyncError {
    let kind = err.kind();
    let detail = format!(
        "{change} of sku {sku} failed; applied {} of {total} changes",
        report.applied()
    );

    sync_error!(
        kind,
        "Reconciliation stopped at a failing write",
        detail = detail,
        source: err
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_missed_updates_as_applied() {
        let report = SyncReport {
            added: 1,
            deleted: 2,
            updated: 3,
            missed_updates: 1,
        };

        assert_eq!(report.applied(), 7);
        assert_eq!(report.to_string(), "1 added, 2 deleted, 3 updated");
    }

    #[test]
    fn stopped_keeps_the_kind_and_reports_progress() {
        let err = sync_error!(ErrorKind::StoreConstraintViolation, "Duplicate sku", "X");
        let report = SyncReport {
            added: 2,
            ..SyncReport::default()
        };

        let wrapped = stopped(err, Change::Add, "X", &report, 5);

        assert_eq!(wrapped.kind(), ErrorKind::StoreConstraintViolation);
        assert_eq!(
            wrapped.detail(),
            Some("add of sku X failed; applied 2 of 5 changes")
        );
    }
}
