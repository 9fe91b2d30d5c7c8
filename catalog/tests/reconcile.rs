use catalog::error::{ErrorKind, SyncResult};
use catalog::reconcile::{Reconciler, SyncReport};
use catalog::source::{collect_candidates, read_source_rows};
use catalog::store::ProductStore;
use catalog::store::memory::{MemoryStore, StoreOperation};
use catalog::types::{NumericField, Product};
use catalog_telemetry::tracing::init_test_tracing;

fn product(sku: &str, name: &str, price: i64, count: i64) -> Product {
    Product::new(
        sku,
        name,
        NumericField::Integer(price),
        NumericField::Integer(count),
    )
}

fn candidates(csv: &str) -> Vec<Product> {
    let rows = read_source_rows(csv.as_bytes()).unwrap();
    collect_candidates(&rows)
}

fn insert(sku: &str) -> StoreOperation {
    StoreOperation::Insert(sku.to_owned())
}

fn delete(sku: &str) -> StoreOperation {
    StoreOperation::Delete(sku.to_owned())
}

fn update(sku: &str) -> StoreOperation {
    StoreOperation::Update(sku.to_owned())
}

#[tokio::test]
async fn writes_are_applied_as_adds_then_deletes_then_updates() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("B", "Bolt", 3, 100),
        product("A", "Anchor", 9, 4),
        product("D", "Drill", 80, 2),
    ]);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler
        .reconcile(&candidates(
            "sku,name,price,count\nD,Drill,75,2\nC,Cable,7,30\nB,Bolt,3,90\nE,Eyelet,1,500\n",
        ))
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            added: 2,
            deleted: 1,
            updated: 2,
            missed_updates: 0,
        }
    );
    assert_eq!(
        store.operations().await,
        vec![
            StoreOperation::Load,
            insert("C"),
            insert("E"),
            delete("A"),
            update("D"),
            update("B"),
        ]
    );
}

#[tokio::test]
async fn overlapping_catalogs_add_delete_and_update() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("A", "Anchor", 9, 4),
        product("B", "Bolt", 3, 100),
    ]);
    let reconciler = Reconciler::new(store.clone());

    reconciler
        .reconcile(&candidates("sku,name,price,count\nB,Bolt,4,90\nC,Cable,7,30\n"))
        .await
        .unwrap();

    let mut products = store.products().await;
    products.sort_by(|a, b| a.sku.cmp(&b.sku));
    assert_eq!(
        products,
        vec![product("B", "Bolt", 4, 90), product("C", "Cable", 7, 30)]
    );
}

#[tokio::test]
async fn numeric_text_is_stored_as_integers() {
    init_test_tracing();

    let store = MemoryStore::new();
    let reconciler = Reconciler::new(store.clone());

    reconciler
        .reconcile(&candidates("sku,name,price,count\nX,Widget,10,5\n"))
        .await
        .unwrap();

    assert_eq!(store.products().await, vec![product("X", "Widget", 10, 5)]);
}

#[tokio::test]
async fn non_numeric_price_is_stored_as_the_sentinel() {
    init_test_tracing();

    let store = MemoryStore::new();
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler
        .reconcile(&candidates("sku,name,price,count\nX,Widget,abc,5\n"))
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    let stored = store.products().await;
    assert_eq!(stored[0].price, NumericField::NotANumber);
    assert_eq!(stored[0].as_values().price, None);
    assert_eq!(stored[0].count, NumericField::Integer(5));
}

#[tokio::test]
async fn second_run_only_updates() {
    init_test_tracing();

    let catalog = candidates("sku,name,price,count\nX,Widget,10,5\nY,Yoke,2,8\n");
    let store = MemoryStore::with_products(vec![product("Z", "Zip", 1, 1)]);
    let reconciler = Reconciler::new(store.clone());

    reconciler.reconcile(&catalog).await.unwrap();
    let after_first = store.products().await;
    store.clear_operations().await;

    let report = reconciler.reconcile(&catalog).await.unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.updated, 2);
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, update("X"), update("Y")]
    );
    assert_eq!(store.products().await, after_first);
}

#[tokio::test]
async fn duplicate_persisted_skus_are_updated_once_and_kept() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("A", "Anchor", 9, 4),
        product("A", "Anchor copy", 9, 4),
    ]);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler
        .reconcile(&candidates("sku,name,price,count\nA,Anchor,10,4\n"))
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.deleted, 0);
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, update("A")]
    );
}

#[tokio::test]
async fn duplicate_candidate_skus_use_the_first_row() {
    init_test_tracing();

    let store = MemoryStore::new();
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler
        .reconcile(&candidates("sku,name,price,count\nX,First,1,1\nX,Second,2,2\n"))
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(store.products().await, vec![product("X", "First", 1, 1)]);
}

#[tokio::test]
async fn empty_catalog_deletes_every_product() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("B", "Bolt", 3, 100),
        product("A", "Anchor", 9, 4),
    ]);
    let reconciler = Reconciler::new(store.clone());

    let report = reconciler
        .reconcile(&candidates("sku,name,price,count\n"))
        .await
        .unwrap();

    assert_eq!(report.deleted, 2);
    assert!(store.products().await.is_empty());
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, delete("A"), delete("B")]
    );
}

#[tokio::test]
async fn first_failing_write_stops_the_pass() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![product("A", "Anchor", 9, 4)]);
    store.fail_on(insert("C")).await;
    let reconciler = Reconciler::new(store.clone());

    let err = reconciler
        .reconcile(&candidates("sku,name,price,count\nB,Bolt,3,100\nC,Cable,7,30\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreQueryFailed);
    assert_eq!(
        err.detail(),
        Some("add of sku C failed; applied 1 of 3 changes")
    );
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, insert("B")]
    );
    let skus: Vec<String> = store
        .products()
        .await
        .into_iter()
        .map(|product| product.sku)
        .collect();
    assert_eq!(skus, vec!["A".to_owned(), "B".to_owned()]);
}

#[tokio::test]
async fn failing_delete_skips_the_updates() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("A", "Anchor", 9, 4),
        product("B", "Bolt", 3, 100),
    ]);
    store.fail_on(delete("A")).await;
    let reconciler = Reconciler::new(store.clone());

    let err = reconciler
        .reconcile(&candidates("sku,name,price,count\nB,Bolt,4,90\nC,Cable,7,30\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreQueryFailed);
    assert_eq!(
        err.detail(),
        Some("delete of sku A failed; applied 1 of 3 changes")
    );
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, insert("C")]
    );
    assert!(
        store
            .products()
            .await
            .contains(&product("B", "Bolt", 3, 100))
    );
}

#[tokio::test]
async fn failing_update_keeps_earlier_writes() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![
        product("A", "Anchor", 9, 4),
        product("B", "Bolt", 3, 100),
    ]);
    store.fail_on(update("B")).await;
    let reconciler = Reconciler::new(store.clone());

    let err = reconciler
        .reconcile(&candidates("sku,name,price,count\nB,Bolt,4,90\nC,Cable,7,30\nD,Drill,80,2\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreQueryFailed);
    assert_eq!(
        err.detail(),
        Some("update of sku B failed; applied 3 of 4 changes")
    );
    assert_eq!(
        store.operations().await,
        vec![StoreOperation::Load, insert("C"), insert("D"), delete("A")]
    );
    assert!(
        store
            .products()
            .await
            .contains(&product("B", "Bolt", 3, 100))
    );
}

#[tokio::test]
async fn failing_load_writes_nothing() {
    init_test_tracing();

    let store = MemoryStore::with_products(vec![product("A", "Anchor", 9, 4)]);
    store.fail_on(StoreOperation::Load).await;
    let reconciler = Reconciler::new(store.clone());

    let err = reconciler
        .reconcile(&candidates("sku,name,price,count\nB,Bolt,3,100\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreQueryFailed);
    assert!(store.operations().await.is_empty());
}

/// Store whose load reports rows that have already disappeared from the table.
struct StaleStore {
    stale: Vec<Product>,
    table: MemoryStore,
}

impl ProductStore for StaleStore {
    async fn load_products(&self) -> SyncResult<Vec<Product>> {
        Ok(self.stale.clone())
    }

    async fn insert_product(&self, product: &Product) -> SyncResult<()> {
        self.table.insert_product(product).await
    }

    async fn update_product(&self, product: &Product) -> SyncResult<u64> {
        self.table.update_product(product).await
    }

    async fn delete_product(&self, sku: &str) -> SyncResult<u64> {
        self.table.delete_product(sku).await
    }
}

#[tokio::test]
async fn update_matching_no_rows_is_not_an_error() {
    init_test_tracing();

    let table = MemoryStore::new();
    let store = StaleStore {
        stale: vec![product("A", "Anchor", 9, 4)],
        table: table.clone(),
    };
    let reconciler = Reconciler::new(store);

    let report = reconciler
        .reconcile(&candidates("sku,name,price,count\nA,Anchor,10,4\n"))
        .await
        .unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(report.missed_updates, 1);
    assert!(table.products().await.is_empty());
    assert_eq!(table.operations().await, vec![update("A")]);
}
