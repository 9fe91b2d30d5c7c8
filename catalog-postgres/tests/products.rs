#![cfg(feature = "test-utils")]

use catalog_postgres::db::connect_to_database;
use catalog_postgres::products::{
    ProductRow, ProductValues, delete_product, delete_products, fetch_products, insert_product,
    update_product,
};
use catalog_postgres::test_utils::{
    create_pg_database, create_products_table, drop_pg_database, local_pg_connection_config,
};
use catalog_postgres::types::TableName;

fn values<'a>(sku: &'a str, name: &'a str, price: Option<i64>) -> ProductValues<'a> {
    ProductValues {
        sku,
        name,
        price,
        count: Some(1),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn statements_round_trip_through_postgres() {
    let config = local_pg_connection_config();
    let admin_pool = create_pg_database(&config).await;
    let table = TableName::new("public", "products");
    create_products_table(&admin_pool, &table).await;

    let pool = connect_to_database(&config).await.unwrap();

    insert_product(&pool, &table, values("B", "Bolt", Some(3))).await.unwrap();
    insert_product(&pool, &table, values("A", "Anchor", None)).await.unwrap();
    insert_product(&pool, &table, values("C", "Cable", Some(7))).await.unwrap();

    let rows = fetch_products(&pool, &table).await.unwrap();
    let skus: Vec<_> = rows.iter().map(|row| row.sku.as_str()).collect();
    assert_eq!(skus, vec!["A", "B", "C"]);
    assert_eq!(rows[0].price, None);

    let updated = update_product(&pool, &table, values("B", "Big bolt", Some(4)))
        .await
        .unwrap();
    assert_eq!(updated, 1);
    let missing = update_product(&pool, &table, values("Z", "Zip", Some(1)))
        .await
        .unwrap();
    assert_eq!(missing, 0);

    assert!(insert_product(&pool, &table, values("A", "Again", None)).await.is_err());

    assert_eq!(delete_product(&pool, &table, "C").await.unwrap(), 1);
    assert_eq!(
        delete_products(&pool, &table, &["A".to_owned(), "Q".to_owned()])
            .await
            .unwrap(),
        1
    );
    assert_eq!(delete_products(&pool, &table, &[]).await.unwrap(), 0);

    let rows = fetch_products(&pool, &table).await.unwrap();
    assert_eq!(
        rows,
        vec![ProductRow {
            sku: "B".to_owned(),
            name: Some("Big bolt".to_owned()),
            price: Some(4),
            count: Some(1),
        }]
    );

    pool.close().await;
    admin_pool.close().await;
    drop_pg_database(&config).await;
}
