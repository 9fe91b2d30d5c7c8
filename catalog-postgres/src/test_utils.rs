use catalog_config::shared::{IntoConnectOptions, PgConnectionConfig, TlsConfig};
use secrecy::SecretString;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use crate::types::TableName;

/// Builds connection settings for a fresh, uniquely named test database.
///
/// Configuration is read from environment variables:
/// - `TESTS_DATABASE_HOST`: Postgres server hostname (required)
/// - `TESTS_DATABASE_PORT`: Postgres server port (required)
/// - `TESTS_DATABASE_USERNAME`: Database user (required)
/// - `TESTS_DATABASE_PASSWORD`: Database password (optional)
pub fn local_pg_connection_config() -> PgConnectionConfig {
    PgConnectionConfig {
        host: Some(std::env::var("TESTS_DATABASE_HOST").expect("TESTS_DATABASE_HOST must be set")),
        port: Some(
            std::env::var("TESTS_DATABASE_PORT")
                .expect("TESTS_DATABASE_PORT must be set")
                .parse()
                .expect("TESTS_DATABASE_PORT must be a valid port number"),
        ),
        name: Some(Uuid::new_v4().to_string()),
        username: Some(
            std::env::var("TESTS_DATABASE_USERNAME").expect("TESTS_DATABASE_USERNAME must be set"),
        ),
        password: std::env::var("TESTS_DATABASE_PASSWORD")
            .ok()
            .map(SecretString::new),
        tls: TlsConfig::default(),
    }
}

/// Creates the database named in `config` and returns a pool connected to it.
///
/// # Panics
/// Panics if connection or database creation fails.
pub async fn create_pg_database(config: &PgConnectionConfig) -> PgPool {
    let name = config.name.as_deref().expect("test database must be named");

    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"create database "{name}";"#))
        .await
        .expect("Failed to create database");

    PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres")
}

/// Creates a products table with the columns the syncer expects.
///
/// # Panics
/// Panics if the table cannot be created.
pub async fn create_products_table(pool: &PgPool, table: &TableName) {
    pool.execute(&*format!(
        r#"
        create schema if not exists {schema};
        create table {table} (
            sku text primary key,
            name text not null,
            price integer,
            count integer
        );
        "#,
        schema = pg_escape::quote_identifier(&table.schema),
        table = table.as_quoted_identifier(),
    ))
    .await
    .expect("Failed to create products table");
}

/// Drops a Postgres database and terminates all connections.
///
/// Failures are printed and swallowed so cleanup never fails a test.
pub async fn drop_pg_database(config: &PgConnectionConfig) {
    let Some(name) = config.name.as_deref() else {
        return;
    };

    let mut connection = match PgConnection::connect_with(&config.without_db()).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("warning: failed to connect to Postgres for cleanup: {e}");
            return;
        }
    };

    if let Err(e) = connection
        .execute(&*format!(
            r#"
            select pg_terminate_backend(pg_stat_activity.pid)
            from pg_stat_activity
            where pg_stat_activity.datname = '{name}'
            and pid <> pg_backend_pid();"#
        ))
        .await
    {
        eprintln!("warning: failed to terminate connections for database {name}: {e}");
    }

    if let Err(e) = connection
        .execute(&*format!(r#"drop database if exists "{name}";"#))
        .await
    {
        eprintln!("warning: failed to drop database {name}: {e}");
    }
}
