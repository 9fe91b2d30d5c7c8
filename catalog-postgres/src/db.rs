use catalog_config::shared::{IntoConnectOptions, PgConnectionConfig};
use sqlx::{PgPool, postgres::{PgConnectOptions, PgPoolOptions}};

/// Number of connections held by the syncer's pool.
///
/// Statements are issued one at a time, so a single connection is all a run needs.
const NUM_POOL_CONNECTIONS: u32 = 1;

/// Opens the connection used for a reconciliation run.
///
/// The pool eagerly establishes its only connection, so an unreachable database is
/// reported here rather than at the first statement.
pub async fn connect_to_database(config: &PgConnectionConfig) -> Result<PgPool, sqlx::Error> {
    let options: PgConnectOptions = config.with_db();

    let pool = PgPoolOptions::new()
        .min_connections(NUM_POOL_CONNECTIONS)
        .max_connections(NUM_POOL_CONNECTIONS)
        .connect_with(options)
        .await?;

    Ok(pool)
}
