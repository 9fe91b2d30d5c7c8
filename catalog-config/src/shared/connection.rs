use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::sync::LazyLock;

const APP_NAME_CATALOG_SYNCER: &str = "catalog_syncer";

/// Session settings applied to every connection opened by the syncer.
pub static CATALOG_SYNC_OPTIONS: LazyLock<PgConnectionOptions> =
    LazyLock::new(|| PgConnectionOptions {
        datestyle: "ISO".to_string(),
        client_encoding: "UTF8".to_string(),
        timezone: "UTC".to_string(),
        statement_timeout: 30_000,
        lock_timeout: 10_000,
        application_name: APP_NAME_CATALOG_SYNCER.to_string(),
    });

/// Postgres session parameters sent at connection startup.
#[derive(Debug, Clone)]
pub struct PgConnectionOptions {
    pub datestyle: String,
    pub client_encoding: String,
    pub timezone: String,
    pub statement_timeout: u32,
    pub lock_timeout: u32,
    pub application_name: String,
}

impl PgConnectionOptions {
    /// Returns the options as key-value pairs suitable for sqlx.
    ///
    /// The application name is not part of the list since sqlx sets it through a
    /// dedicated startup parameter.
    pub fn to_key_value_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("datestyle".to_string(), self.datestyle.clone()),
            ("client_encoding".to_string(), self.client_encoding.clone()),
            ("timezone".to_string(), self.timezone.clone()),
            (
                "statement_timeout".to_string(),
                self.statement_timeout.to_string(),
            ),
            ("lock_timeout".to_string(), self.lock_timeout.to_string()),
        ]
    }
}

/// Connection parameters for the database holding the products table.
///
/// Every field is optional: an unset value leaves the parameter to the connector, which
/// falls back to its own defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PgConnectionConfig {
    /// Hostname or IP address of the Postgres server.
    pub host: Option<String>,
    /// Port on which the Postgres server is listening.
    pub port: Option<u16>,
    /// Name of the database to connect to.
    pub name: Option<String>,
    /// User to authenticate as.
    pub username: Option<String>,
    /// Password for `username`. Redacted in debug output.
    pub password: Option<SecretString>,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// TLS settings for Postgres connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TlsConfig {
    /// Whether TLS is enabled for the connection.
    #[serde(default)]
    pub enabled: bool,
    /// PEM-encoded trusted root certificates.
    ///
    /// When empty and TLS is enabled the connection is encrypted but the server
    /// certificate is not verified.
    #[serde(default)]
    pub trusted_root_certs: String,
}

impl TlsConfig {
    /// Returns the sqlx SSL mode matching this configuration.
    pub fn ssl_mode(&self) -> PgSslMode {
        match (self.enabled, self.trusted_root_certs.is_empty()) {
            (false, _) => PgSslMode::Disable,
            (true, true) => PgSslMode::Require,
            (true, false) => PgSslMode::VerifyFull,
        }
    }
}

/// Converts the configuration into crate-specific connect options.
pub trait IntoConnectOptions<Output> {
    /// Creates connect options that do not select a database.
    ///
    /// Useful for administrative statements such as `create database`.
    fn without_db(&self) -> Output;

    /// Creates connect options for the configured database.
    fn with_db(&self) -> Output;
}

impl IntoConnectOptions<PgConnectOptions> for PgConnectionConfig {
    fn without_db(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new_without_pgpass()
            .ssl_mode(self.tls.ssl_mode())
            .application_name(&CATALOG_SYNC_OPTIONS.application_name)
            .options(CATALOG_SYNC_OPTIONS.to_key_value_pairs());

        if let Some(host) = &self.host {
            options = options.host(host);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(username) = &self.username {
            options = options.username(username);
        }
        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }
        if self.tls.enabled && !self.tls.trusted_root_certs.is_empty() {
            options =
                options.ssl_root_cert_from_pem(self.tls.trusted_root_certs.clone().into_bytes());
        }

        options
    }

    fn with_db(&self) -> PgConnectOptions {
        let options: PgConnectOptions = self.without_db();
        match &self.name {
            Some(name) => options.database(name),
            None => options,
        }
    }
}
