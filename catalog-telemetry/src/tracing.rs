use std::sync::Once;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at `info` when `RUST_LOG` is unset.
const DEFAULT_INFO_TARGETS: &[&str] = &["catalog", "catalog_postgres"];

static INIT_TEST_TRACING: Once = Once::new();

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to install the tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the background log writer alive.
///
/// Buffered lines are flushed when this value is dropped, so hold it until the
/// process is about to exit.
#[must_use = "dropping the flusher stops the log writer"]
pub struct LogFlusher {
    _guard: WorkerGuard,
}

/// Installs the global subscriber for a binary.
///
/// Events go to stdout through a non-blocking writer. `RUST_LOG` takes precedence;
/// without it `app_name` and the catalog crates log at `info` and everything else at
/// `warn`.
pub fn init_tracing(app_name: &str) -> Result<LogFlusher, TracingError> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(app_name)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .try_init()?;

    Ok(LogFlusher { _guard: guard })
}

/// Installs a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

fn default_directives(app_name: &str) -> String {
    let mut directives = vec!["warn".to_owned()];
    let app_target = app_name.replace('-', "_");

    for target in DEFAULT_INFO_TARGETS.iter().copied().chain([app_target.as_str()]) {
        directives.push(format!("{target}=info"));
    }

    directives.join(",")
}
