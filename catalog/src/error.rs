//! Error types and result definitions for catalog synchronization.
//!
//! Every failure is carried by a single [`SyncError`] which records an [`ErrorKind`], a static
//! description, optional dynamic detail, the originating error and where it was raised.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Specific categories of errors that can occur during a reconciliation run.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Source Errors
    SourceUnreadable,
    SourceInvalid,

    // Store Errors
    StoreConnectionFailed,
    StoreAuthenticationFailed,
    StoreQueryFailed,
    StoreConstraintViolation,

    // Configuration Errors
    ConfigError,

    // General Errors
    InvalidState,
}

impl ErrorKind {
    /// Returns whether the error happened before any store interaction.
    pub fn is_source_error(&self) -> bool {
        matches!(self, ErrorKind::SourceUnreadable | ErrorKind::SourceInvalid)
    }
}

/// Main error type for catalog synchronization.
#[derive(Debug, Clone)]
pub struct SyncError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

impl SyncError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the static description of this error.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> &Backtrace {
        self.backtrace.as_ref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        SyncError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
            backtrace: Arc::new(Backtrace::capture()),
        }
    }
}

impl PartialEq for SyncError {
    fn eq(&self, other: &SyncError) -> bool {
        self.kind == other.kind && self.description == other.description
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = self.detail.as_deref() {
            if detail.trim().is_empty() {
                write!(f, "\n  Detail: <empty>")?;
            } else {
                write!(f, "\n  Detail:")?;
                for line in detail.lines() {
                    write!(f, "\n    {line}")?;
                }
            }
        }

        Ok(())
    }
}

impl error::Error for SyncError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`SyncError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for SyncError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> SyncError {
        SyncError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`SyncError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for SyncError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> SyncError {
        SyncError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`csv::Error`] to [`SyncError`].
///
/// Read failures map to [`ErrorKind::SourceUnreadable`], everything else (bad UTF-8,
/// malformed quoting) to [`ErrorKind::SourceInvalid`].
impl From<csv::Error> for SyncError {
    #[track_caller]
    fn from(err: csv::Error) -> SyncError {
        let (kind, description) = match err.kind() {
            csv::ErrorKind::Io(_) => (ErrorKind::SourceUnreadable, "Catalog file read failed"),
            _ => (ErrorKind::SourceInvalid, "Catalog file parsing failed"),
        };

        let detail = err.to_string();
        SyncError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Converts [`sqlx::Error`] to [`SyncError`] with the appropriate error kind.
///
/// Database errors are classified by SQLSTATE class, transport and pool failures map to
/// [`ErrorKind::StoreConnectionFailed`].
impl From<sqlx::Error> for SyncError {
    #[track_caller]
    fn from(err: sqlx::Error) -> SyncError {
        let (kind, description) = match &err {
            sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => (
                ErrorKind::StoreConnectionFailed,
                "PostgreSQL connection failed",
            ),
            sqlx::Error::Configuration(_) => {
                (ErrorKind::ConfigError, "PostgreSQL configuration invalid")
            }
            _ => (ErrorKind::StoreQueryFailed, "Database operation failed"),
        };

        let detail = err.to_string();
        SyncError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Maps a Postgres SQLSTATE code onto an [`ErrorKind`] using its two-character class.
fn classify_sqlstate(code: Option<&str>) -> (ErrorKind, &'static str) {
    let class = code.and_then(|code| code.get(..2));

    match class {
        // Connection exceptions (08xxx) and insufficient resources (53xxx)
        Some("08") | Some("53") => (
            ErrorKind::StoreConnectionFailed,
            "PostgreSQL connection failed",
        ),
        // Invalid authorization (28xxx)
        Some("28") => (
            ErrorKind::StoreAuthenticationFailed,
            "PostgreSQL authentication failed",
        ),
        // Integrity constraint violations (23xxx)
        Some("23") => (
            ErrorKind::StoreConstraintViolation,
            "PostgreSQL constraint violation",
        ),
        // Database does not exist, among other invalid catalog names (3Dxxx)
        Some("3D") => (
            ErrorKind::StoreConnectionFailed,
            "PostgreSQL database does not exist",
        ),
        _ => (ErrorKind::StoreQueryFailed, "PostgreSQL statement failed"),
    }
}
