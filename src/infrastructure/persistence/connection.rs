//! Connection settings and the shared pool handle used by the PostgreSQL stores.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{Instrument, Span, warn};
use url::Url;

use crate::domain::store::StoreError;

/// URI scheme of the relational backend.
pub const SCHEME: &str = "postgres";

/// Transport encryption mode sent with every connection.
pub const SSL_MODE: &str = "disable";

/// Session timezone pinned for every connection.
pub const TIMEZONE: &str = "utc";

/// Network handshake timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the database.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// `host:port`, e.g. `localhost:5432`.
    pub address: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Upper bound for a single store operation.
    pub operation_timeout: Duration,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl ConnectionSettings {
    /// Builds `postgres://<user>:<password>@<address>/<database>?sslmode=disable&timezone=utc&connect_timeout=10`.
    ///
    /// Credentials are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `address` is not a valid `host[:port]`.
    pub fn connection_uri(&self) -> Result<Url, StoreError> {
        let mut uri = Url::parse(&format!("{SCHEME}://{}/", self.address)).map_err(|e| {
            StoreError::Validation(format!("invalid database address '{}': {e}", self.address))
        })?;

        if !uri.has_host()
            || uri.path() != "/"
            || uri.query().is_some()
            || uri.fragment().is_some()
            || !uri.username().is_empty()
        {
            return Err(StoreError::Validation(format!(
                "invalid database address '{}'",
                self.address
            )));
        }

        uri.set_username(&self.username)
            .and_then(|()| uri.set_password(Some(&self.password)))
            .map_err(|()| {
                StoreError::Validation(format!(
                    "database address '{}' cannot carry credentials",
                    self.address
                ))
            })?;

        uri.path_segments_mut()
            .map_err(|()| {
                StoreError::Validation(format!("invalid database address '{}'", self.address))
            })?
            .clear()
            .push(&self.database);

        uri.query_pairs_mut()
            .append_pair("sslmode", SSL_MODE)
            .append_pair("timezone", TIMEZONE)
            .append_pair("connect_timeout", &CONNECT_TIMEOUT_SECS.to_string());

        Ok(uri)
    }

    /// Returns the connection URI with the password masked, for logging.
    pub fn redacted_uri(&self) -> String {
        match self.connection_uri() {
            Ok(mut uri) => {
                let _ = uri.set_password(Some("***"));
                uri.to_string()
            }
            Err(_) => format!("{SCHEME}://{}/{}", self.address, self.database),
        }
    }

    /// Translates the connection URI into driver options.
    ///
    /// `timezone` becomes a session parameter and `connect_timeout` is applied
    /// by [`ConnectionSettings::pool_options`], since the driver does not read
    /// either from the query string.
    pub(crate) fn connect_options(&self) -> Result<PgConnectOptions, StoreError> {
        let uri = self.connection_uri()?;

        let mut driver_uri = uri.clone();
        driver_uri
            .query_pairs_mut()
            .clear()
            .append_pair("sslmode", SSL_MODE);

        let options = PgConnectOptions::from_url(&driver_uri)
            .map_err(|e| StoreError::connection("connecting to database", e))?
            .options([("timezone", TIMEZONE)]);

        Ok(options)
    }

    pub(crate) fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    }
}

/// Non-owning view of the facade's pool, shared by the sub-stores.
///
/// Bounds every operation by the configured timeout and runs it inside a
/// child of the span the facade was constructed with.
#[derive(Clone)]
pub(crate) struct PgHandle {
    pool: Arc<PgPool>,
    timeout: Duration,
    span: Span,
}

impl PgHandle {
    pub(crate) fn new(pool: Arc<PgPool>, timeout: Duration, span: Span) -> Self {
        Self {
            pool,
            timeout,
            span,
        }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    /// Awaits `fut` within the operation timeout.
    ///
    /// Dropping the returned future cancels the in-flight query.
    pub(crate) async fn run<F>(&self, operation: &'static str, fut: F) -> Result<F::Output, StoreError>
    where
        F: Future,
    {
        let span = tracing::debug_span!(parent: &self.span, "db", operation);
        tokio::time::timeout(self.timeout, fut)
            .instrument(span)
            .await
            .map_err(|_| {
                warn!(parent: &self.span, operation, timeout = ?self.timeout, "Store operation timed out");
                StoreError::Timeout { operation }
            })
    }
}
