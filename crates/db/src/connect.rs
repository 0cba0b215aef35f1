use std::time::Duration;

use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::DbError;

/// Translate settings into driver options, rejecting empty or malformed values.
///
/// No I/O happens here, so configuration mistakes surface before any
/// connection attempt.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    if let Some(field) = settings.first_missing_field() {
        return Err(DbError::configuration(field, "value must not be empty"));
    }

    let port: u16 = settings.port.trim().parse().map_err(|_| {
        DbError::configuration("port", format!("'{}' is not a valid port", settings.port))
    })?;

    let ssl_mode: PgSslMode = settings.ssl_mode.trim().parse().map_err(|_| {
        DbError::configuration(
            "ssl_mode",
            format!(
                "'{}' is not one of disable/allow/prefer/require/verify-ca/verify-full",
                settings.ssl_mode
            ),
        )
    })?;

    Ok(PgConnectOptions::new()
        .host(settings.host.trim())
        .port(port)
        .username(&settings.user)
        .password(&settings.password)
        .database(settings.name.trim())
        .ssl_mode(ssl_mode))
}

/// Open the connection pool. The first connection is established eagerly so an
/// unreachable or misconfigured database fails here rather than on the first request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;
    let endpoint = settings.endpoint();

    tracing::info!(
        endpoint = %endpoint,
        max_connections = settings.max_connections,
        "connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .connect_with(options)
        .await
        .map_err(|source| DbError::Connection {
            endpoint: endpoint.clone(),
            source,
        })?;

    tracing::info!(endpoint = %endpoint, "database connection established");
    Ok(pool)
}
