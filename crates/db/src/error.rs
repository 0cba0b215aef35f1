use thiserror::Error;

/// Failures of the persistence gateway. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database configuration error: {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error("could not connect to database at {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("schema migration '{migration}' failed")]
    Schema {
        migration: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    pub(crate) fn configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn schema(migration: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Schema {
            migration: migration.into(),
            source,
        }
    }
}
