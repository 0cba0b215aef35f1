//! PostgreSQL gateway: builds the connection pool from validated settings and
//! brings the schema up to date before any request is served.

mod connect;
mod error;
mod migrate;

pub use connect::{connect, connect_options};
pub use error::DbError;
pub use migrate::ensure_schema;

pub use sqlx::PgPool;
