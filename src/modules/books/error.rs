use thiserror::Error;

use super::models::BookId;

/// Failures of the book service.
///
/// `MissingId` and `MalformedId` are raised before any statement is issued.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("id can not be empty")]
    MissingId,

    #[error("'{0}' is not a valid book id")]
    MalformedId(String),

    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("database operation failed")]
    Persistence(#[from] sqlx::Error),
}
