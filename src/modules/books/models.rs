use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Server-assigned book identifier (`BIGSERIAL`).
pub type BookId = i64;

/// A row of the `books` table.
///
/// `deleted_at` is set by a soft delete; rows carrying it are never returned
/// by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub author: Option<String>,
    pub title: Option<String>,
    pub publisher: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<OffsetDateTime>,
}

/// Client-supplied fields for a new book. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_fields_are_optional() {
        let input: BookInput = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("Dune"));
        assert_eq!(input.author, None);
        assert_eq!(input.publisher, None);
    }

    #[test]
    fn live_book_omits_deletion_marker() {
        let now = OffsetDateTime::now_utc();
        let book = Book {
            id: 7,
            author: Some("Frank Herbert".to_string()),
            title: Some("Dune".to_string()),
            publisher: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["author"], "Frank Herbert");
        assert!(value["publisher"].is_null());
        assert!(value.get("deleted_at").is_none());
        assert!(value["created_at"].is_string());
    }
}
