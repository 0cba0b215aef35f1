use std::sync::Arc;

use super::error::BookError;
use super::models::{Book, BookId, BookInput};
use super::repository::BookRepository;

/// Book operations. Holds no state of its own; every call is one repository
/// round trip, or none when the identifier is rejected up front.
#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Store a new book. Empty or absent fields are stored as given.
    pub async fn create(&self, input: BookInput) -> Result<Book, BookError> {
        let book = self.repository.insert(&input).await?;
        tracing::info!(book_id = book.id, "book created");
        Ok(book)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        let id = parse_book_id(id)?;

        self.repository
            .find(id)
            .await?
            .ok_or(BookError::NotFound(id))
    }

    /// Snapshot of all live books in id order
    pub async fn list(&self) -> Result<Vec<Book>, BookError> {
        let books = self.repository.list().await?;
        tracing::debug!(count = books.len(), "books listed");
        Ok(books)
    }

    /// Soft-delete a book. An id that matches no live book is not an error.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), BookError> {
        let id = parse_book_id(id)?;

        let affected = self.repository.soft_delete(id).await?;
        if affected == 0 {
            tracing::debug!(book_id = id, "delete matched no live book");
        } else {
            tracing::info!(book_id = id, "book deleted");
        }

        Ok(())
    }
}

/// Parse a path identifier. Identifiers are positive integers.
pub fn parse_book_id(raw: &str) -> Result<BookId, BookError> {
    if raw.is_empty() {
        return Err(BookError::MissingId);
    }

    match raw.parse::<BookId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(BookError::MalformedId(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::memory::InMemoryBookRepository;
    use std::collections::HashSet;

    fn service() -> (BookService, Arc<InMemoryBookRepository>) {
        let repository = Arc::new(InMemoryBookRepository::new());
        (BookService::new(repository.clone()), repository)
    }

    fn input(author: &str, title: &str, publisher: &str) -> BookInput {
        BookInput {
            author: Some(author.to_string()),
            title: Some(title.to_string()),
            publisher: Some(publisher.to_string()),
        }
    }

    #[test]
    fn parse_rejects_empty_and_malformed_ids() {
        assert!(matches!(parse_book_id(""), Err(BookError::MissingId)));
        assert!(matches!(parse_book_id("abc"), Err(BookError::MalformedId(_))));
        assert!(matches!(parse_book_id("0"), Err(BookError::MalformedId(_))));
        assert!(matches!(parse_book_id("-3"), Err(BookError::MalformedId(_))));
        assert!(matches!(parse_book_id(" 4"), Err(BookError::MalformedId(_))));
        assert_eq!(parse_book_id("42").unwrap(), 42);
    }

    #[tokio::test]
    async fn created_book_can_be_read_back() {
        let (service, _) = service();

        let created = service
            .create(input("Ursula K. Le Guin", "The Dispossessed", "Harper & Row"))
            .await
            .unwrap();
        let fetched = service.get_by_id(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.author.as_deref(), Some("Ursula K. Le Guin"));
        assert_eq!(fetched.title.as_deref(), Some("The Dispossessed"));
        assert_eq!(fetched.publisher.as_deref(), Some("Harper & Row"));
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_accepts_missing_fields() {
        let (service, _) = service();

        let created = service.create(BookInput::default()).await.unwrap();
        assert_eq!(created.author, None);
        assert_eq!(created.title, None);
    }

    #[tokio::test]
    async fn empty_id_never_reaches_the_repository() {
        let (service, repository) = service();

        assert!(matches!(
            service.get_by_id("").await,
            Err(BookError::MissingId)
        ));
        assert!(matches!(
            service.delete_by_id("").await,
            Err(BookError::MissingId)
        ));
        assert_eq!(repository.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (service, _) = service();

        assert!(matches!(
            service.get_by_id("99").await,
            Err(BookError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn deleted_book_is_not_found_and_not_listed() {
        let (service, _) = service();

        let kept = service.create(input("A", "Kept", "P")).await.unwrap();
        let gone = service.create(input("B", "Gone", "P")).await.unwrap();

        service.delete_by_id(&gone.id.to_string()).await.unwrap();

        assert!(matches!(
            service.get_by_id(&gone.id.to_string()).await,
            Err(BookError::NotFound(id)) if id == gone.id
        ));

        let listed = service.list().await.unwrap();
        assert_eq!(listed, vec![kept]);
    }

    #[tokio::test]
    async fn deleting_a_missing_book_succeeds() {
        let (service, _) = service();

        service.delete_by_id("12345").await.unwrap();
    }

    #[tokio::test]
    async fn list_is_empty_without_books() {
        let (service, _) = service();

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_every_created_book_with_distinct_ids() {
        let (service, _) = service();

        for n in 0..5 {
            service
                .create(input("Author", &format!("Volume {}", n), "Press"))
                .await
                .unwrap();
        }

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 5);

        let ids: HashSet<BookId> = listed.iter().map(|book| book.id).collect();
        assert_eq!(ids.len(), 5);
        assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[tokio::test]
    async fn repository_failures_surface_as_persistence_errors() {
        let (service, repository) = service();
        repository.fail_all();

        assert!(matches!(
            service.create(BookInput::default()).await,
            Err(BookError::Persistence(_))
        ));
        assert!(matches!(
            service.list().await,
            Err(BookError::Persistence(_))
        ));
        assert!(matches!(
            service.get_by_id("1").await,
            Err(BookError::Persistence(_))
        ));
        assert!(matches!(
            service.delete_by_id("1").await,
            Err(BookError::Persistence(_))
        ));
    }
}
