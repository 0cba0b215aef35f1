use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Book, BookId, BookInput};

/// Storage seam for books. Each call maps to exactly one statement.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new row and return it with its assigned id and timestamps
    async fn insert(&self, input: &BookInput) -> Result<Book, sqlx::Error>;

    /// Fetch a live (not soft-deleted) book
    async fn find(&self, id: BookId) -> Result<Option<Book>, sqlx::Error>;

    /// All live books ordered by id
    async fn list(&self) -> Result<Vec<Book>, sqlx::Error>;

    /// Mark a live book as deleted; returns the number of rows touched
    async fn soft_delete(&self, id: BookId) -> Result<u64, sqlx::Error>;
}

const BOOK_COLUMNS: &str = "id, author, title, publisher, created_at, updated_at, deleted_at";

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn insert(&self, input: &BookInput) -> Result<Book, sqlx::Error> {
        let sql = format!(
            "INSERT INTO books (author, title, publisher) VALUES ($1, $2, $3) RETURNING {}",
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&sql)
            .bind(input.author.as_deref())
            .bind(input.title.as_deref())
            .bind(input.publisher.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    async fn find(&self, id: BookId) -> Result<Option<Book>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM books WHERE id = $1 AND deleted_at IS NULL",
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self) -> Result<Vec<Book>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM books WHERE deleted_at IS NULL ORDER BY id",
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await
    }

    async fn soft_delete(&self, id: BookId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE books SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-process stand-in for [`PgBookRepository`] used by service and router tests.

    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::BookRepository;
    use crate::modules::books::models::{Book, BookId, BookInput};

    #[derive(Default)]
    pub struct InMemoryBookRepository {
        rows: Mutex<BTreeMap<BookId, Book>>,
        next_id: Mutex<BookId>,
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl InMemoryBookRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of statements issued so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Make every subsequent statement fail as if the connection dropped
        pub fn fail_all(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        fn enter(&self) -> Result<(), sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(sqlx::Error::PoolClosed);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BookRepository for InMemoryBookRepository {
        async fn insert(&self, input: &BookInput) -> Result<Book, sqlx::Error> {
            self.enter()?;

            let id = {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                *next_id
            };
            let now = OffsetDateTime::now_utc();
            let book = Book {
                id,
                author: input.author.clone(),
                title: input.title.clone(),
                publisher: input.publisher.clone(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };

            self.rows.lock().unwrap().insert(id, book.clone());
            Ok(book)
        }

        async fn find(&self, id: BookId) -> Result<Option<Book>, sqlx::Error> {
            self.enter()?;

            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(&id)
                .filter(|book| book.deleted_at.is_none())
                .cloned())
        }

        async fn list(&self) -> Result<Vec<Book>, sqlx::Error> {
            self.enter()?;

            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|book| book.deleted_at.is_none())
                .cloned()
                .collect())
        }

        async fn soft_delete(&self, id: BookId) -> Result<u64, sqlx::Error> {
            self.enter()?;

            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(book) if book.deleted_at.is_none() => {
                    book.deleted_at = Some(OffsetDateTime::now_utc());
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }
}
