pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;
use sqlx::PgPool;

use repository::{BookRepository, PgBookRepository};
use service::BookService;

/// Book catalogue: create, fetch, list and soft-delete books
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    /// Module backed by the PostgreSQL pool
    pub fn new(pool: PgPool) -> Self {
        Self::with_repository(Arc::new(PgBookRepository::new(pool)))
    }

    pub fn with_repository(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            service: BookService::new(repository),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/create_books": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookInput" }
                                }
                            }
                        },
                        "responses": {
                            "200": message_response("Book created; see Location"),
                            "422": message_response("Body is not a valid book"),
                            "500": message_response("Book could not be saved")
                        }
                    }
                },
                "/delete_book/{id}": {
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter()],
                        "responses": {
                            "200": { "description": "Deleted, or no such book" },
                            "500": message_response("Missing id or delete failed")
                        }
                    }
                },
                "/get_book/{id}": {
                    "get": {
                        "summary": "Fetch a book by id",
                        "tags": ["Books"],
                        "parameters": [id_parameter()],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookResponse" }
                                    }
                                }
                            },
                            "404": message_response("Missing id or no such book")
                        }
                    }
                },
                "/books/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in id order",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookListResponse" }
                                    }
                                }
                            },
                            "400": message_response("Books could not be listed")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "author": { "type": ["string", "null"] },
                            "title": { "type": ["string", "null"] },
                            "publisher": { "type": ["string", "null"] },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "created_at", "updated_at"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "author": { "type": "string" },
                            "title": { "type": "string" },
                            "publisher": { "type": "string" }
                        }
                    },
                    "BookResponse": {
                        "type": "object",
                        "properties": {
                            "data": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["data"]
                    },
                    "BookListResponse": {
                        "type": "object",
                        "properties": {
                            "data": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["data"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id         BIGSERIAL   PRIMARY KEY,
                    author     TEXT,
                    title      TEXT,
                    publisher  TEXT,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    deleted_at TIMESTAMPTZ
                );
                CREATE INDEX IF NOT EXISTS idx_books_deleted_at ON books (deleted_at);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn message_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/MessageResponse" }
            }
        }
    })
}

fn id_parameter() -> serde_json::Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

/// Create the books module over the given pool
pub fn create_module(pool: PgPool) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(pool))
}
