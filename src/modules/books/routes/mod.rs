//! HTTP endpoints of the books module, mounted under `/api`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use bookshelf_http::{router::API_PREFIX, AppError, MessageBody};
use serde::{Deserialize, Serialize};

use super::error::BookError;
use super::models::{Book, BookInput};
use super::service::BookService;

const ID_CAN_NOT_BE_EMPTY: &str = "id can not be empty";

/// Success body carrying a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/create_books", post(create_book))
        .route("/delete_book/", delete(delete_book_without_id))
        .route("/delete_book/{id}", delete(delete_book))
        .route("/get_book/", get(get_book_without_id))
        .route("/get_book/{id}", get(get_book))
        .route("/books", get(list_books))
        .route("/books/", get(list_books))
        .with_state(service)
}

/// POST /api/create_books
async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload.map_err(|rejection| {
        AppError::unprocessable("request failed").with_source(rejection)
    })?;

    let book = service
        .create(input)
        .await
        .map_err(|err| AppError::internal("could not save book").with_source(err))?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, format!("{}/get_book/{}", API_PREFIX, book.id))],
        Json(MessageBody::new("book created")),
    ))
}

/// DELETE /api/delete_book/{id}
async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_book(&service, &id).await
}

/// DELETE /api/delete_book/
async fn delete_book_without_id(
    State(service): State<BookService>,
) -> Result<StatusCode, AppError> {
    remove_book(&service, "").await
}

async fn remove_book(service: &BookService, id: &str) -> Result<StatusCode, AppError> {
    match service.delete_by_id(id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(BookError::MissingId) => Err(AppError::internal(ID_CAN_NOT_BE_EMPTY)),
        Err(err) => Err(AppError::internal("could not delete book by id").with_source(err)),
    }
}

/// GET /api/get_book/{id}
async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Book>>, AppError> {
    fetch_book(&service, &id).await
}

/// GET /api/get_book/
async fn get_book_without_id(
    State(service): State<BookService>,
) -> Result<Json<DataResponse<Book>>, AppError> {
    fetch_book(&service, "").await
}

async fn fetch_book(service: &BookService, id: &str) -> Result<Json<DataResponse<Book>>, AppError> {
    match service.get_by_id(id).await {
        Ok(book) => Ok(Json(DataResponse { data: book })),
        Err(BookError::MissingId) => Err(AppError::not_found(ID_CAN_NOT_BE_EMPTY)),
        Err(err) => Err(AppError::not_found("book not found").with_source(err)),
    }
}

/// GET /api/books/
async fn list_books(
    State(service): State<BookService>,
) -> Result<Json<DataResponse<Vec<Book>>>, AppError> {
    let books = service
        .list()
        .await
        .map_err(|err| AppError::bad_request("could not get all books").with_source(err))?;

    Ok(Json(DataResponse { data: books }))
}
