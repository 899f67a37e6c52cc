//! Catalog endpoints: books, authors and genres

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{BookDetails, CreateBook, UpdateBook},
        genre::Genre,
    },
};

use super::{auth::MessageResponse, AuthenticatedUser};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub msg: String,
    pub book_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<BookDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorsResponse {
    pub authors: Vec<Author>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

/// Add a book; author and genre are created when unknown
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = BookCreatedResponse),
        (status = 400, description = "Missing or empty fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let book_id = state.services.catalog.add_book(book).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            msg: "Book added".to_string(),
            book_id,
        }),
    ))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of books", body = BooksResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<BooksResponse>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(BooksResponse { books }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Update a book's title
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.update_book(id, update).await?;

    Ok(Json(MessageResponse {
        msg: "Book updated".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(id).await?;

    Ok(Json(MessageResponse {
        msg: "Book deleted".to_string(),
    }))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of authors", body = AuthorsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<AuthorsResponse>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(AuthorsResponse { authors }))
}

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of genres", body = GenresResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<GenresResponse>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(GenresResponse { genres }))
}
