//! Book model and related request types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book row as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub genre_id: i64,
}

/// Book with author and genre names resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookDetails {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
}

/// Create book request. Author and genre are referenced by name and
/// created on the fly when unknown.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author name must not be empty"))]
    pub author_name: String,
    #[validate(length(min = 1, message = "Genre name must not be empty"))]
    pub genre_name: String,
}

/// Update book request. Only the title can change; omitting it leaves the
/// book untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
}
