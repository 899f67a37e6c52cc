//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{BookDetails, CreateBook, UpdateBook},
        genre::Genre,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book, creating its author and genre rows when they do not
    /// exist yet. Returns the new book's id.
    pub async fn add_book(&self, book: CreateBook) -> AppResult<i64> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let author = self
            .repository
            .catalog
            .authors_find_or_create(&book.author_name)
            .await?;
        let genre = self
            .repository
            .catalog
            .genres_find_or_create(&book.genre_name)
            .await?;

        let id = self
            .repository
            .catalog
            .books_create(&book.title, author.id, genre.id)
            .await?;

        tracing::debug!(book_id = id, author_id = author.id, genre_id = genre.id, "book added");
        Ok(id)
    }

    /// List all books with author and genre names resolved
    pub async fn list_books(&self) -> AppResult<Vec<BookDetails>> {
        self.repository.catalog.books_list().await
    }

    /// Get a single book by id
    pub async fn get_book(&self, id: i64) -> AppResult<BookDetails> {
        self.repository
            .catalog
            .books_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Update a book. Only the title can change; a request without a title
    /// leaves the book as is.
    pub async fn update_book(&self, id: i64, update: UpdateBook) -> AppResult<()> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .catalog
            .books_get_row(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if let Some(ref title) = update.title {
            self.repository.catalog.books_update_title(id, title).await?;
        }

        Ok(())
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        if !self.repository.catalog.books_delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// List all authors
    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.catalog.authors_list().await
    }

    /// List all genres
    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.catalog.genres_list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> CatalogService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        CatalogService::new(Repository::new(pool))
    }

    fn dune() -> CreateBook {
        CreateBook {
            title: "Dune".to_string(),
            author_name: "Frank Herbert".to_string(),
            genre_name: "Science Fiction".to_string(),
        }
    }

    #[tokio::test]
    async fn add_book_creates_author_and_genre() {
        let service = service().await;
        let id = service.add_book(dune()).await.unwrap();

        let book = service.get_book(id).await.unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.genre, "Science Fiction");

        assert_eq!(service.list_authors().await.unwrap().len(), 1);
        assert_eq!(service.list_genres().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_book_reuses_existing_author_and_genre() {
        let service = service().await;
        service.add_book(dune()).await.unwrap();
        service
            .add_book(CreateBook {
                title: "Dune Messiah".to_string(),
                ..dune()
            })
            .await
            .unwrap();

        assert_eq!(service.list_books().await.unwrap().len(), 2);
        assert_eq!(service.list_authors().await.unwrap().len(), 1);
        assert_eq!(service.list_genres().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_book_rejects_empty_fields() {
        let service = service().await;
        let err = service
            .add_book(CreateBook {
                title: String::new(),
                ..dune()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_book_missing_is_not_found() {
        let service = service().await;
        let err = service.get_book(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_book_changes_title() {
        let service = service().await;
        let id = service.add_book(dune()).await.unwrap();

        service
            .update_book(
                id,
                UpdateBook {
                    title: Some("Dune (revised)".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(service.get_book(id).await.unwrap().title, "Dune (revised)");
    }

    #[tokio::test]
    async fn update_book_without_title_is_a_noop() {
        let service = service().await;
        let id = service.add_book(dune()).await.unwrap();

        service.update_book(id, UpdateBook { title: None }).await.unwrap();
        assert_eq!(service.get_book(id).await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn update_missing_book_is_not_found() {
        let service = service().await;
        let err = service
            .update_book(404, UpdateBook { title: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_book_removes_row() {
        let service = service().await;
        let id = service.add_book(dune()).await.unwrap();

        service.delete_book(id).await.unwrap();
        let err = service.delete_book(id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
