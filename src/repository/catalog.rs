//! Catalog repository: books, authors and genres

use sqlx::{Pool, Sqlite};

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{Book, BookDetails},
        genre::Genre,
    },
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Sqlite>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Look up an author by name, creating the row when absent.
    ///
    /// Uses `INSERT .. ON CONFLICT DO NOTHING` followed by a select so two
    /// concurrent creates of the same name both land on the same row.
    pub async fn authors_find_or_create(&self, name: &str) -> AppResult<Author> {
        sqlx::query("INSERT INTO authors (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let author =
            sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE name = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(author)
    }

    /// List all authors ordered by name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    /// Look up a genre by name, creating the row when absent.
    pub async fn genres_find_or_create(&self, name: &str) -> AppResult<Genre> {
        sqlx::query("INSERT INTO genres (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(genre)
    }

    /// List all genres ordered by name
    pub async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    /// Insert a book and return its id
    pub async fn books_create(
        &self,
        title: &str,
        author_id: i64,
        genre_id: i64,
    ) -> AppResult<i64> {
        let result =
            sqlx::query("INSERT INTO books (title, author_id, genre_id) VALUES (?, ?, ?)")
                .bind(title)
                .bind(author_id)
                .bind(genre_id)
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// List all books with author and genre names resolved
    pub async fn books_list(&self) -> AppResult<Vec<BookDetails>> {
        let books = sqlx::query_as::<_, BookDetails>(
            r#"
            SELECT b.id, b.title, a.name AS author, g.name AS genre
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN genres g ON g.id = b.genre_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get a book with author and genre names resolved
    pub async fn books_get(&self, id: i64) -> AppResult<Option<BookDetails>> {
        let book = sqlx::query_as::<_, BookDetails>(
            r#"
            SELECT b.id, b.title, a.name AS author, g.name AS genre
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN genres g ON g.id = b.genre_id
            WHERE b.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Get a raw book row
    pub async fn books_get_row(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, genre_id FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Update a book's title
    pub async fn books_update_title(&self, id: i64, title: &str) -> AppResult<()> {
        sqlx::query("UPDATE books SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a book. Returns whether a row was removed.
    pub async fn books_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
