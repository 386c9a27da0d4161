//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::is_unique_violation;

// Availability is derived: a book is available iff no open borrow references it.
const SELECT_BOOK: &str = r#"
    SELECT b.id, b.name, b.isbn, b.author, b.category,
           NOT EXISTS(
               SELECT 1 FROM borrows br
               WHERE br.book_id = b.id AND NOT br.returned
           ) AS available
    FROM books b
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", SELECT_BOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books with optional filters, ordered by name
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR b.category = $1)
              AND ($2::text IS NULL
                   OR b.name ILIKE '%' || $2 || '%'
                   OR b.author ILIKE '%' || $2 || '%'
                   OR b.isbn = $2)
              AND ($3::bool IS NULL OR NOT EXISTS(
                       SELECT 1 FROM borrows br
                       WHERE br.book_id = b.id AND NOT br.returned
                   ) = $3)
            ORDER BY b.name
            "#,
            SELECT_BOOK
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(query.category.map(|c| c.as_str().to_string()))
            .bind(query.search.as_deref())
            .bind(query.available)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Check if a book with this ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (name, isbn, author, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.name)
        .bind(&book.isbn)
        .bind(&book.author)
        .bind(book.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A book with this ISBN already exists".to_string())
            } else {
                e.into()
            }
        })?;

        self.get_by_id(id).await
    }

    /// Update an existing book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let result = sqlx::query(
            "UPDATE books SET name = $1, isbn = $2, author = $3, category = $4 WHERE id = $5",
        )
        .bind(&book.name)
        .bind(&book.isbn)
        .bind(&book.author)
        .bind(book.category)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A book with this ISBN already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete a book (borrow history cascades)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Count all books
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books with no open borrow
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books b
            WHERE NOT EXISTS(
                SELECT 1 FROM borrows br
                WHERE br.book_id = b.id AND NOT br.returned
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
