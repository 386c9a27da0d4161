//! Borrows (loan ledger) repository for database operations

use chrono::{DateTime, Duration, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, Category},
        borrow::{Borrow, BorrowDetails},
        student::Student,
    },
};

use super::is_unique_violation;

const SELECT_DETAILS: &str = r#"
    SELECT br.id, br.borrowed_at, br.due_at, br.returned, br.returned_at,
           b.id AS book_id, b.name, b.isbn, b.author, b.category,
           NOT EXISTS(
               SELECT 1 FROM borrows o
               WHERE o.book_id = b.id AND NOT o.returned
           ) AS available,
           s.id AS student_id, s.user_id, s.enrollment, s.branch
    FROM borrows br
    JOIN books b ON br.book_id = b.id
    JOIN students s ON br.student_id = s.id
"#;

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))
    }

    /// Create a borrow after checking availability.
    ///
    /// The book row is locked FOR UPDATE for the duration of the
    /// check-then-insert, so concurrent borrows of the same book serialize
    /// here and exactly one wins. The partial unique index on open borrows
    /// backs the same invariant at the storage level.
    pub async fn create(
        &self,
        book_id: i32,
        student_id: i32,
        duration: Duration,
    ) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let book: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if book.is_none() {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        let student_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(&mut *tx)
                .await?;
        if !student_exists {
            return Err(AppError::NotFound(format!(
                "Student with id {} not found",
                student_id
            )));
        }

        let open_holder: Option<i32> =
            sqlx::query_scalar("SELECT student_id FROM borrows WHERE book_id = $1 AND NOT returned")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(holder) = open_holder {
            return Err(if holder == student_id {
                AppError::Conflict(
                    "You already have this book borrowed and not returned".to_string(),
                )
            } else {
                AppError::Conflict("Book is not available".to_string())
            });
        }

        let now = Utc::now();
        let due_at = now + duration;

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (book_id, student_id, borrowed_at, due_at, returned)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(student_id)
        .bind(now)
        .bind(due_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Book is not available".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        tx.commit().await?;
        Ok(borrow)
    }

    /// Close a borrow. The conditional update is atomic against the sweeper:
    /// whichever closes the row first wins, the loser matches zero rows.
    pub async fn mark_returned(&self, id: i32) -> AppResult<Borrow> {
        let now = Utc::now();

        let updated = sqlx::query_as::<_, Borrow>(
            r#"
            UPDATE borrows SET returned = TRUE, returned_at = $2
            WHERE id = $1 AND NOT returned
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(borrow) => Ok(borrow),
            // Zero rows: either the id is unknown (404) or already closed (409)
            None => {
                self.get_by_id(id).await?;
                Err(AppError::Conflict(
                    "This borrow is already returned".to_string(),
                ))
            }
        }
    }

    /// Bulk-close every open borrow past its due date, in one set-based
    /// update. Returns the number of borrows closed. Rows closed by a
    /// concurrent manual return simply fall out of the match set.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE borrows SET returned = TRUE, returned_at = $1 WHERE NOT returned AND due_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Get borrow with nested book and student
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowDetails> {
        let row = sqlx::query(&format!("{} WHERE br.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))?;

        Ok(map_details_row(&row))
    }

    /// Get a student's borrows, most recent first
    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(&format!(
            "{} WHERE br.student_id = $1 ORDER BY br.borrowed_at DESC",
            SELECT_DETAILS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_details_row).collect())
    }

    /// Get all borrows, most recent first
    pub async fn list_all(&self) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY br.borrowed_at DESC",
            SELECT_DETAILS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_details_row).collect())
    }

    /// Count open borrows
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE NOT returned")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count open borrows past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE NOT returned AND due_at < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count closed borrows
    pub async fn count_returned(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE returned")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn map_details_row(row: &PgRow) -> BorrowDetails {
    let borrow = Borrow {
        id: row.get("id"),
        book_id: row.get("book_id"),
        student_id: row.get("student_id"),
        borrowed_at: row.get("borrowed_at"),
        due_at: row.get("due_at"),
        returned: row.get("returned"),
        returned_at: row.get("returned_at"),
    };

    BorrowDetails {
        id: borrow.id,
        borrowed_at: borrow.borrowed_at,
        due_at: borrow.due_at,
        returned_at: borrow.returned_at,
        is_overdue: borrow.is_overdue(),
        returned: borrow.returned,
        student: Student {
            id: row.get("student_id"),
            user_id: row.get("user_id"),
            enrollment: row.get("enrollment"),
            branch: row.get("branch"),
        },
        book: Book {
            id: row.get("book_id"),
            name: row.get("name"),
            isbn: row.get("isbn"),
            author: row.get("author"),
            category: row.get::<Category, _>("category"),
            available: row.get("available"),
        },
    }
}
