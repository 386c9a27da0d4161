//! Students repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentDetails, UpdateStudent},
};

use super::is_unique_violation;

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Get the student record linked to a user account, if any
    pub async fn get_by_user_id(&self, user_id: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    /// Get student with the linked user's name
    pub async fn get_details(&self, id: i32) -> AppResult<StudentDetails> {
        sqlx::query_as::<_, StudentDetails>(
            r#"
            SELECT s.id, s.user_id, s.enrollment, s.branch, u.first_name, u.last_name
            FROM students s
            JOIN users u ON s.user_id = u.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// List all students, ordered by enrollment
    pub async fn list(&self) -> AppResult<Vec<StudentDetails>> {
        let students = sqlx::query_as::<_, StudentDetails>(
            r#"
            SELECT s.id, s.user_id, s.enrollment, s.branch, u.first_name, u.last_name
            FROM students s
            JOIN users u ON s.user_id = u.id
            ORDER BY s.enrollment
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Update enrollment and/or branch
    pub async fn update(&self, id: i32, update: &UpdateStudent) -> AppResult<Student> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET enrollment = COALESCE($1, enrollment),
                branch = COALESCE($2, branch)
            WHERE id = $3
            "#,
        )
        .bind(update.enrollment.as_deref())
        .bind(update.branch.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A student with this enrollment already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Student with id {} not found",
                id
            )));
        }

        self.get_by_id(id).await
    }

    /// Count all students
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
