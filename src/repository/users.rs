//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        student::Student,
        user::{Role, User},
    },
};

use super::{is_unique_violation, violated_constraint};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (primary authentication method)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    /// Create a student account: the user and its student record in one
    /// transaction, so a half-created signup can never be observed.
    pub async fn create_student_account(
        &self,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        enrollment: &str,
        branch: &str,
    ) -> AppResult<(User, Student)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(Role::Student)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_signup_conflict)?;

        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (user_id, enrollment, branch)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(enrollment)
        .bind(branch)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_signup_conflict)?;

        tx.commit().await?;
        Ok((user, student))
    }
}

fn map_signup_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        match violated_constraint(&e).as_deref() {
            Some("students_enrollment_key") => {
                AppError::Conflict("A student with this enrollment already exists".to_string())
            }
            _ => AppError::Conflict("This username is already taken".to_string()),
        }
    } else {
        e.into()
    }
}
