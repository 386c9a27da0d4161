//! Authentication and account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        student::Student,
        user::{StudentSignup, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and return a JWT token with the user
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let student = self.repository.students.get_by_user_id(user.id).await?;
        let token = self.create_token(&user, student.as_ref())?;
        Ok((token, user))
    }

    /// Create a student account (user + student record)
    pub async fn signup(&self, request: StudentSignup) -> AppResult<(User, Student)> {
        request.validate()?;

        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create_student_account(
                &request.username,
                &hash,
                request.first_name.as_deref().unwrap_or(""),
                request.last_name.as_deref().unwrap_or(""),
                &request.enrollment,
                &request.branch,
            )
            .await
    }

    /// Get the authenticated user's account and linked student record
    pub async fn me(&self, user_id: i32) -> AppResult<(User, Option<Student>)> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let student = self.repository.students.get_by_user_id(user_id).await?;
        Ok((user, student))
    }

    fn create_token(&self, user: &User, student: Option<&Student>) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            student_id: student.map(|s| s.id),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
