//! Loan access facade: authorization and delegation to the borrow ledger

use chrono::Duration;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{borrow::BorrowDetails, student::Student, user::UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for a student.
    ///
    /// Non-staff callers may only borrow for their own student record;
    /// staff may borrow on behalf of any student.
    pub async fn borrow(
        &self,
        claims: &UserClaims,
        book_id: i32,
        student_id: i32,
    ) -> AppResult<BorrowDetails> {
        if !claims.is_staff() {
            let own = self.require_own_student(claims).await?;
            if own.id != student_id {
                return Err(AppError::Authorization(
                    "You may only borrow for your own student account".to_string(),
                ));
            }
        }

        let duration = Duration::days(self.config.duration_days);
        let borrow = self
            .repository
            .borrows
            .create(book_id, student_id, duration)
            .await?;

        self.repository.borrows.get_details(borrow.id).await
    }

    /// Return a borrow. Staff or the owning student may close it.
    pub async fn return_borrow(
        &self,
        claims: &UserClaims,
        borrow_id: i32,
    ) -> AppResult<BorrowDetails> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;

        if !claims.is_staff() {
            let own = self.require_own_student(claims).await?;
            if own.id != borrow.student_id {
                return Err(AppError::Authorization(
                    "You may only return your own borrows".to_string(),
                ));
            }
        }

        let closed = self.repository.borrows.mark_returned(borrow_id).await?;
        self.repository.borrows.get_details(closed.id).await
    }

    /// Get a student's borrows, most recent first. Staff or self.
    pub async fn list_for_student(
        &self,
        claims: &UserClaims,
        student_id: i32,
    ) -> AppResult<Vec<BorrowDetails>> {
        if !claims.is_staff() {
            let own = self.require_own_student(claims).await?;
            if own.id != student_id {
                return Err(AppError::Authorization(
                    "You may only view your own borrows".to_string(),
                ));
            }
        } else {
            // Surface a 404 for unknown students instead of an empty list
            self.repository.students.get_by_id(student_id).await?;
        }

        self.repository.borrows.list_for_student(student_id).await
    }

    /// Get the calling student's borrows, most recent first
    pub async fn list_own(&self, claims: &UserClaims) -> AppResult<Vec<BorrowDetails>> {
        let own = self.require_own_student(claims).await?;
        self.repository.borrows.list_for_student(own.id).await
    }

    /// Get all borrows, most recent first (staff view)
    pub async fn list_all(&self) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.list_all().await
    }

    async fn require_own_student(&self, claims: &UserClaims) -> AppResult<Student> {
        self.repository
            .students
            .get_by_user_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Authorization("Only students can borrow books".to_string())
            })
    }
}
