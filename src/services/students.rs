//! Student membership service

use crate::{
    error::AppResult,
    models::student::{Student, StudentDetails, UpdateStudent},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all students
    pub async fn list_students(&self) -> AppResult<Vec<StudentDetails>> {
        self.repository.students.list().await
    }

    /// Get student by ID with the linked user's name
    pub async fn get_student(&self, id: i32) -> AppResult<StudentDetails> {
        self.repository.students.get_details(id).await
    }

    /// Update enrollment/branch (staff only)
    pub async fn update_student(&self, id: i32, update: UpdateStudent) -> AppResult<Student> {
        self.repository.students.update(id, &update).await
    }
}
