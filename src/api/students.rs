//! Student management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentDetails, UpdateStudent},
};

use super::AuthenticatedUser;

/// List all students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of students", body = Vec<StudentDetails>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<StudentDetails>>> {
    claims.require_staff()?;

    let students = state.services.students.list_students().await?;
    Ok(Json(students))
}

/// Get student details by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentDetails),
        (status = 403, description = "Staff or self only"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<StudentDetails>> {
    if !claims.is_staff() && claims.student_id != Some(id) {
        return Err(AppError::Authorization(
            "You may only view your own student record".to_string(),
        ));
    }

    let student = state.services.students.get_student(id).await?;
    Ok(Json(student))
}

/// Update a student's enrollment or branch
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Enrollment already registered")
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    claims.require_staff()?;
    update.validate()?;

    let student = state.services.students.update_student(id, update).await?;
    Ok(Json(student))
}
