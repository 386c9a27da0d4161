//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::borrow::BorrowDetails,
};

use super::AuthenticatedUser;

/// Borrow request. Accepts `book`/`book_id` and `student`/`student_id`
/// for compatibility with older clients.
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    #[serde(alias = "book_id")]
    pub book: Option<i32>,
    #[serde(alias = "student_id", alias = "member")]
    pub student: Option<i32>,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    #[serde(alias = "id")]
    pub borrow_id: Option<i32>,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    pub borrow: BorrowDetails,
}

/// Borrow a book for a student
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Borrow created", body = BorrowDetails),
        (status = 400, description = "Missing book or student"),
        (status = 403, description = "May only borrow for own student account"),
        (status = 404, description = "Book or student not found"),
        (status = 409, description = "Book unavailable or already borrowed")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowDetails>)> {
    let (book_id, student_id) = match (request.book, request.student) {
        (Some(book), Some(student)) => (book, student),
        _ => {
            return Err(AppError::Validation(
                "Both 'book' and 'student' are required".to_string(),
            ))
        }
    };

    let borrow = state
        .services
        .loans
        .borrow(&claims, book_id, student_id)
        .await?;

    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Missing borrow id"),
        (status = 403, description = "May only return own borrows"),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let borrow_id = request
        .borrow_id
        .ok_or_else(|| AppError::Validation("'borrow_id' is required".to_string()))?;

    let borrow = state.services.loans.return_borrow(&claims, borrow_id).await?;

    Ok(Json(ReturnResponse {
        message: "Book returned".to_string(),
        borrow,
    }))
}

/// List all borrows, most recent first (staff view)
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrows", body = Vec<BorrowDetails>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_staff()?;

    let borrows = state.services.loans.list_all().await?;
    Ok(Json(borrows))
}

/// List the calling student's borrows, most recent first
#[utoipa::path(
    get,
    path = "/borrows/mine",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own borrows", body = Vec<BorrowDetails>),
        (status = 403, description = "No student record")
    )
)]
pub async fn list_my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let borrows = state.services.loans.list_own(&claims).await?;
    Ok(Json(borrows))
}

/// Get a student's borrows, most recent first
#[utoipa::path(
    get,
    path = "/students/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student's borrows", body = Vec<BorrowDetails>),
        (status = 403, description = "Staff or self only"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(student_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let borrows = state
        .services
        .loans
        .list_for_student(&claims, student_id)
        .await?;
    Ok(Json(borrows))
}
