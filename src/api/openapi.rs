//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, stats, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendery API",
        version = "1.0.0",
        description = "Library Lending System REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::signup,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Students
        students::list_students,
        students::get_student,
        students::update_student,
        // Borrows
        borrows::borrow_book,
        borrows::return_book,
        borrows::list_borrows,
        borrows::list_my_borrows,
        borrows::get_student_borrows,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::SignupResponse,
            auth::MeResponse,
            crate::models::user::StudentSignup,
            crate::models::user::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::Category,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            // Students
            crate::models::student::Student,
            crate::models::student::StudentDetails,
            crate::models::student::UpdateStudent,
            // Borrows
            borrows::BorrowRequest,
            borrows::ReturnRequest,
            borrows::ReturnResponse,
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowDetails,
            // Stats
            crate::services::stats::StatsResponse,
            crate::services::stats::BookStats,
            crate::services::stats::StudentStats,
            crate::services::stats::BorrowStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "students", description = "Student management"),
        (name = "borrows", description = "Borrow and return operations"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
