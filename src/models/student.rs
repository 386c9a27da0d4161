//! Student membership model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student record, linked 1:1 to a user account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub user_id: i32,
    pub enrollment: String,
    pub branch: String,
}

/// Student with the linked user's name, for staff listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentDetails {
    pub id: i32,
    pub user_id: i32,
    pub enrollment: String,
    pub branch: String,
    pub first_name: String,
    pub last_name: String,
}

/// Update student request (staff only; the user link is immutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 40, message = "Enrollment must be 1-40 characters"))]
    pub enrollment: Option<String>,
    #[validate(length(min = 1, max = 40, message = "Branch must be 1-40 characters"))]
    pub branch: Option<String>,
}
