//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        student::Student,
        user::{Role, StudentSignup, User},
    },
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public user representation
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserInfo,
}

/// Signup response: the new account and its student record
#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    pub user: UserInfo,
    pub student: Student,
}

/// Current user response
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserInfo,
    pub student: Option<Student>,
}

/// Authenticate and obtain a JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserInfo::from(&user),
    }))
}

/// Create a student account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = StudentSignup,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or enrollment already taken")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(request): Json<StudentSignup>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let (user, student) = state.services.users.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: UserInfo::from(&user),
            student,
        }),
    ))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let (user, student) = state.services.users.me(claims.user_id).await?;

    Ok(Json(MeResponse {
        user: UserInfo::from(&user),
        student,
    }))
}
