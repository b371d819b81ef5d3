//! Authentication and user management endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{created, require_field, success, ApiResult};
use crate::auth::{self, AuthUser};
use crate::errors::AppError;
use crate::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User, UserRole,
};
use crate::AppState;

/// POST /api/auth/register - Create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let username = require_field(&request.username, "Username is required")?;
    let email = require_field(&request.email, "Email is required")?;
    let password = require_field(&request.password, "Password is required")?;

    let password_hash = auth::hash_password(password)?;
    let full_name = request.full_name.as_deref().unwrap_or(username);

    let user = state
        .repo
        .create_user(username, email, &password_hash, Some(full_name), UserRole::User)
        .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    let token = auth::issue_token(&user.id, &state.config.jwt_secret)?;
    created(AuthResponse { token, user })
}

/// POST /api/auth/login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = require_field(&request.email, "Email is required")?;
    let password = require_field(&request.password, "Password is required")?;

    // Unknown email and wrong password produce the same response.
    let credentials = state
        .repo
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !credentials.user.is_active {
        return Err(AppError::Forbidden(
            "Account is deactivated. Please contact support.".to_string(),
        ));
    }

    if !auth::verify_password(password, &credentials.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    state.repo.update_last_login(&credentials.user.id).await?;

    let token = auth::issue_token(&credentials.user.id, &state.config.jwt_secret)?;
    success(AuthResponse {
        token,
        user: credentials.user,
    })
}

/// GET /api/auth/me - Current user.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<User> {
    let user = auth::current_user(&state.repo, &auth).await?;
    success(user)
}

/// POST /api/auth/logout - Stateless acknowledgement; the client drops
/// the token.
pub async fn logout() -> ApiResult<serde_json::Value> {
    success(serde_json::json!({ "message": "Logout successful" }))
}

/// GET /api/auth/users - List all users (admin only).
pub async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<User>> {
    auth::require_admin(&state.repo, &auth).await?;
    let users = state.repo.list_users().await?;
    success(users)
}

/// PUT /api/auth/users/:id - Update a user's role, active flag or name
/// (admin only). An admin cannot change their own role.
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let caller = auth::require_admin(&state.repo, &auth).await?;

    let role = match request.role.as_deref() {
        Some(r) => Some(
            UserRole::from_str(r)
                .ok_or_else(|| AppError::Validation(format!("Invalid role: {:?}", r)))?,
        ),
        None => None,
    };

    if caller.id == id && role.is_some_and(|r| r != caller.role) {
        return Err(AppError::Forbidden(
            "Cannot change your own role".to_string(),
        ));
    }

    let user = state
        .repo
        .update_user(&id, role, request.is_active, request.full_name.as_deref())
        .await?;
    success(user)
}

/// DELETE /api/auth/users/:id - Delete a user (admin only). An admin
/// cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let caller = auth::require_admin(&state.repo, &auth).await?;

    if caller.id == id {
        return Err(AppError::Forbidden(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.repo.delete_user(&id).await?;
    success(())
}
