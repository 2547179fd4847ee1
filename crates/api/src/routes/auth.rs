use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::PasswordService;
use crate::error::AppError;
use crate::state::AppState;
use infra::models::UserRow;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Check credentials and issue an access token.
///
/// Unknown email, wrong password and disabled accounts all produce the same error.
pub async fn authenticate(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(String, UserRow), AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = infra::repos::users::get_by_email(&state.db, email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active || !PasswordService::verify_password(password, &user.password_hash) {
        tracing::warn!(user_id = %user.id, "Rejected login attempt");
        return Err(invalid());
    }

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone(), user.role.clone())?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((token, user))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let (token, user) = authenticate(&state, &request.email, &request.password).await?;

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    }))
}
