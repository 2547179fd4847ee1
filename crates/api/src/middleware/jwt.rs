use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Validates an optional `Authorization: Bearer` token and stores its claims in the
/// request extensions. Anonymous requests pass through; a bad token is rejected.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&request) {
        let claims = state
            .jwt_service()
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
        request.extensions_mut().insert::<Claims>(claims);
    }

    Ok(next.run(request).await)
}
