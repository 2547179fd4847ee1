use async_graphql::{Context, Object, Result};

use crate::auth::Claims;
use crate::error::AppError;
use crate::gql::domains::users::types::User;
use crate::gql::error::GqlError;
use crate::routes::auth::authenticate;
use crate::state::AppState;

use super::types::AuthPayload;

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// The authenticated user, or null for anonymous callers
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Ok(claims) = ctx.data::<Claims>() else {
            return Ok(None);
        };
        let Some(user_id) = claims.user_id() else {
            return Ok(None);
        };

        let state = ctx.data::<AppState>()?;
        let user = infra::repos::users::get_by_id(&state.db, user_id)
            .await
            .map_err(GqlError::from)?;
        Ok(user.filter(|u| u.is_active).map(User::from))
    }
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;
        let (token, user) = authenticate(state, &email, &password)
            .await
            .map_err(|e| match e {
                AppError::Unauthorized(message) => GqlError::new(message),
                other => GqlError::new(other.to_string()),
            })?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }
}
