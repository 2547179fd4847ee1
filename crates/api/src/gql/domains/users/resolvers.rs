use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_admin;
use crate::auth::PasswordService;
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::repos::organization_managers::{self, CreateOrganizationManager};
use infra::repos::users::{self, CreateUserData, UpdateUserData, UserFilter};

use super::types::{CreateUserInput, UpdateUserInput, User};

fn hash_new_password(password: &str) -> Result<String> {
    PasswordService::validate_password_strength(password).map_err(GqlError::new)?;
    PasswordService::hash_password(password).gql_err("Failed to hash password")
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn users(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        is_active: Option<bool>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<User>> {
        require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = UserFilter { search, is_active };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            users::list(&state.db, &filter, page),
            users::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(User::from).collect(),
            total_count,
            page,
        ))
    }

    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let row = users::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(User::from))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        let admin = require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let email = require_non_blank(&input.email, "email")?.to_lowercase();
        if !email.contains('@') {
            return Err(GqlError::new("Invalid email address").into());
        }

        let row = users::create(
            &state.db,
            CreateUserData {
                email,
                name: require_non_blank(&input.name, "name")?,
                password_hash: hash_new_password(&input.password)?,
                role: input.role.into(),
            },
        )
        .await
        .map_err(|e| GqlError::conflict(e, "A user with this email already exists"))?;

        tracing::info!(user_id = %row.id, created_by = %admin.id, "User created");
        Ok(row.into())
    }

    async fn update_user(&self, ctx: &Context<'_>, id: Uuid, input: UpdateUserInput) -> Result<User> {
        let admin = require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        if admin.id == id && input.is_active == Some(false) {
            return Err(GqlError::new("You cannot deactivate your own account").into());
        }

        let password_hash = input
            .password
            .as_deref()
            .map(hash_new_password)
            .transpose()?;

        let row = users::update(
            &state.db,
            id,
            UpdateUserData {
                name: non_blank(input.name),
                role: input.role.map(Into::into),
                is_active: input.is_active,
                password_hash,
            },
        )
        .await
        .gql_err("Failed to update user")?
        .ok_or_else(|| GqlError::not_found("User"))?;

        Ok(row.into())
    }

    /// Let a user manage an organization
    async fn assign_organization_manager(
        &self,
        ctx: &Context<'_>,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<User> {
        let admin = require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let user = users::get_by_id(&state.db, user_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("User"))?;
        infra::repos::organizations::get_by_id(&state.db, organization_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Organization"))?;

        organization_managers::create(
            &state.db,
            CreateOrganizationManager {
                organization_id,
                user_id,
                assigned_by: Some(admin.id),
            },
        )
        .await
        .map_err(GqlError::from)?;

        tracing::info!(%organization_id, %user_id, "Organization manager assigned");
        Ok(user.into())
    }

    async fn remove_organization_manager(
        &self,
        ctx: &Context<'_>,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        Ok(organization_managers::remove(&state.db, organization_id, user_id)
            .await
            .map_err(GqlError::from)?)
    }
}
