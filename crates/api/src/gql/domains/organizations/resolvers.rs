use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::{require_admin, require_organization_manager};
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::organizations::{self, CreateOrganization, UpdateOrganization};

use super::types::{CreateOrganizationInput, Organization, UpdateOrganizationInput};

#[derive(Default)]
pub struct OrganizationQuery;

#[Object]
impl OrganizationQuery {
    /// Organizations, optionally filtered by name
    async fn organizations(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Organization>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id: None,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            organizations::list(&state.db, &filter, page),
            organizations::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Organization::from).collect(),
            total_count,
            page,
        ))
    }

    async fn organization(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Organization>> {
        let state = ctx.data::<AppState>()?;
        let row = organizations::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Organization::from))
    }
}

#[derive(Default)]
pub struct OrganizationMutation;

#[Object]
impl OrganizationMutation {
    /// Create an organization (admin only)
    async fn create_organization(
        &self,
        ctx: &Context<'_>,
        input: CreateOrganizationInput,
    ) -> Result<Organization> {
        let admin = require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let row = organizations::create(
            &state.db,
            CreateOrganization {
                name: require_non_blank(&input.name, "name")?,
                short_name: non_blank(input.short_name),
                status: non_blank(input.status),
                logo_url: non_blank(input.logo_url),
            },
        )
        .await
        .gql_err("Failed to create organization")?;

        tracing::info!(organization_id = %row.id, created_by = %admin.id, "Organization created");
        Ok(row.into())
    }

    async fn update_organization(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateOrganizationInput,
    ) -> Result<Organization> {
        require_organization_manager(ctx, id).await?;
        let state = ctx.data::<AppState>()?;

        let row = organizations::update(
            &state.db,
            id,
            UpdateOrganization {
                name: non_blank(input.name),
                short_name: input.short_name,
                status: non_blank(input.status),
                logo_url: input.logo_url,
            },
        )
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Organization"))?;

        Ok(row.into())
    }

    /// Delete an organization and everything it owns (admin only)
    async fn delete_organization(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        require_admin(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let deleted = organizations::delete(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        if deleted {
            tracing::info!(organization_id = %id, "Organization deleted");
        }
        Ok(deleted)
    }
}
