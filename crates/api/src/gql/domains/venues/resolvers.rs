use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::venues::{self, CreateVenue, UpdateVenue};

use super::types::{CreateVenueInput, UpdateVenueInput, Venue};

async fn venue_organization(state: &AppState, id: Uuid) -> Result<Uuid> {
    let venue = venues::get_by_id(&state.db, id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Venue"))?;
    Ok(venue.organization_id)
}

fn check_capacity(capacity: Option<i32>) -> Result<()> {
    if capacity.is_some_and(|c| c < 0) {
        return Err(GqlError::new("Capacity must not be negative").into());
    }
    Ok(())
}

#[derive(Default)]
pub struct VenueQuery;

#[Object]
impl VenueQuery {
    async fn venues(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Venue>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            venues::list(&state.db, &filter, page),
            venues::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Venue::from).collect(),
            total_count,
            page,
        ))
    }

    async fn venue(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Venue>> {
        let state = ctx.data::<AppState>()?;
        let row = venues::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Venue::from))
    }
}

#[derive(Default)]
pub struct VenueMutation;

#[Object]
impl VenueMutation {
    async fn create_venue(&self, ctx: &Context<'_>, input: CreateVenueInput) -> Result<Venue> {
        require_organization_manager(ctx, input.organization_id).await?;
        check_capacity(input.capacity)?;
        let state = ctx.data::<AppState>()?;

        let row = venues::create(
            &state.db,
            CreateVenue {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
                nick: non_blank(input.nick),
                capacity: input.capacity,
                address: non_blank(input.address),
            },
        )
        .await
        .gql_err("Failed to create venue")?;

        Ok(row.into())
    }

    async fn update_venue(&self, ctx: &Context<'_>, id: Uuid, input: UpdateVenueInput) -> Result<Venue> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, venue_organization(state, id).await?).await?;
        check_capacity(input.capacity)?;

        let row = venues::update(
            &state.db,
            id,
            UpdateVenue {
                name: non_blank(input.name),
                nick: input.nick,
                capacity: input.capacity,
                address: input.address,
            },
        )
        .await
        .gql_err("Failed to update venue")?
        .ok_or_else(|| GqlError::not_found("Venue"))?;

        Ok(row.into())
    }

    async fn delete_venue(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, venue_organization(state, id).await?).await?;

        Ok(venues::delete(&state.db, id).await.map_err(GqlError::from)?)
    }
}
