use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::players::{self, CreatePlayer, UpdatePlayer};

use super::types::{CreatePlayerInput, Player, UpdatePlayerInput};

fn check_measurements(height: Option<i32>, weight: Option<i32>) -> Result<()> {
    if height.is_some_and(|h| h <= 0) || weight.is_some_and(|w| w <= 0) {
        return Err(GqlError::new("Height and weight must be positive").into());
    }
    Ok(())
}

async fn player_organization(state: &AppState, id: Uuid) -> Result<Uuid> {
    let player = players::get_by_id(&state.db, id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Player"))?;
    Ok(player.organization_id)
}

#[derive(Default)]
pub struct PlayerQuery;

#[Object]
impl PlayerQuery {
    /// Players, searchable by first or last name
    async fn players(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Player>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            players::list(&state.db, &filter, page),
            players::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Player::from).collect(),
            total_count,
            page,
        ))
    }

    async fn player(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Player>> {
        let state = ctx.data::<AppState>()?;
        let row = players::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Player::from))
    }
}

#[derive(Default)]
pub struct PlayerMutation;

#[Object]
impl PlayerMutation {
    async fn create_player(&self, ctx: &Context<'_>, input: CreatePlayerInput) -> Result<Player> {
        require_organization_manager(ctx, input.organization_id).await?;
        check_measurements(input.height, input.weight)?;
        let state = ctx.data::<AppState>()?;

        let row = players::create(
            &state.db,
            CreatePlayer {
                organization_id: input.organization_id,
                first_name: require_non_blank(&input.first_name, "firstName")?,
                last_name: require_non_blank(&input.last_name, "lastName")?,
                birthday: input.birthday,
                country: non_blank(input.country),
                position: non_blank(input.position),
                stick: non_blank(input.stick),
                height: input.height,
                weight: input.weight,
                avatar_url: non_blank(input.avatar_url),
            },
        )
        .await
        .gql_err("Failed to create player")?;

        Ok(row.into())
    }

    async fn update_player(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdatePlayerInput,
    ) -> Result<Player> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, player_organization(state, id).await?).await?;
        check_measurements(input.height, input.weight)?;

        let row = players::update(
            &state.db,
            id,
            UpdatePlayer {
                first_name: non_blank(input.first_name),
                last_name: non_blank(input.last_name),
                birthday: input.birthday,
                country: input.country,
                position: input.position,
                stick: input.stick,
                height: input.height,
                weight: input.weight,
                avatar_url: input.avatar_url,
            },
        )
        .await
        .gql_err("Failed to update player")?
        .ok_or_else(|| GqlError::not_found("Player"))?;

        Ok(row.into())
    }

    async fn delete_player(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, player_organization(state, id).await?).await?;

        Ok(players::delete(&state.db, id).await.map_err(GqlError::from)?)
    }
}
