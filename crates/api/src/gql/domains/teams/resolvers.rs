use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, organization_for_team, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::games::{self, GameFilter};
use infra::repos::teams::{self, AddTeamPlayer, CreateTeam, UpdateTeam};

use super::types::{AddPlayerToTeamInput, CreateTeamInput, RosterPlayer, Team, UpdateTeamInput};

#[derive(Default)]
pub struct TeamQuery;

#[Object]
impl TeamQuery {
    async fn teams(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Team>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            teams::list(&state.db, &filter, page),
            teams::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Team::from).collect(),
            total_count,
            page,
        ))
    }

    async fn team(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Team>> {
        let state = ctx.data::<AppState>()?;
        let row = teams::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Team::from))
    }
}

#[derive(Default)]
pub struct TeamMutation;

#[Object]
impl TeamMutation {
    async fn create_team(&self, ctx: &Context<'_>, input: CreateTeamInput) -> Result<Team> {
        require_organization_manager(ctx, input.organization_id).await?;
        let state = ctx.data::<AppState>()?;

        let row = teams::create(
            &state.db,
            CreateTeam {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
                nick: non_blank(input.nick),
                short_name: non_blank(input.short_name),
                status: non_blank(input.status),
                logo_url: non_blank(input.logo_url),
                founded: input.founded,
            },
        )
        .await
        .gql_err("Failed to create team")?;

        Ok(row.into())
    }

    async fn update_team(&self, ctx: &Context<'_>, id: Uuid, input: UpdateTeamInput) -> Result<Team> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_team(&state.db, id).await?).await?;

        let row = teams::update(
            &state.db,
            id,
            UpdateTeam {
                name: non_blank(input.name),
                nick: input.nick,
                short_name: input.short_name,
                status: non_blank(input.status),
                logo_url: input.logo_url,
                founded: input.founded,
            },
        )
        .await
        .gql_err("Failed to update team")?
        .ok_or_else(|| GqlError::not_found("Team"))?;

        Ok(row.into())
    }

    /// Delete a team. Teams that still appear in games cannot be deleted.
    async fn delete_team(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_team(&state.db, id).await?).await?;

        let filter = GameFilter {
            team_id: Some(id),
            ..GameFilter::default()
        };
        let game_count = games::count(&state.db, &filter)
            .await
            .map_err(GqlError::from)?;
        if game_count > 0 {
            return Err(GqlError::new(format!(
                "Team is scheduled in {game_count} game(s) and cannot be deleted"
            ))
            .into());
        }

        Ok(teams::delete(&state.db, id).await.map_err(GqlError::from)?)
    }

    /// Put a player on a team roster; re-adding updates jersey and position.
    async fn add_player_to_team(
        &self,
        ctx: &Context<'_>,
        input: AddPlayerToTeamInput,
    ) -> Result<Vec<RosterPlayer>> {
        let state = ctx.data::<AppState>()?;
        let organization_id = organization_for_team(&state.db, input.team_id).await?;
        require_organization_manager(ctx, organization_id).await?;

        let player = infra::repos::players::get_by_id(&state.db, input.player_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Player"))?;
        if player.organization_id != organization_id {
            return Err(GqlError::new("Player belongs to another organization").into());
        }
        if input.jersey.is_some_and(|j| !(0..=99).contains(&j)) {
            return Err(GqlError::new("Jersey number must be between 0 and 99").into());
        }

        teams::add_player(
            &state.db,
            AddTeamPlayer {
                team_id: input.team_id,
                player_id: input.player_id,
                jersey: input.jersey,
                position: non_blank(input.position),
            },
        )
        .await
        .gql_err("Failed to add player to team")?;

        let roster = teams::list_roster(&state.db, input.team_id)
            .await
            .map_err(GqlError::from)?;
        Ok(roster.into_iter().map(RosterPlayer::from).collect())
    }

    async fn remove_player_from_team(
        &self,
        ctx: &Context<'_>,
        team_id: Uuid,
        player_id: Uuid,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_team(&state.db, team_id).await?).await?;

        Ok(teams::remove_player(&state.db, team_id, player_id)
            .await
            .map_err(GqlError::from)?)
    }
}
