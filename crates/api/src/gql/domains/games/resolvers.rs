use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, organization_for_game, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::gql::subscriptions::{cleanup_game_channels, publish_result_update};
use crate::play;
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::games::{self, CreateGame, GameFilter, UpdateGame};
use infra::repos::teams;

use super::service::{self, RecordEventParams};
use super::types::{
    AdjustGameCounterInput, CreateGameInput, Game, GameEvent, GameResult, GameStatus,
    RecordGameEventInput, UpdateGameInput,
};

/// Both teams must exist, differ and belong to the game's organization.
async fn check_teams(
    db: &infra::db::Db,
    organization_id: Uuid,
    host_team_id: Uuid,
    guest_team_id: Uuid,
) -> Result<()> {
    if host_team_id == guest_team_id {
        return Err(GqlError::new("Host and guest teams must be different").into());
    }

    for team_id in [host_team_id, guest_team_id] {
        let team = teams::get_by_id(db, team_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Team"))?;
        if team.organization_id != organization_id {
            return Err(GqlError::new("Teams must belong to the game's organization").into());
        }
    }
    Ok(())
}

async fn publish_result(db: &infra::db::Db, game_id: Uuid) -> Result<GameResult> {
    let result = service::load_result(db, game_id)
        .await
        .map_err(GqlError::from)?;
    publish_result_update(game_id, result.clone());
    Ok(result)
}

#[derive(Default)]
pub struct GameQuery;

#[Object]
impl GameQuery {
    #[allow(clippy::too_many_arguments)]
    async fn games(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        competition_id: Option<Uuid>,
        season_id: Option<Uuid>,
        team_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Game>> {
        let state = ctx.data::<AppState>()?;

        let filter = GameFilter {
            list: ListFilter {
                organization_id,
                search,
            },
            competition_id,
            season_id,
            team_id,
            from,
            to,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            games::list(&state.db, &filter, page),
            games::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Game::from).collect(),
            total_count,
            page,
        ))
    }

    async fn game(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Game>> {
        let state = ctx.data::<AppState>()?;
        let row = games::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Game::from))
    }

    async fn game_result(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        service::load_game(&state.db, game_id)
            .await
            .map_err(GqlError::from)?;
        Ok(service::load_result(&state.db, game_id)
            .await
            .map_err(GqlError::from)?)
    }

    async fn game_events(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        period: Option<String>,
    ) -> Result<Vec<GameEvent>> {
        let state = ctx.data::<AppState>()?;
        let rows = infra::repos::game_events::list_by_game(&state.db, game_id, period.as_deref())
            .await
            .map_err(GqlError::from)?;
        GameEvent::from_rows(rows)
    }

    /// Elapsed game time for a clock reading (`MM:SS` left) in `period`
    async fn game_time(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        period: String,
        remaining: String,
    ) -> Result<String> {
        let state = ctx.data::<AppState>()?;
        let game = service::load_game(&state.db, game_id)
            .await
            .map_err(GqlError::from)?;
        let periods = service::load_periods(&state.db, game.rule_pack_id)
            .await
            .map_err(GqlError::from)?;
        Ok(play::remaining_to_game_time(&remaining, &period, &periods))
    }

    /// Clock reading in `period` for an elapsed game time
    async fn remaining_time(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        period: String,
        game_time: String,
    ) -> Result<String> {
        let state = ctx.data::<AppState>()?;
        let game = service::load_game(&state.db, game_id)
            .await
            .map_err(GqlError::from)?;
        let periods = service::load_periods(&state.db, game.rule_pack_id)
            .await
            .map_err(GqlError::from)?;
        Ok(play::game_time_to_remaining(&game_time, &period, &periods))
    }

    /// Period in which an elapsed game time falls; a boundary belongs to the period it ends
    async fn period_at(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        game_time: String,
    ) -> Result<Option<String>> {
        let state = ctx.data::<AppState>()?;
        let game = service::load_game(&state.db, game_id)
            .await
            .map_err(GqlError::from)?;
        let periods = service::load_periods(&state.db, game.rule_pack_id)
            .await
            .map_err(GqlError::from)?;
        Ok(play::period_for_game_time(&game_time, &periods).map(|p| p.name.clone()))
    }
}

#[derive(Default)]
pub struct GameMutation;

#[Object]
impl GameMutation {
    async fn create_game(&self, ctx: &Context<'_>, input: CreateGameInput) -> Result<Game> {
        require_organization_manager(ctx, input.organization_id).await?;
        let state = ctx.data::<AppState>()?;

        check_teams(
            &state.db,
            input.organization_id,
            input.host_team_id,
            input.guest_team_id,
        )
        .await?;

        let row = games::create(
            &state.db,
            CreateGame {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
                info: non_blank(input.info),
                start_date: input.start_date,
                start_time: input.start_time,
                competition_id: input.competition_id,
                season_id: input.season_id,
                venue_id: input.venue_id,
                rule_pack_id: input.rule_pack_id,
                host_team_id: input.host_team_id,
                guest_team_id: input.guest_team_id,
            },
        )
        .await
        .gql_err("Failed to create game")?;

        tracing::info!(game_id = %row.id, organization_id = %row.organization_id, "Game created");
        Ok(row.into())
    }

    async fn update_game(&self, ctx: &Context<'_>, id: Uuid, input: UpdateGameInput) -> Result<Game> {
        let state = ctx.data::<AppState>()?;
        let existing = service::load_game(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        require_organization_manager(ctx, existing.organization_id).await?;

        if input.host_team_id.is_some() || input.guest_team_id.is_some() {
            check_teams(
                &state.db,
                existing.organization_id,
                input.host_team_id.unwrap_or(existing.host_team_id),
                input.guest_team_id.unwrap_or(existing.guest_team_id),
            )
            .await?;
        }

        let row = games::update(
            &state.db,
            id,
            UpdateGame {
                name: non_blank(input.name),
                info: input.info,
                start_date: input.start_date,
                start_time: input.start_time,
                competition_id: input.competition_id,
                season_id: input.season_id,
                venue_id: input.venue_id,
                rule_pack_id: input.rule_pack_id,
                host_team_id: input.host_team_id,
                guest_team_id: input.guest_team_id,
            },
        )
        .await
        .gql_err("Failed to update game")?
        .ok_or_else(|| GqlError::not_found("Game"))?;

        Ok(row.into())
    }

    /// Delete a game with its result, events and clock.
    async fn delete_game(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_game(&state.db, id).await?).await?;

        let deleted = games::delete(&state.db, id).await.map_err(GqlError::from)?;
        if deleted {
            cleanup_game_channels(id);
        }
        Ok(deleted)
    }

    async fn record_game_event(
        &self,
        ctx: &Context<'_>,
        input: RecordGameEventInput,
    ) -> Result<GameEvent> {
        let state = ctx.data::<AppState>()?;
        let user =
            require_organization_manager(ctx, organization_for_game(&state.db, input.game_id).await?)
                .await?;

        if let Some(player_id) = input.player_id {
            infra::repos::players::get_by_id(&state.db, player_id)
                .await
                .map_err(GqlError::from)?
                .ok_or_else(|| GqlError::not_found("Player"))?;
        }

        let event = service::record_event(
            &state.db,
            RecordEventParams {
                game_id: input.game_id,
                event: input.event_type.into(),
                side: input.side.into(),
                period: non_blank(input.period),
                remaining_time: non_blank(input.remaining_time),
                player_id: input.player_id,
                description: non_blank(input.description),
                recorded_by: Some(user.id),
            },
        )
        .await
        .map_err(GqlError::from)?;

        publish_result(&state.db, input.game_id).await?;
        Ok(GameEvent::try_from(event).map_err(GqlError::new)?)
    }

    /// Delete an event and take back its counter.
    async fn delete_game_event(&self, ctx: &Context<'_>, id: Uuid) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        let event = infra::repos::game_events::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Game event"))?;
        require_organization_manager(ctx, organization_for_game(&state.db, event.game_id).await?)
            .await?;

        let game_id = service::delete_event(&state.db, id)
            .await
            .map_err(GqlError::from)?;

        publish_result(&state.db, game_id).await
    }

    async fn adjust_game_counter(
        &self,
        ctx: &Context<'_>,
        input: AdjustGameCounterInput,
    ) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_game(&state.db, input.game_id).await?)
            .await?;

        let period = require_non_blank(&input.period, "period")?;
        service::adjust_counter(
            &state.db,
            input.game_id,
            &period,
            input.event_type.into(),
            input.side.into(),
            input.delta,
        )
        .await
        .map_err(GqlError::from)?;

        publish_result(&state.db, input.game_id).await
    }

    async fn set_game_status(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        status: GameStatus,
    ) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_game(&state.db, game_id).await?).await?;

        service::set_status(&state.db, game_id, status)
            .await
            .map_err(GqlError::from)?;
        tracing::info!(%game_id, status = status.as_str(), "Game status changed");

        publish_result(&state.db, game_id).await
    }

    /// Recount every counter from the recorded events
    async fn rebuild_game_result(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_game(&state.db, game_id).await?).await?;

        service::rebuild_result(&state.db, game_id)
            .await
            .map_err(GqlError::from)?;

        publish_result(&state.db, game_id).await
    }
}
