use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::error::{GqlError, ResultExt};
use crate::gql::subscriptions::{publish_clock_update, publish_result_update};
use crate::play::{self, PeriodSpec};
use crate::state::AppState;
use infra::models::{GameClockRow, GameRow};
use infra::repos::{game_results, ClockStatus, GameClockRepo};

use super::service;
use super::types::GameClock;

/// Load the game, check the caller manages it, and return its periods.
async fn managed_game(ctx: &Context<'_>, game_id: Uuid) -> Result<(GameRow, Vec<PeriodSpec>)> {
    let state = ctx.data::<AppState>()?;
    let game = service::load_game(&state.db, game_id)
        .await
        .map_err(GqlError::from)?;
    require_organization_manager(ctx, game.organization_id).await?;

    let periods = service::load_periods(&state.db, game.rule_pack_id)
        .await
        .map_err(GqlError::from)?;
    Ok((game, periods))
}

async fn current_clock(repo: &GameClockRepo, game_id: Uuid) -> Result<GameClockRow> {
    Ok(repo
        .get_clock(game_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Game clock"))?)
}

/// Seconds as stored in the `INTEGER` clock columns.
fn seconds_column(seconds: u32) -> i32 {
    i32::try_from(seconds).unwrap_or(i32::MAX)
}

fn publish(row: &GameClockRow, periods: &[PeriodSpec]) -> GameClock {
    let clock = GameClock::build(row, periods, chrono::Utc::now());
    publish_clock_update(row.game_id, clock.clone());
    clock
}

/// Keep the result's active period in step with the clock.
async fn mirror_period(state: &AppState, game_id: Uuid, period: &str) -> Result<()> {
    let result = game_results::set_period_active(&state.db, game_id, period)
        .await
        .map_err(GqlError::from)?;
    let periods = game_results::list_periods(&state.db, result.id)
        .await
        .map_err(GqlError::from)?;
    publish_result_update(game_id, super::types::GameResult::from_rows(result, periods));
    Ok(())
}

async fn switch_period(
    ctx: &Context<'_>,
    game_id: Uuid,
    pick: for<'a> fn(&'a [PeriodSpec], &str) -> Option<&'a PeriodSpec>,
    missing: &str,
) -> Result<GameClock> {
    let (_, periods) = managed_game(ctx, game_id).await?;
    let state = ctx.data::<AppState>()?;
    let repo = GameClockRepo::new(state.db.clone());

    let clock = current_clock(&repo, game_id).await?;
    let target = pick(&periods, &clock.period_name).ok_or_else(|| GqlError::new(missing))?;

    let row = repo
        .set_period(game_id, &target.name, seconds_column(target.duration_seconds()))
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Game clock"))?;
    mirror_period(state, game_id, &row.period_name).await?;

    tracing::info!(%game_id, period = %row.period_name, "Game clock moved to period");
    Ok(publish(&row, &periods))
}

#[derive(Default)]
pub struct GameClockQuery;

#[Object]
impl GameClockQuery {
    async fn game_clock(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<Option<GameClock>> {
        let state = ctx.data::<AppState>()?;
        Ok(service::load_clock(&state.db, game_id)
            .await
            .map_err(GqlError::from)?)
    }
}

#[derive(Default)]
pub struct GameClockMutation;

#[Object]
impl GameClockMutation {
    /// Create a stopped clock on the first period with its full duration
    async fn create_game_clock(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        let (game, periods) = managed_game(ctx, game_id).await?;
        let state = ctx.data::<AppState>()?;

        let first = play::first_period(&periods)
            .ok_or_else(|| GqlError::new("Game needs a rule pack with periods to run a clock"))?;

        let row = GameClockRepo::new(state.db.clone())
            .create_clock(game.id, &first.name, seconds_column(first.duration_seconds()))
            .await
            .map_err(|e| GqlError::conflict(e, "Game already has a clock"))?;
        mirror_period(state, game.id, &row.period_name).await?;

        Ok(publish(&row, &periods))
    }

    async fn start_game_clock(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        let (_, periods) = managed_game(ctx, game_id).await?;
        let state = ctx.data::<AppState>()?;
        let repo = GameClockRepo::new(state.db.clone());

        let clock = current_clock(&repo, game_id).await?;
        if clock.status() == ClockStatus::Running {
            return Err(GqlError::new("Game clock is already running").into());
        }

        let row = repo
            .start_clock(game_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Period is over; move to the next period first"))?;

        tracing::info!(%game_id, period = %row.period_name, "Game clock started");
        Ok(publish(&row, &periods))
    }

    async fn pause_game_clock(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        let (_, periods) = managed_game(ctx, game_id).await?;
        let state = ctx.data::<AppState>()?;

        let row = GameClockRepo::new(state.db.clone())
            .pause_clock(game_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Game clock is not running"))?;

        tracing::info!(%game_id, remaining = row.remaining_seconds, "Game clock paused");
        Ok(publish(&row, &periods))
    }

    async fn resume_game_clock(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        let (_, periods) = managed_game(ctx, game_id).await?;
        let state = ctx.data::<AppState>()?;
        let repo = GameClockRepo::new(state.db.clone());

        let clock = current_clock(&repo, game_id).await?;
        if clock.status() != ClockStatus::Paused {
            return Err(GqlError::new("Game clock is not paused").into());
        }

        let row = repo
            .start_clock(game_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Game clock could not be resumed"))?;

        Ok(publish(&row, &periods))
    }

    async fn next_game_period(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        switch_period(ctx, game_id, play::next_period, "Already in the last period").await
    }

    async fn previous_game_period(&self, ctx: &Context<'_>, game_id: Uuid) -> Result<GameClock> {
        switch_period(ctx, game_id, play::previous_period, "Already in the first period").await
    }

    /// Set the time left in the current period (`MM:SS`), clamped to its duration
    async fn set_game_clock(
        &self,
        ctx: &Context<'_>,
        game_id: Uuid,
        remaining: String,
    ) -> Result<GameClock> {
        let (_, periods) = managed_game(ctx, game_id).await?;
        let state = ctx.data::<AppState>()?;
        let repo = GameClockRepo::new(state.db.clone());

        let seconds = play::parse_clock(&remaining)
            .ok_or("expected MM:SS")
            .gql_err("Invalid remaining time")?;
        let clock = current_clock(&repo, game_id).await?;
        let seconds = seconds.min(clock.period_duration_seconds.max(0) as u32);

        let row = repo
            .set_remaining(game_id, seconds_column(seconds))
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Game clock"))?;

        Ok(publish(&row, &periods))
    }
}
