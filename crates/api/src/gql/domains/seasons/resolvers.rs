use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::seasons::{self, CreateSeason, UpdateSeason};

use super::types::{CreateSeasonInput, Season, UpdateSeasonInput};

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(GqlError::new("Season end date must not be before its start date").into());
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct SeasonQuery;

#[Object]
impl SeasonQuery {
    async fn seasons(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Season>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            seasons::list(&state.db, &filter, page),
            seasons::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Season::from).collect(),
            total_count,
            page,
        ))
    }

    async fn season(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Season>> {
        let state = ctx.data::<AppState>()?;
        let row = seasons::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Season::from))
    }
}

#[derive(Default)]
pub struct SeasonMutation;

#[Object]
impl SeasonMutation {
    async fn create_season(&self, ctx: &Context<'_>, input: CreateSeasonInput) -> Result<Season> {
        require_organization_manager(ctx, input.organization_id).await?;
        check_dates(input.start_date, input.end_date)?;
        let state = ctx.data::<AppState>()?;

        let row = seasons::create(
            &state.db,
            CreateSeason {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
                nick: non_blank(input.nick),
                start_date: input.start_date,
                end_date: input.end_date,
            },
        )
        .await
        .gql_err("Failed to create season")?;

        Ok(row.into())
    }

    /// Partial update; the resulting date range is validated as a whole.
    async fn update_season(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateSeasonInput,
    ) -> Result<Season> {
        let state = ctx.data::<AppState>()?;
        let existing = seasons::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Season"))?;
        require_organization_manager(ctx, existing.organization_id).await?;
        check_dates(
            input.start_date.or(existing.start_date),
            input.end_date.or(existing.end_date),
        )?;

        let row = seasons::update(
            &state.db,
            id,
            UpdateSeason {
                name: non_blank(input.name),
                nick: input.nick,
                start_date: input.start_date,
                end_date: input.end_date,
            },
        )
        .await
        .gql_err("Failed to update season")?
        .ok_or_else(|| GqlError::not_found("Season"))?;

        Ok(row.into())
    }

    async fn delete_season(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let existing = seasons::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Season"))?;
        require_organization_manager(ctx, existing.organization_id).await?;

        Ok(seasons::delete(&state.db, id).await.map_err(GqlError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_before_start_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 1);
        let end = NaiveDate::from_ymd_opt(2025, 4, 30);
        assert!(check_dates(start, end).is_ok());
        assert!(check_dates(end, start).is_err());
        assert!(check_dates(start, None).is_ok());
        assert!(check_dates(start, start).is_ok());
    }
}
