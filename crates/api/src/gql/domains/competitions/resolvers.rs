use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::competitions::{self, CreateCompetition, UpdateCompetition};

use super::types::{Competition, CreateCompetitionInput, UpdateCompetitionInput};

async fn competition_organization(state: &AppState, id: Uuid) -> Result<Uuid> {
    let competition = competitions::get_by_id(&state.db, id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Competition"))?;
    Ok(competition.organization_id)
}

#[derive(Default)]
pub struct CompetitionQuery;

#[Object]
impl CompetitionQuery {
    async fn competitions(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Competition>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            competitions::list(&state.db, &filter, page),
            competitions::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Competition::from).collect(),
            total_count,
            page,
        ))
    }

    async fn competition(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Competition>> {
        let state = ctx.data::<AppState>()?;
        let row = competitions::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Competition::from))
    }
}

#[derive(Default)]
pub struct CompetitionMutation;

#[Object]
impl CompetitionMutation {
    async fn create_competition(
        &self,
        ctx: &Context<'_>,
        input: CreateCompetitionInput,
    ) -> Result<Competition> {
        require_organization_manager(ctx, input.organization_id).await?;
        let state = ctx.data::<AppState>()?;

        let row = competitions::create(
            &state.db,
            CreateCompetition {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
                nick: non_blank(input.nick),
                short_name: non_blank(input.short_name),
                status: non_blank(input.status),
            },
        )
        .await
        .gql_err("Failed to create competition")?;

        Ok(row.into())
    }

    async fn update_competition(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateCompetitionInput,
    ) -> Result<Competition> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, competition_organization(state, id).await?).await?;

        let row = competitions::update(
            &state.db,
            id,
            UpdateCompetition {
                name: non_blank(input.name),
                nick: input.nick,
                short_name: input.short_name,
                status: non_blank(input.status),
            },
        )
        .await
        .gql_err("Failed to update competition")?
        .ok_or_else(|| GqlError::not_found("Competition"))?;

        Ok(row.into())
    }

    async fn delete_competition(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, competition_organization(state, id).await?).await?;

        Ok(competitions::delete(&state.db, id)
            .await
            .map_err(GqlError::from)?)
    }
}
