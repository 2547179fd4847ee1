use async_graphql::{Context, Object, Result};
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::permissions::require_organization_manager;
use crate::gql::common::helpers::{non_blank, organization_for_rule_pack, require_non_blank};
use crate::gql::common::types::{PaginatedResponse, PaginationInput};
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::filter::ListFilter;
use infra::repos::rule_packs::{self, CreatePeriod, CreateRulePack, UpdatePeriod};

use super::types::{CreateRulePackInput, Period, PeriodInput, RulePack, UpdatePeriodInput};

const PERIOD_CONFLICT: &str = "A period with this name or priority already exists in the rule pack";

/// Longest period a rule pack may define, in minutes.
const MAX_PERIOD_MINUTES: i32 = 600;

fn check_duration(duration: Option<i32>) -> Result<()> {
    if duration.is_some_and(|d| d <= 0 || d > MAX_PERIOD_MINUTES) {
        return Err(GqlError::new(format!(
            "Period duration must be between 1 and {MAX_PERIOD_MINUTES} minutes"
        ))
        .into());
    }
    Ok(())
}

/// Names and priorities must be unique within one rule pack.
fn check_periods(periods: &[PeriodInput]) -> Result<()> {
    let mut names = HashSet::new();
    let mut priorities = HashSet::new();
    for period in periods {
        check_duration(Some(period.duration))?;
        if !names.insert(period.name.trim()) || !priorities.insert(period.priority) {
            return Err(GqlError::new(PERIOD_CONFLICT).into());
        }
    }
    Ok(())
}

async fn period_organization(state: &AppState, period_id: Uuid) -> Result<Uuid> {
    let period = rule_packs::get_period(&state.db, period_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Period"))?;
    organization_for_rule_pack(&state.db, period.rule_pack_id).await
}

#[derive(Default)]
pub struct RulePackQuery;

#[Object]
impl RulePackQuery {
    async fn rule_packs(
        &self,
        ctx: &Context<'_>,
        organization_id: Option<Uuid>,
        search: Option<String>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<RulePack>> {
        let state = ctx.data::<AppState>()?;

        let filter = ListFilter {
            organization_id,
            search,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            rule_packs::list(&state.db, &filter, page),
            rule_packs::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(RulePack::from).collect(),
            total_count,
            page,
        ))
    }

    async fn rule_pack(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<RulePack>> {
        let state = ctx.data::<AppState>()?;
        let row = rule_packs::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(RulePack::from))
    }
}

#[derive(Default)]
pub struct RulePackMutation;

#[Object]
impl RulePackMutation {
    /// Create a rule pack together with its initial periods in one transaction
    async fn create_rule_pack(
        &self,
        ctx: &Context<'_>,
        input: CreateRulePackInput,
    ) -> Result<RulePack> {
        require_organization_manager(ctx, input.organization_id).await?;
        let periods = input.periods.unwrap_or_default();
        check_periods(&periods)?;
        let state = ctx.data::<AppState>()?;

        let mut tx = state.db.begin().await.map_err(GqlError::from)?;

        let row = rule_packs::create(
            &mut *tx,
            CreateRulePack {
                organization_id: input.organization_id,
                name: require_non_blank(&input.name, "name")?,
            },
        )
        .await
        .map_err(GqlError::from)?;

        for period in periods {
            rule_packs::create_period(
                &mut *tx,
                CreatePeriod {
                    rule_pack_id: row.id,
                    name: require_non_blank(&period.name, "period name")?,
                    code: non_blank(period.code),
                    duration: period.duration,
                    priority: period.priority,
                },
            )
            .await
            .map_err(|e| GqlError::conflict(e, PERIOD_CONFLICT))?;
        }

        tx.commit().await.map_err(GqlError::from)?;

        Ok(row.into())
    }

    async fn rename_rule_pack(&self, ctx: &Context<'_>, id: Uuid, name: String) -> Result<RulePack> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_rule_pack(&state.db, id).await?).await?;

        let row = rule_packs::rename(&state.db, id, require_non_blank(&name, "name")?)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::not_found("Rule pack"))?;

        Ok(row.into())
    }

    /// Games using the pack keep running without a period structure.
    async fn delete_rule_pack(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_rule_pack(&state.db, id).await?).await?;

        Ok(rule_packs::delete(&state.db, id).await.map_err(GqlError::from)?)
    }

    async fn create_period(
        &self,
        ctx: &Context<'_>,
        rule_pack_id: Uuid,
        input: PeriodInput,
    ) -> Result<Period> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, organization_for_rule_pack(&state.db, rule_pack_id).await?)
            .await?;
        check_duration(Some(input.duration))?;

        let row = rule_packs::create_period(
            &state.db,
            CreatePeriod {
                rule_pack_id,
                name: require_non_blank(&input.name, "name")?,
                code: non_blank(input.code),
                duration: input.duration,
                priority: input.priority,
            },
        )
        .await
        .map_err(|e| GqlError::conflict(e, PERIOD_CONFLICT))?;

        Ok(row.into())
    }

    async fn update_period(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdatePeriodInput,
    ) -> Result<Period> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, period_organization(state, id).await?).await?;
        check_duration(input.duration)?;

        let row = rule_packs::update_period(
            &state.db,
            id,
            UpdatePeriod {
                name: non_blank(input.name),
                code: input.code,
                duration: input.duration,
                priority: input.priority,
            },
        )
        .await
        .map_err(|e| GqlError::conflict(e, PERIOD_CONFLICT))?
        .ok_or_else(|| GqlError::not_found("Period"))?;

        Ok(row.into())
    }

    async fn delete_period(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        require_organization_manager(ctx, period_organization(state, id).await?).await?;

        Ok(rule_packs::delete_period(&state.db, id)
            .await
            .map_err(GqlError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(name: &str, duration: i32, priority: i32) -> PeriodInput {
        PeriodInput {
            name: name.to_string(),
            code: None,
            duration,
            priority,
        }
    }

    #[test]
    fn accepts_distinct_periods() {
        let periods = [period("1", 20, 1), period("2", 20, 2), period("OT", 5, 4)];
        assert!(check_periods(&periods).is_ok());
    }

    #[test]
    fn rejects_duplicates_and_empty_durations() {
        assert!(check_periods(&[period("1", 20, 1), period("1", 20, 2)]).is_err());
        assert!(check_periods(&[period("1", 20, 1), period("2", 20, 1)]).is_err());
        assert!(check_periods(&[period("1", 0, 1)]).is_err());
    }

    #[test]
    fn period_length_is_bounded() {
        assert!(check_duration(Some(MAX_PERIOD_MINUTES)).is_ok());
        assert!(check_duration(Some(MAX_PERIOD_MINUTES + 1)).is_err());
        assert!(check_periods(&[period("1", 80_000_000, 1)]).is_err());
        assert!(check_duration(None).is_ok());
    }
}
