use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::error::GqlError;
use crate::state::AppState;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct RulePack {
    pub id: ID,
    pub organization_id: ID,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::RulePackRow> for RulePack {
    fn from(row: infra::models::RulePackRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl RulePack {
    /// Periods in play order
    async fn periods(&self, ctx: &Context<'_>) -> Result<Vec<Period>> {
        let state = ctx.data::<AppState>()?;
        let rule_pack_id = Uuid::parse_str(self.id.as_str())?;
        let rows = infra::repos::rule_packs::list_periods(&state.db, rule_pack_id)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(Period::from).collect())
    }

    /// Sum of all period durations
    async fn total_minutes(&self, ctx: &Context<'_>) -> Result<i32> {
        Ok(self.periods(ctx).await?.iter().map(|p| p.duration).sum())
    }
}

#[derive(SimpleObject, Clone)]
pub struct Period {
    pub id: ID,
    pub rule_pack_id: ID,
    pub name: String,
    pub code: Option<String>,
    /// Minutes
    pub duration: i32,
    pub priority: i32,
}

impl From<infra::models::PeriodRow> for Period {
    fn from(row: infra::models::PeriodRow) -> Self {
        Self {
            id: row.id.into(),
            rule_pack_id: row.rule_pack_id.into(),
            name: row.name,
            code: row.code,
            duration: row.duration,
            priority: row.priority,
        }
    }
}

#[derive(InputObject)]
pub struct CreateRulePackInput {
    pub organization_id: Uuid,
    pub name: String,
    /// Optional initial periods
    pub periods: Option<Vec<PeriodInput>>,
}

#[derive(InputObject)]
pub struct PeriodInput {
    pub name: String,
    pub code: Option<String>,
    pub duration: i32,
    pub priority: i32,
}

#[derive(InputObject)]
pub struct UpdatePeriodInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub duration: Option<i32>,
    pub priority: Option<i32>,
}
