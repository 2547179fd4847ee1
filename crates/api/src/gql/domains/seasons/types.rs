use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::gql::domains::organizations::types::Organization;
use crate::gql::loaders::OrganizationLoader;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Season {
    pub id: ID,
    pub organization_id: ID,
    pub name: String,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::SeasonRow> for Season {
    fn from(row: infra::models::SeasonRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            name: row.name,
            nick: row.nick,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Season {
    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<Organization>> {
        let loader = ctx.data::<DataLoader<OrganizationLoader>>()?;
        let organization_id = Uuid::parse_str(self.organization_id.as_str())?;
        Ok(loader.load_one(organization_id).await?.map(Organization::from))
    }
}

#[derive(InputObject)]
pub struct CreateSeasonInput {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(InputObject)]
pub struct UpdateSeasonInput {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
