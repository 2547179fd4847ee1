use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::domains::organizations::types::Organization;
use crate::gql::loaders::OrganizationLoader;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Venue {
    pub id: ID,
    pub organization_id: ID,
    pub name: String,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::VenueRow> for Venue {
    fn from(row: infra::models::VenueRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            name: row.name,
            nick: row.nick,
            capacity: row.capacity,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Venue {
    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<Organization>> {
        let loader = ctx.data::<DataLoader<OrganizationLoader>>()?;
        let organization_id = Uuid::parse_str(self.organization_id.as_str())?;
        Ok(loader.load_one(organization_id).await?.map(Organization::from))
    }
}

#[derive(InputObject)]
pub struct CreateVenueInput {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateVenueInput {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
}
