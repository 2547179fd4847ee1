use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::gql::domains::organizations::types::Organization;
use crate::gql::domains::teams::types::Team;
use crate::gql::error::GqlError;
use crate::gql::loaders::OrganizationLoader;
use crate::state::AppState;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Player {
    pub id: ID,
    pub organization_id: ID,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub country: Option<String>,
    pub position: Option<String>,
    pub stick: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::PlayerRow> for Player {
    fn from(row: infra::models::PlayerRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            first_name: row.first_name,
            last_name: row.last_name,
            birthday: row.birthday,
            country: row.country,
            position: row.position,
            stick: row.stick,
            height: row.height,
            weight: row.weight,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Player {
    async fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<Organization>> {
        let loader = ctx.data::<DataLoader<OrganizationLoader>>()?;
        let organization_id = Uuid::parse_str(self.organization_id.as_str())?;
        let row = loader.load_one(organization_id).await?;
        Ok(row.map(Organization::from))
    }

    /// Teams whose roster lists this player
    async fn teams(&self, ctx: &Context<'_>) -> Result<Vec<Team>> {
        let state = ctx.data::<AppState>()?;
        let player_id = Uuid::parse_str(self.id.as_str())?;
        let rows = infra::repos::teams::list_for_player(&state.db, player_id)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(Team::from).collect())
    }
}

#[derive(InputObject)]
pub struct CreatePlayerInput {
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub country: Option<String>,
    pub position: Option<String>,
    pub stick: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub avatar_url: Option<String>,
}

#[derive(InputObject)]
pub struct UpdatePlayerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub country: Option<String>,
    pub position: Option<String>,
    pub stick: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub avatar_url: Option<String>,
}
