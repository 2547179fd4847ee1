use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::domains::organizations::types::Organization;
use crate::gql::domains::players::types::Player;
use crate::gql::error::GqlError;
use crate::gql::loaders::OrganizationLoader;
use crate::state::AppState;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Team {
    pub id: ID,
    pub organization_id: ID,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: String,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::TeamRow> for Team {
    fn from(row: infra::models::TeamRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            name: row.name,
            nick: row.nick,
            short_name: row.short_name,
            status: row.status,
            logo_url: row.logo_url,
            founded: row.founded,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Team {
    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<Organization>> {
        let loader = ctx.data::<DataLoader<OrganizationLoader>>()?;
        let organization_id = Uuid::parse_str(self.organization_id.as_str())?;
        let row = loader.load_one(organization_id).await?;
        Ok(row.map(Organization::from))
    }

    /// Current roster, ordered by jersey number
    async fn players(&self, ctx: &Context<'_>) -> Result<Vec<RosterPlayer>> {
        let state = ctx.data::<AppState>()?;
        let team_id = Uuid::parse_str(self.id.as_str())?;
        let rows = infra::repos::teams::list_roster(&state.db, team_id)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(RosterPlayer::from).collect())
    }
}

/// A player as listed on one team's roster.
#[derive(SimpleObject, Clone)]
pub struct RosterPlayer {
    pub team_id: ID,
    pub jersey: Option<i32>,
    pub position: Option<String>,
    pub player: Player,
}

impl From<infra::models::RosterPlayerRow> for RosterPlayer {
    fn from(row: infra::models::RosterPlayerRow) -> Self {
        Self {
            team_id: row.team_id.into(),
            jersey: row.jersey,
            position: row.roster_position,
            player: row.player.into(),
        }
    }
}

#[derive(InputObject)]
pub struct CreateTeamInput {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
}

#[derive(InputObject)]
pub struct UpdateTeamInput {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
}

#[derive(InputObject)]
pub struct AddPlayerToTeamInput {
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub jersey: Option<i32>,
    pub position: Option<String>,
}
