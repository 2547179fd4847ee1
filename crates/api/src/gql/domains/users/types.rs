use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::common::types::Role;
use crate::gql::domains::organizations::types::Organization;
use crate::gql::error::GqlError;
use crate::state::AppState;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::UserRow> for User {
    fn from(row: infra::models::UserRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            name: row.name,
            role: Role::from(row.role),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl User {
    async fn managed_organizations(&self, ctx: &Context<'_>) -> Result<Vec<Organization>> {
        let state = ctx.data::<AppState>()?;
        let user_id = Uuid::parse_str(self.id.as_str())?;
        let rows =
            infra::repos::organization_managers::list_managed_organizations(&state.db, user_id)
                .await
                .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(Organization::from).collect())
    }
}

#[derive(InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}
