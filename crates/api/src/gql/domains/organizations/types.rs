use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};

#[derive(SimpleObject, Clone)]
pub struct Organization {
    pub id: ID,
    pub name: String,
    pub short_name: Option<String>,
    pub status: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::OrganizationRow> for Organization {
    fn from(row: infra::models::OrganizationRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            short_name: row.short_name,
            status: row.status,
            logo_url: row.logo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(InputObject)]
pub struct CreateOrganizationInput {
    pub name: String,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateOrganizationInput {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
}
