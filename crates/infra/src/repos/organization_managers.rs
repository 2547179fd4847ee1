use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::models::{OrganizationManagerRow, OrganizationRow};

#[derive(Debug, Clone)]
pub struct CreateOrganizationManager {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub assigned_by: Option<Uuid>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateOrganizationManager,
) -> Result<OrganizationManagerRow> {
    sqlx::query_as::<_, OrganizationManagerRow>(
        r#"
        INSERT INTO organization_managers (organization_id, user_id, assigned_by)
        VALUES ($1, $2, $3)
        ON CONFLICT (organization_id, user_id) DO UPDATE SET assigned_by = EXCLUDED.assigned_by
        RETURNING id, organization_id, user_id, assigned_by, assigned_at
        "#,
    )
    .bind(data.organization_id)
    .bind(data.user_id)
    .bind(data.assigned_by)
    .fetch_one(executor)
    .await
}

pub async fn remove<'e>(
    executor: impl PgExecutor<'e>,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        "DELETE FROM organization_managers WHERE organization_id = $1 AND user_id = $2",
    )
    .bind(organization_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_organization_manager<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    organization_id: Uuid,
) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM organization_managers WHERE user_id = $1 AND organization_id = $2)",
    )
    .bind(user_id)
    .bind(organization_id)
    .fetch_one(executor)
    .await
}

/// Organizations a user manages.
pub async fn list_managed_organizations<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> Result<Vec<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(
        r#"
        SELECT o.id, o.name, o.short_name, o.status, o.logo_url, o.created_at, o.updated_at
        FROM organizations o
        INNER JOIN organization_managers om ON om.organization_id = o.id
        WHERE om.user_id = $1
        ORDER BY o.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
