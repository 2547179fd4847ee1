use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::OrganizationRow, pagination::LimitOffset};

const COLUMNS: &str = "id, name, short_name, status, logo_url, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM organizations WHERE 1=1"));
    // Organizations are the tenant root; only the search part of the filter applies.
    let filter = ListFilter {
        organization_id: None,
        search: filter.search.clone(),
    };
    filter.push_where(&mut query, &["name", "short_name"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<OrganizationRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query
        .build_query_as::<OrganizationRow>()
        .fetch_all(executor)
        .await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(&format!(
        "SELECT {COLUMNS} FROM organizations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(&format!(
        "SELECT {COLUMNS} FROM organizations WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateOrganization,
) -> SqlxResult<OrganizationRow> {
    sqlx::query_as::<_, OrganizationRow>(&format!(
        r#"
        INSERT INTO organizations (name, short_name, status, logo_url)
        VALUES ($1, $2, COALESCE($3, 'active'), $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.name)
    .bind(data.short_name)
    .bind(data.status)
    .bind(data.logo_url)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateOrganization,
) -> SqlxResult<Option<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(&format!(
        r#"
        UPDATE organizations
        SET name = COALESCE($2, name),
            short_name = COALESCE($3, short_name),
            status = COALESCE($4, status),
            logo_url = COALESCE($5, logo_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.short_name)
    .bind(data.status)
    .bind(data.logo_url)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
