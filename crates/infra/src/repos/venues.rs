use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::VenueRow, pagination::LimitOffset};

const COLUMNS: &str =
    "id, organization_id, name, nick, capacity, address, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateVenue {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM venues WHERE 1=1"));
    filter.push_where(&mut query, &["name", "nick"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<VenueRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<VenueRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<VenueRow>> {
    sqlx::query_as::<_, VenueRow>(&format!("SELECT {COLUMNS} FROM venues WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateVenue) -> SqlxResult<VenueRow> {
    sqlx::query_as::<_, VenueRow>(&format!(
        r#"
        INSERT INTO venues (organization_id, name, nick, capacity, address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.capacity)
    .bind(data.address)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateVenue,
) -> SqlxResult<Option<VenueRow>> {
    sqlx::query_as::<_, VenueRow>(&format!(
        r#"
        UPDATE venues
        SET name = COALESCE($2, name),
            nick = COALESCE($3, nick),
            capacity = COALESCE($4, capacity),
            address = COALESCE($5, address),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.capacity)
    .bind(data.address)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM venues WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
