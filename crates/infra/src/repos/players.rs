use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::PlayerRow, pagination::LimitOffset};

const COLUMNS: &str = "id, organization_id, first_name, last_name, birthday, country, position, stick, height, weight, avatar_url, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreatePlayer {
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

#[derive(Debug, Clone, Default)]
pub struct UpdatePlayer {
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

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM players WHERE 1=1"));
    filter.push_where(&mut query, &["first_name", "last_name"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<PlayerRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY last_name ASC, first_name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<PlayerRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(&format!("SELECT {COLUMNS} FROM players WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(&format!(
        "SELECT {COLUMNS} FROM players WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreatePlayer) -> SqlxResult<PlayerRow> {
    sqlx::query_as::<_, PlayerRow>(&format!(
        r#"
        INSERT INTO players (organization_id, first_name, last_name, birthday, country,
                             position, stick, height, weight, avatar_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.birthday)
    .bind(data.country)
    .bind(data.position)
    .bind(data.stick)
    .bind(data.height)
    .bind(data.weight)
    .bind(data.avatar_url)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdatePlayer,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(&format!(
        r#"
        UPDATE players
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            birthday = COALESCE($4, birthday),
            country = COALESCE($5, country),
            position = COALESCE($6, position),
            stick = COALESCE($7, stick),
            height = COALESCE($8, height),
            weight = COALESCE($9, weight),
            avatar_url = COALESCE($10, avatar_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.birthday)
    .bind(data.country)
    .bind(data.position)
    .bind(data.stick)
    .bind(data.height)
    .bind(data.weight)
    .bind(data.avatar_url)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
