use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::SeasonRow, pagination::LimitOffset};

const COLUMNS: &str =
    "id, organization_id, name, nick, start_date, end_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateSeason {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSeason {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM seasons WHERE 1=1"));
    filter.push_where(&mut query, &["name", "nick"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<SeasonRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY start_date DESC NULLS LAST, name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<SeasonRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(&format!("SELECT {COLUMNS} FROM seasons WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateSeason) -> SqlxResult<SeasonRow> {
    sqlx::query_as::<_, SeasonRow>(&format!(
        r#"
        INSERT INTO seasons (organization_id, name, nick, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.start_date)
    .bind(data.end_date)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateSeason,
) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(&format!(
        r#"
        UPDATE seasons
        SET name = COALESCE($2, name),
            nick = COALESCE($3, nick),
            start_date = COALESCE($4, start_date),
            end_date = COALESCE($5, end_date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.start_date)
    .bind(data.end_date)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
