use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::CompetitionRow, pagination::LimitOffset};

const COLUMNS: &str =
    "id, organization_id, name, nick, short_name, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateCompetition {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCompetition {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM competitions WHERE 1=1"));
    filter.push_where(&mut query, &["name", "nick", "short_name"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<CompetitionRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query
        .build_query_as::<CompetitionRow>()
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
) -> SqlxResult<Option<CompetitionRow>> {
    sqlx::query_as::<_, CompetitionRow>(&format!(
        "SELECT {COLUMNS} FROM competitions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateCompetition,
) -> SqlxResult<CompetitionRow> {
    sqlx::query_as::<_, CompetitionRow>(&format!(
        r#"
        INSERT INTO competitions (organization_id, name, nick, short_name, status)
        VALUES ($1, $2, $3, $4, COALESCE($5, 'active'))
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.short_name)
    .bind(data.status)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateCompetition,
) -> SqlxResult<Option<CompetitionRow>> {
    sqlx::query_as::<_, CompetitionRow>(&format!(
        r#"
        UPDATE competitions
        SET name = COALESCE($2, name),
            nick = COALESCE($3, nick),
            short_name = COALESCE($4, short_name),
            status = COALESCE($5, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.short_name)
    .bind(data.status)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM competitions WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
