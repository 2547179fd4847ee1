use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{
    filter::ListFilter,
    models::{PeriodRow, RulePackRow},
    pagination::LimitOffset,
};

const COLUMNS: &str = "id, organization_id, name, created_at, updated_at";
const PERIOD_COLUMNS: &str =
    "id, rule_pack_id, name, code, duration, priority, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateRulePack {
    pub organization_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreatePeriod {
    pub rule_pack_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub duration: i32,
    pub priority: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePeriod {
    pub name: Option<String>,
    pub code: Option<String>,
    pub duration: Option<i32>,
    pub priority: Option<i32>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM rule_packs WHERE 1=1"));
    filter.push_where(&mut query, &["name"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<RulePackRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<RulePackRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<RulePackRow>> {
    sqlx::query_as::<_, RulePackRow>(&format!("SELECT {COLUMNS} FROM rule_packs WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateRulePack,
) -> SqlxResult<RulePackRow> {
    sqlx::query_as::<_, RulePackRow>(&format!(
        "INSERT INTO rule_packs (organization_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .fetch_one(executor)
    .await
}

pub async fn rename<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    name: String,
) -> SqlxResult<Option<RulePackRow>> {
    sqlx::query_as::<_, RulePackRow>(&format!(
        "UPDATE rule_packs SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM rule_packs WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Periods of a rule pack, ordered by priority.
pub async fn list_periods<'e>(
    executor: impl PgExecutor<'e>,
    rule_pack_id: Uuid,
) -> SqlxResult<Vec<PeriodRow>> {
    sqlx::query_as::<_, PeriodRow>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM periods WHERE rule_pack_id = $1 ORDER BY priority ASC"
    ))
    .bind(rule_pack_id)
    .fetch_all(executor)
    .await
}

pub async fn get_period<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<PeriodRow>> {
    sqlx::query_as::<_, PeriodRow>(&format!("SELECT {PERIOD_COLUMNS} FROM periods WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create_period<'e>(
    executor: impl PgExecutor<'e>,
    data: CreatePeriod,
) -> SqlxResult<PeriodRow> {
    sqlx::query_as::<_, PeriodRow>(&format!(
        r#"
        INSERT INTO periods (rule_pack_id, name, code, duration, priority)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PERIOD_COLUMNS}
        "#
    ))
    .bind(data.rule_pack_id)
    .bind(data.name)
    .bind(data.code)
    .bind(data.duration)
    .bind(data.priority)
    .fetch_one(executor)
    .await
}

pub async fn update_period<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdatePeriod,
) -> SqlxResult<Option<PeriodRow>> {
    sqlx::query_as::<_, PeriodRow>(&format!(
        r#"
        UPDATE periods
        SET name = COALESCE($2, name),
            code = COALESCE($3, code),
            duration = COALESCE($4, duration),
            priority = COALESCE($5, priority),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PERIOD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.code)
    .bind(data.duration)
    .bind(data.priority)
    .fetch_optional(executor)
    .await
}

pub async fn delete_period<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM periods WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
