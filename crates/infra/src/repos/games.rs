use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::ListFilter, models::GameRow, pagination::LimitOffset};

const COLUMNS: &str = "id, organization_id, name, info, start_date, start_time, competition_id, season_id, venue_id, rule_pack_id, host_team_id, guest_team_id, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub list: ListFilter,
    pub competition_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CreateGame {
    pub organization_id: Uuid,
    pub name: String,
    pub info: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub competition_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub rule_pack_id: Option<Uuid>,
    pub host_team_id: Uuid,
    pub guest_team_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGame {
    pub name: Option<String>,
    pub info: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub competition_id: Option<Uuid>,
    pub season_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub rule_pack_id: Option<Uuid>,
    pub host_team_id: Option<Uuid>,
    pub guest_team_id: Option<Uuid>,
}

fn filtered(select: &str, filter: &GameFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM games WHERE 1=1"));
    filter.list.push_where(&mut query, &["name"]);

    if let Some(competition_id) = filter.competition_id {
        query.push(" AND competition_id = ");
        query.push_bind(competition_id);
    }
    if let Some(season_id) = filter.season_id {
        query.push(" AND season_id = ");
        query.push_bind(season_id);
    }
    if let Some(team_id) = filter.team_id {
        query.push(" AND (host_team_id = ");
        query.push_bind(team_id);
        query.push(" OR guest_team_id = ");
        query.push_bind(team_id);
        query.push(")");
    }
    if let Some(from) = filter.from {
        query.push(" AND start_date >= ");
        query.push_bind(from);
    }
    if let Some(to) = filter.to {
        query.push(" AND start_date <= ");
        query.push_bind(to);
    }
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &GameFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<GameRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY start_date DESC NULLS LAST, start_time DESC NULLS LAST LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<GameRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &GameFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<GameRow>> {
    sqlx::query_as::<_, GameRow>(&format!("SELECT {COLUMNS} FROM games WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateGame) -> SqlxResult<GameRow> {
    sqlx::query_as::<_, GameRow>(&format!(
        r#"
        INSERT INTO games (organization_id, name, info, start_date, start_time, competition_id,
                           season_id, venue_id, rule_pack_id, host_team_id, guest_team_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .bind(data.info)
    .bind(data.start_date)
    .bind(data.start_time)
    .bind(data.competition_id)
    .bind(data.season_id)
    .bind(data.venue_id)
    .bind(data.rule_pack_id)
    .bind(data.host_team_id)
    .bind(data.guest_team_id)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateGame,
) -> SqlxResult<Option<GameRow>> {
    sqlx::query_as::<_, GameRow>(&format!(
        r#"
        UPDATE games
        SET name = COALESCE($2, name),
            info = COALESCE($3, info),
            start_date = COALESCE($4, start_date),
            start_time = COALESCE($5, start_time),
            competition_id = COALESCE($6, competition_id),
            season_id = COALESCE($7, season_id),
            venue_id = COALESCE($8, venue_id),
            rule_pack_id = COALESCE($9, rule_pack_id),
            host_team_id = COALESCE($10, host_team_id),
            guest_team_id = COALESCE($11, guest_team_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.info)
    .bind(data.start_date)
    .bind(data.start_time)
    .bind(data.competition_id)
    .bind(data.season_id)
    .bind(data.venue_id)
    .bind(data.rule_pack_id)
    .bind(data.host_team_id)
    .bind(data.guest_team_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM games WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
