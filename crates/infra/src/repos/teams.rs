use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{
    filter::ListFilter,
    models::{RosterPlayerRow, TeamPlayerRow, TeamRow},
    pagination::LimitOffset,
};

const COLUMNS: &str = "id, organization_id, name, nick, short_name, status, logo_url, founded, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct AddTeamPlayer {
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub jersey: Option<i32>,
    pub position: Option<String>,
}

fn filtered(select: &str, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM teams WHERE 1=1"));
    filter.push_where(&mut query, &["name", "nick", "short_name"]);
    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ListFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<TeamRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<TeamRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &ListFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(&format!("SELECT {COLUMNS} FROM teams WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(&format!(
        "SELECT {COLUMNS} FROM teams WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateTeam) -> SqlxResult<TeamRow> {
    sqlx::query_as::<_, TeamRow>(&format!(
        r#"
        INSERT INTO teams (organization_id, name, nick, short_name, status, logo_url, founded)
        VALUES ($1, $2, $3, $4, COALESCE($5, 'active'), $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.organization_id)
    .bind(data.name)
    .bind(data.nick)
    .bind(data.short_name)
    .bind(data.status)
    .bind(data.logo_url)
    .bind(data.founded)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateTeam,
) -> SqlxResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(&format!(
        r#"
        UPDATE teams
        SET name = COALESCE($2, name),
            nick = COALESCE($3, nick),
            short_name = COALESCE($4, short_name),
            status = COALESCE($5, status),
            logo_url = COALESCE($6, logo_url),
            founded = COALESCE($7, founded),
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
    .bind(data.logo_url)
    .bind(data.founded)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Add a player to a team roster, or update jersey/position if already there.
pub async fn add_player<'e>(
    executor: impl PgExecutor<'e>,
    data: AddTeamPlayer,
) -> SqlxResult<TeamPlayerRow> {
    sqlx::query_as::<_, TeamPlayerRow>(
        r#"
        INSERT INTO team_players (team_id, player_id, jersey, position)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (team_id, player_id) DO UPDATE SET
            jersey = EXCLUDED.jersey,
            position = EXCLUDED.position
        RETURNING id, team_id, player_id, jersey, position, created_at
        "#,
    )
    .bind(data.team_id)
    .bind(data.player_id)
    .bind(data.jersey)
    .bind(data.position)
    .fetch_one(executor)
    .await
}

pub async fn remove_player<'e>(
    executor: impl PgExecutor<'e>,
    team_id: Uuid,
    player_id: Uuid,
) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM team_players WHERE team_id = $1 AND player_id = $2")
        .bind(team_id)
        .bind(player_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_roster<'e>(
    executor: impl PgExecutor<'e>,
    team_id: Uuid,
) -> SqlxResult<Vec<RosterPlayerRow>> {
    sqlx::query_as::<_, RosterPlayerRow>(
        r#"
        SELECT tp.team_id, tp.jersey, tp.position AS roster_position,
               p.id, p.organization_id, p.first_name, p.last_name, p.birthday, p.country,
               p.position, p.stick, p.height, p.weight, p.avatar_url, p.created_at, p.updated_at
        FROM team_players tp
        INNER JOIN players p ON p.id = tp.player_id
        WHERE tp.team_id = $1
        ORDER BY tp.jersey ASC NULLS LAST, p.last_name ASC
        "#,
    )
    .bind(team_id)
    .fetch_all(executor)
    .await
}

pub async fn list_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT t.id, t.organization_id, t.name, t.nick, t.short_name, t.status, t.logo_url,
               t.founded, t.created_at, t.updated_at
        FROM teams t
        INNER JOIN team_players tp ON tp.team_id = t.id
        WHERE tp.player_id = $1
        ORDER BY t.name ASC
        "#,
    )
    .bind(player_id)
    .fetch_all(executor)
    .await
}
