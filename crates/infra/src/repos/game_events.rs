use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::GameEventRow;

const COLUMNS: &str = "id, game_id, event_type, side, period, remaining_time, game_time, player_id, description, recorded_by, created_at";

#[derive(Debug, Clone)]
pub struct CreateGameEvent {
    pub game_id: Uuid,
    pub event_type: String,
    pub side: String,
    pub period: String,
    pub remaining_time: String,
    pub game_time: String,
    pub player_id: Option<Uuid>,
    pub description: Option<String>,
    pub recorded_by: Option<Uuid>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateGameEvent,
) -> SqlxResult<GameEventRow> {
    sqlx::query_as::<_, GameEventRow>(&format!(
        r#"
        INSERT INTO game_events (game_id, event_type, side, period, remaining_time, game_time,
                                 player_id, description, recorded_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.game_id)
    .bind(data.event_type)
    .bind(data.side)
    .bind(data.period)
    .bind(data.remaining_time)
    .bind(data.game_time)
    .bind(data.player_id)
    .bind(data.description)
    .bind(data.recorded_by)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<GameEventRow>> {
    sqlx::query_as::<_, GameEventRow>(&format!("SELECT {COLUMNS} FROM game_events WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Events of a game in chronological order, optionally restricted to one period.
pub async fn list_by_game<'e>(
    executor: impl PgExecutor<'e>,
    game_id: Uuid,
    period: Option<&str>,
) -> SqlxResult<Vec<GameEventRow>> {
    sqlx::query_as::<_, GameEventRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM game_events
        WHERE game_id = $1 AND ($2::text IS NULL OR period = $2)
        ORDER BY LPAD(game_time, 8, '0') ASC, created_at ASC
        "#
    ))
    .bind(game_id)
    .bind(period)
    .fetch_all(executor)
    .await
}

/// Delete an event and return it; `None` when it was already gone.
///
/// The row lock taken by the delete makes a concurrent delete of the same
/// event wait, then affect no rows.
pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<GameEventRow>> {
    sqlx::query_as::<_, GameEventRow>(&format!(
        "DELETE FROM game_events WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}
