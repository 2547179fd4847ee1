use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{CounterColumns, GameResultPeriodRow, GameResultRow};

const COUNTERS: &str = "host_goals, guest_goals, host_shots, guest_shots, host_saves, guest_saves, \
    host_penalties, guest_penalties, host_face_offs, guest_face_offs, host_penalty_shots, \
    guest_penalty_shots, host_injuries, guest_injuries, host_timeouts, guest_timeouts";

fn result_columns() -> String {
    format!("id, game_id, game_status, period_active, {COUNTERS}, created_at, updated_at")
}

fn period_columns() -> String {
    format!("id, game_result_id, period, {COUNTERS}, created_at, updated_at")
}

pub async fn get_by_game<'e>(
    executor: impl PgExecutor<'e>,
    game_id: Uuid,
) -> SqlxResult<Option<GameResultRow>> {
    sqlx::query_as::<_, GameResultRow>(&format!(
        "SELECT {} FROM game_results WHERE game_id = $1",
        result_columns()
    ))
    .bind(game_id)
    .fetch_optional(executor)
    .await
}

/// Create the result row for a game if it does not exist yet, then return it locked.
///
/// Must run inside a transaction for the lock to be meaningful.
pub async fn ensure_locked<'e>(
    executor: impl PgExecutor<'e>,
    game_id: Uuid,
) -> SqlxResult<GameResultRow> {
    // The no-op update makes the upsert return (and lock) an existing row.
    sqlx::query_as::<_, GameResultRow>(&format!(
        r#"
        INSERT INTO game_results (game_id)
        VALUES ($1)
        ON CONFLICT (game_id) DO UPDATE SET game_id = EXCLUDED.game_id
        RETURNING {}
        "#,
        result_columns()
    ))
    .bind(game_id)
    .fetch_one(executor)
    .await
}

/// Per-period breakdown row, created on first use.
pub async fn ensure_period<'e>(
    executor: impl PgExecutor<'e>,
    game_result_id: Uuid,
    period: &str,
) -> SqlxResult<GameResultPeriodRow> {
    sqlx::query_as::<_, GameResultPeriodRow>(&format!(
        r#"
        INSERT INTO game_result_periods (game_result_id, period)
        VALUES ($1, $2)
        ON CONFLICT (game_result_id, period) DO UPDATE SET period = EXCLUDED.period
        RETURNING {}
        "#,
        period_columns()
    ))
    .bind(game_result_id)
    .bind(period)
    .fetch_one(executor)
    .await
}

pub async fn list_periods<'e>(
    executor: impl PgExecutor<'e>,
    game_result_id: Uuid,
) -> SqlxResult<Vec<GameResultPeriodRow>> {
    sqlx::query_as::<_, GameResultPeriodRow>(&format!(
        "SELECT {} FROM game_result_periods WHERE game_result_id = $1 ORDER BY created_at ASC",
        period_columns()
    ))
    .bind(game_result_id)
    .fetch_all(executor)
    .await
}

fn push_counter_assignments(query: &mut QueryBuilder<'_, Postgres>, counters: &CounterColumns) {
    let mut assignments = query.separated(", ");
    for (column, value) in counters.columns() {
        assignments.push(format!("{column} = "));
        assignments.push_bind_unseparated(value);
    }
}

pub async fn write_counters<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    counters: &CounterColumns,
) -> SqlxResult<GameResultRow> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE game_results SET ");
    push_counter_assignments(&mut query, counters);
    query.push(", updated_at = NOW() WHERE id = ");
    query.push_bind(id);
    query.push(format!(" RETURNING {}", result_columns()));

    query
        .build_query_as::<GameResultRow>()
        .fetch_one(executor)
        .await
}

pub async fn write_period_counters<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    counters: &CounterColumns,
) -> SqlxResult<GameResultPeriodRow> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE game_result_periods SET ");
    push_counter_assignments(&mut query, counters);
    query.push(", updated_at = NOW() WHERE id = ");
    query.push_bind(id);
    query.push(format!(" RETURNING {}", period_columns()));

    query
        .build_query_as::<GameResultPeriodRow>()
        .fetch_one(executor)
        .await
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    game_id: Uuid,
    status: &str,
) -> SqlxResult<GameResultRow> {
    sqlx::query_as::<_, GameResultRow>(&format!(
        r#"
        INSERT INTO game_results (game_id, game_status)
        VALUES ($1, $2)
        ON CONFLICT (game_id) DO UPDATE SET game_status = EXCLUDED.game_status, updated_at = NOW()
        RETURNING {}
        "#,
        result_columns()
    ))
    .bind(game_id)
    .bind(status)
    .fetch_one(executor)
    .await
}

pub async fn set_period_active<'e>(
    executor: impl PgExecutor<'e>,
    game_id: Uuid,
    period: &str,
) -> SqlxResult<GameResultRow> {
    sqlx::query_as::<_, GameResultRow>(&format!(
        r#"
        INSERT INTO game_results (game_id, period_active)
        VALUES ($1, $2)
        ON CONFLICT (game_id) DO UPDATE SET period_active = EXCLUDED.period_active, updated_at = NOW()
        RETURNING {}
        "#,
        result_columns()
    ))
    .bind(game_id)
    .bind(period)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_update_binds_every_column() {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE game_results SET ");
        push_counter_assignments(&mut query, &CounterColumns::default());

        let sql = query.sql();
        assert!(sql.starts_with("UPDATE game_results SET host_goals = $1, guest_goals = $2"));
        assert!(sql.ends_with("guest_timeouts = $16"));
    }
}
