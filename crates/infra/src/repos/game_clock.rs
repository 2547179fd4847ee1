use chrono::{DateTime, Utc};
use sqlx::Result as SqlxResult;
use std::str::FromStr;
use uuid::Uuid;

use crate::{db::Db, models::GameClockRow};

const COLUMNS: &str = "id, game_id, clock_status, period_name, period_duration_seconds, period_end_time, pause_started_at, remaining_seconds, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Stopped,
    Running,
    Paused,
}

impl ClockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockStatus::Stopped => "stopped",
            ClockStatus::Running => "running",
            ClockStatus::Paused => "paused",
        }
    }
}

impl FromStr for ClockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(ClockStatus::Stopped),
            "running" => Ok(ClockStatus::Running),
            "paused" => Ok(ClockStatus::Paused),
            _ => Err(format!("Unknown clock status: {}", s)),
        }
    }
}

impl GameClockRow {
    pub fn status(&self) -> ClockStatus {
        ClockStatus::from_str(&self.clock_status).unwrap_or(ClockStatus::Stopped)
    }

    /// Seconds left in the active period as seen at `now`.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> i64 {
        match (self.status(), self.period_end_time) {
            (ClockStatus::Running, Some(end)) => {
                let millis = (end - now).num_milliseconds().max(0);
                // Round up so a clock showing 00:00 has really expired.
                (millis + 999) / 1000
            }
            _ => i64::from(self.remaining_seconds.max(0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameClockRepo {
    pub pool: Db,
}

impl GameClockRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get_clock(&self, game_id: Uuid) -> SqlxResult<Option<GameClockRow>> {
        sqlx::query_as::<_, GameClockRow>(&format!(
            "SELECT {COLUMNS} FROM game_clocks WHERE game_id = $1"
        ))
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Initialize a stopped clock on the given period with its full duration.
    pub async fn create_clock(
        &self,
        game_id: Uuid,
        period_name: &str,
        duration_seconds: i32,
    ) -> SqlxResult<GameClockRow> {
        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            INSERT INTO game_clocks (game_id, clock_status, period_name, period_duration_seconds, remaining_seconds)
            VALUES ($1, 'stopped', $2, $3, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(period_name)
        .bind(duration_seconds)
        .fetch_one(&self.pool)
        .await
    }

    /// Start a stopped clock or resume a paused one. `None` when already running.
    pub async fn start_clock(&self, game_id: Uuid) -> SqlxResult<Option<GameClockRow>> {
        let now = Utc::now();

        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            UPDATE game_clocks
            SET clock_status = 'running',
                period_end_time = $2 + (remaining_seconds * INTERVAL '1 second'),
                pause_started_at = NULL,
                updated_at = NOW()
            WHERE game_id = $1 AND clock_status <> 'running' AND remaining_seconds > 0
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    /// Freeze a running clock. `None` when the clock is not running.
    pub async fn pause_clock(&self, game_id: Uuid) -> SqlxResult<Option<GameClockRow>> {
        let now = Utc::now();

        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            UPDATE game_clocks
            SET clock_status = 'paused',
                remaining_seconds = GREATEST(CEIL(EXTRACT(EPOCH FROM (period_end_time - $2))), 0)::int,
                pause_started_at = $2,
                period_end_time = NULL,
                updated_at = NOW()
            WHERE game_id = $1 AND clock_status = 'running'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    /// Switch to another period; the clock stops with that period's full duration.
    pub async fn set_period(
        &self,
        game_id: Uuid,
        period_name: &str,
        duration_seconds: i32,
    ) -> SqlxResult<Option<GameClockRow>> {
        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            UPDATE game_clocks
            SET clock_status = 'stopped',
                period_name = $2,
                period_duration_seconds = $3,
                remaining_seconds = $3,
                period_end_time = NULL,
                pause_started_at = NULL,
                updated_at = NOW()
            WHERE game_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(period_name)
        .bind(duration_seconds)
        .fetch_optional(&self.pool)
        .await
    }

    /// Overwrite the remaining time, keeping the clock's running state.
    pub async fn set_remaining(
        &self,
        game_id: Uuid,
        remaining_seconds: i32,
    ) -> SqlxResult<Option<GameClockRow>> {
        let now = Utc::now();

        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            UPDATE game_clocks
            SET remaining_seconds = $2,
                period_end_time = CASE
                    WHEN clock_status = 'running' THEN $3 + ($2 * INTERVAL '1 second')
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE game_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(remaining_seconds)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    /// Games whose running clock has reached the end of the period.
    pub async fn get_expired_clocks(&self) -> SqlxResult<Vec<Uuid>> {
        let now = Utc::now();

        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT game_id FROM game_clocks
             WHERE clock_status = 'running'
               AND period_end_time IS NOT NULL
               AND period_end_time <= $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Stop an expired clock at 00:00. `None` if it was changed concurrently.
    pub async fn expire_clock(&self, game_id: Uuid) -> SqlxResult<Option<GameClockRow>> {
        let now = Utc::now();

        sqlx::query_as::<_, GameClockRow>(&format!(
            r#"
            UPDATE game_clocks
            SET clock_status = 'stopped',
                remaining_seconds = 0,
                period_end_time = NULL,
                updated_at = NOW()
            WHERE game_id = $1 AND clock_status = 'running' AND period_end_time <= $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(game_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn clock(status: &str, end: Option<DateTime<Utc>>, remaining: i32) -> GameClockRow {
        let now = Utc::now();
        GameClockRow {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            clock_status: status.to_string(),
            period_name: "1".to_string(),
            period_duration_seconds: 1200,
            period_end_time: end,
            pause_started_at: None,
            remaining_seconds: remaining,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn running_clock_counts_down_from_end_time() {
        let now = Utc::now();
        let row = clock("running", Some(now + Duration::milliseconds(90_500)), 1200);
        assert_eq!(row.remaining_at(now), 91);
    }

    #[test]
    fn expired_running_clock_reports_zero() {
        let now = Utc::now();
        let row = clock("running", Some(now - Duration::seconds(3)), 1200);
        assert_eq!(row.remaining_at(now), 0);
    }

    #[test]
    fn paused_clock_uses_frozen_value() {
        let row = clock("paused", None, 300);
        assert_eq!(row.remaining_at(Utc::now()), 300);
        assert_eq!(row.status(), ClockStatus::Paused);
    }

    #[test]
    fn unknown_status_reads_as_stopped() {
        assert_eq!(clock("bogus", None, 0).status(), ClockStatus::Stopped);
        assert!("bogus".parse::<ClockStatus>().is_err());
    }
}
