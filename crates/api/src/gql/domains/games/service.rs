use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::play::{self, EventType, GameTally, PeriodSpec, PeriodTally, Side};
use infra::models::{GameClockRow, GameEventRow, GameRow};
use infra::repos::{game_events, game_results, games, rule_packs, CreateGameEvent, GameClockRepo};

use super::types::{GameClock, GameResult, GameStatus};

type ServiceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Periods of the game's rule pack; empty when the game has none.
pub async fn load_periods(pool: &PgPool, rule_pack_id: Option<Uuid>) -> ServiceResult<Vec<PeriodSpec>> {
    let Some(rule_pack_id) = rule_pack_id else {
        return Ok(Vec::new());
    };
    let rows = rule_packs::list_periods(pool, rule_pack_id).await?;
    Ok(rows.iter().map(PeriodSpec::from).collect())
}

pub async fn load_game(pool: &PgPool, game_id: Uuid) -> ServiceResult<GameRow> {
    Ok(games::get_by_id(pool, game_id).await?.ok_or("Game not found")?)
}

pub async fn load_result(pool: &PgPool, game_id: Uuid) -> ServiceResult<GameResult> {
    let Some(row) = game_results::get_by_game(pool, game_id).await? else {
        return Ok(GameResult::empty(game_id));
    };
    let periods = game_results::list_periods(pool, row.id).await?;
    Ok(GameResult::from_rows(row, periods))
}

pub async fn load_clock(pool: &PgPool, game_id: Uuid) -> ServiceResult<Option<GameClock>> {
    let Some(row) = GameClockRepo::new(pool.clone()).get_clock(game_id).await? else {
        return Ok(None);
    };
    Ok(Some(clock_view(pool, &row).await?))
}

/// Clock row as seen right now, with game time against the game's rule pack.
pub async fn clock_view(pool: &PgPool, row: &GameClockRow) -> ServiceResult<GameClock> {
    let game = load_game(pool, row.game_id).await?;
    let periods = load_periods(pool, game.rule_pack_id).await?;
    Ok(GameClock::build(row, &periods, Utc::now()))
}

/// Change one counter in the game total and in the period breakdown. Returns the new total.
///
/// Locks the result row; `conn` must be inside a transaction.
async fn apply_delta(
    conn: &mut PgConnection,
    game_id: Uuid,
    period: &str,
    event: EventType,
    side: Side,
    delta: i32,
) -> ServiceResult<i32> {
    let result = game_results::ensure_locked(&mut *conn, game_id).await?;
    let period_row = game_results::ensure_period(&mut *conn, result.id, period).await?;

    let mut tally = GameTally {
        total: result.counters,
        periods: vec![PeriodTally {
            period: period.to_string(),
            counters: period_row.counters,
        }],
    };
    tally.apply(period, event, side, delta);

    game_results::write_counters(&mut *conn, result.id, &tally.total).await?;
    if let Some(updated) = tally.period(period) {
        game_results::write_period_counters(&mut *conn, period_row.id, &updated.counters).await?;
    }
    Ok(play::tally::get(&tally.total, event, side))
}

fn check_period(period: &str, periods: &[PeriodSpec]) -> ServiceResult<()> {
    if !periods.is_empty() && !periods.iter().any(|p| p.name == period) {
        return Err(format!("Unknown period: {period}").into());
    }
    Ok(())
}

/// `MM:SS` for `seconds`, capped at the period's duration when the period is known.
fn clamp_remaining(seconds: u32, period: &str, periods: &[PeriodSpec]) -> String {
    let seconds = match periods.iter().find(|p| p.name == period) {
        Some(spec) => seconds.min(spec.duration_seconds()),
        None => seconds,
    };
    play::format_clock(seconds)
}

/// Parameters for recording an event (parsed by the resolver).
pub struct RecordEventParams {
    pub game_id: Uuid,
    pub event: EventType,
    pub side: Side,
    pub period: Option<String>,
    pub remaining_time: Option<String>,
    pub player_id: Option<Uuid>,
    pub description: Option<String>,
    pub recorded_by: Option<Uuid>,
}

/// Store an event and count it, in one transaction.
///
/// The period falls back to the clock, then the result's active period, then
/// the first period of the rule pack. The remaining time falls back to the
/// clock when it is on the same period.
pub async fn record_event(pool: &PgPool, params: RecordEventParams) -> ServiceResult<GameEventRow> {
    let game = load_game(pool, params.game_id).await?;
    let periods = load_periods(pool, game.rule_pack_id).await?;
    let clock = GameClockRepo::new(pool.clone()).get_clock(game.id).await?;

    let period = match params.period {
        Some(period) => period,
        None => match &clock {
            Some(clock) => clock.period_name.clone(),
            None => {
                let active = game_results::get_by_game(pool, game.id)
                    .await?
                    .and_then(|r| r.period_active);
                active
                    .or_else(|| play::first_period(&periods).map(|p| p.name.clone()))
                    .ok_or("Period is required for games without a rule pack")?
            }
        },
    };
    check_period(&period, &periods)?;

    let remaining_time = match params.remaining_time {
        Some(remaining) => remaining,
        None => match &clock {
            Some(clock) if clock.period_name == period => {
                let seconds = clock.remaining_at(Utc::now()).max(0) as u32;
                play::format_clock(seconds)
            }
            _ => return Err("Remaining time is required when the game clock is not on this period".into()),
        },
    };
    let Some(seconds) = play::parse_clock(&remaining_time) else {
        return Err(format!("Invalid remaining time '{remaining_time}', expected MM:SS").into());
    };
    let remaining_time = clamp_remaining(seconds, &period, &periods);
    let game_time = play::remaining_to_game_time(&remaining_time, &period, &periods);

    let mut tx = pool.begin().await?;

    apply_delta(&mut tx, game.id, &period, params.event, params.side, 1).await?;
    let event = game_events::create(
        &mut *tx,
        CreateGameEvent {
            game_id: game.id,
            event_type: params.event.as_str().to_string(),
            side: params.side.as_str().to_string(),
            period,
            remaining_time,
            game_time,
            player_id: params.player_id,
            description: params.description,
            recorded_by: params.recorded_by,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        game_id = %event.game_id,
        event_type = %event.event_type,
        side = %event.side,
        period = %event.period,
        "Game event recorded"
    );

    Ok(event)
}

/// Undo an event's counter and delete it. Returns the game id.
pub async fn delete_event(pool: &PgPool, event_id: Uuid) -> ServiceResult<Uuid> {
    let mut tx = pool.begin().await?;

    // Delete first: only the transaction that removes the row takes its counter back.
    let event = game_events::delete(&mut *tx, event_id)
        .await?
        .ok_or("Game event not found")?;
    let event_type: EventType = event.event_type.parse()?;
    let side: Side = event.side.parse()?;

    apply_delta(&mut tx, event.game_id, &event.period, event_type, side, -1).await?;

    tx.commit().await?;
    Ok(event.game_id)
}

/// Manual correction of one counter, without an event row.
pub async fn adjust_counter(
    pool: &PgPool,
    game_id: Uuid,
    period: &str,
    event: EventType,
    side: Side,
    delta: i32,
) -> ServiceResult<()> {
    if delta == 0 {
        return Err("Delta must not be zero".into());
    }
    let game = load_game(pool, game_id).await?;
    let periods = load_periods(pool, game.rule_pack_id).await?;
    check_period(period, &periods)?;

    let mut tx = pool.begin().await?;
    let value = apply_delta(&mut tx, game_id, period, event, side, delta).await?;
    tx.commit().await?;

    tracing::info!(
        %game_id,
        period,
        counter = play::counter_field(event, side),
        delta,
        value,
        "Game counter adjusted"
    );
    Ok(())
}

/// Replay every stored event into a fresh tally.
pub fn tally_events(events: &[GameEventRow]) -> ServiceResult<GameTally> {
    let mut tally = GameTally::default();
    for event in events {
        let event_type: EventType = event.event_type.parse()?;
        let side: Side = event.side.parse()?;
        tally.apply(&event.period, event_type, side, 1);
    }
    Ok(tally)
}

/// Recompute all counters from the stored events. Manual adjustments are lost.
pub async fn rebuild_result(pool: &PgPool, game_id: Uuid) -> ServiceResult<()> {
    load_game(pool, game_id).await?;

    let mut tx = pool.begin().await?;

    let result = game_results::ensure_locked(&mut *tx, game_id).await?;
    let events = game_events::list_by_game(&mut *tx, game_id, None).await?;
    let tally = tally_events(&events)?;

    game_results::write_counters(&mut *tx, result.id, &tally.total).await?;

    let existing = game_results::list_periods(&mut *tx, result.id).await?;
    for row in &existing {
        let counters = tally
            .period(&row.period)
            .map(|p| p.counters)
            .unwrap_or_default();
        game_results::write_period_counters(&mut *tx, row.id, &counters).await?;
    }
    for period in tally.periods.iter().filter(|p| !existing.iter().any(|r| r.period == p.period)) {
        let row = game_results::ensure_period(&mut *tx, result.id, &period.period).await?;
        game_results::write_period_counters(&mut *tx, row.id, &period.counters).await?;
    }

    tx.commit().await?;

    tracing::info!(%game_id, events = events.len(), "Game result rebuilt");
    Ok(())
}

pub async fn set_status(pool: &PgPool, game_id: Uuid, status: GameStatus) -> ServiceResult<()> {
    load_game(pool, game_id).await?;
    game_results::set_status(pool, game_id, status.as_str()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(event_type: &str, side: &str, period: &str) -> GameEventRow {
        GameEventRow {
            id: Uuid::new_v4(),
            game_id: Uuid::nil(),
            event_type: event_type.to_string(),
            side: side.to_string(),
            period: period.to_string(),
            remaining_time: "10:00".to_string(),
            game_time: "10:00".to_string(),
            player_id: None,
            description: None,
            recorded_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replaying_events_counts_totals_and_periods() {
        let events = vec![
            event("goal", "host", "1"),
            event("shot", "guest", "1"),
            event("goal", "host", "2"),
        ];
        let tally = tally_events(&events).unwrap();

        assert_eq!(tally.total.host_goals, 2);
        assert_eq!(tally.total.guest_shots, 1);
        assert_eq!(tally.period("1").unwrap().counters.host_goals, 1);
        assert_eq!(tally.period("2").unwrap().counters.host_goals, 1);
        assert_eq!(tally.period("2").unwrap().counters.guest_shots, 0);
    }

    #[test]
    fn replay_rejects_corrupt_rows() {
        assert!(tally_events(&[event("goal", "home", "1")]).is_err());
    }

    #[test]
    fn stored_remaining_time_is_capped_at_the_period_length() {
        let periods = vec![PeriodSpec::new("1", 20, 1)];
        assert_eq!(clamp_remaining(25 * 60, "1", &periods), "20:00");
        assert_eq!(clamp_remaining(7 * 60 + 15, "1", &periods), "07:15");
        assert_eq!(clamp_remaining(25 * 60, "OT", &[]), "25:00");
    }

    #[test]
    fn unknown_periods_are_rejected_only_with_a_rule_pack() {
        let periods = vec![PeriodSpec::new("1", 20, 1)];
        assert!(check_period("1", &periods).is_ok());
        assert!(check_period("OT", &periods).is_err());
        assert!(check_period("OT", &[]).is_ok());
    }
}
