use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use crate::gql::domains::competitions::types::Competition;
use crate::gql::domains::organizations::types::Organization;
use crate::gql::domains::players::types::Player;
use crate::gql::domains::rule_packs::types::RulePack;
use crate::gql::domains::seasons::types::Season;
use crate::gql::domains::teams::types::Team;
use crate::gql::domains::venues::types::Venue;
use crate::gql::error::GqlError;
use crate::gql::loaders::{OrganizationLoader, PlayerLoader, TeamLoader};
use crate::play::{self, EventType, PeriodSpec, Side};
use crate::state::AppState;
use infra::models::{CounterColumns, GameClockRow, GameEventRow, GameResultPeriodRow, GameResultRow};
use infra::repos::ClockStatus;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameStatus {
    #[graphql(name = "NOT_STARTED")]
    NotStarted,
    #[graphql(name = "RUNNING")]
    Running,
    #[graphql(name = "PAUSED")]
    Paused,
    #[graphql(name = "INTERMISSION")]
    Intermission,
    #[graphql(name = "FINISHED")]
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::NotStarted => "not_started",
            GameStatus::Running => "running",
            GameStatus::Paused => "paused",
            GameStatus::Intermission => "intermission",
            GameStatus::Finished => "finished",
        }
    }
}

impl From<&str> for GameStatus {
    fn from(status: &str) -> Self {
        match status {
            "running" => GameStatus::Running,
            "paused" => GameStatus::Paused,
            "intermission" => GameStatus::Intermission,
            "finished" => GameStatus::Finished,
            _ => GameStatus::NotStarted,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameEventType {
    #[graphql(name = "GOAL")]
    Goal,
    #[graphql(name = "SHOT")]
    Shot,
    #[graphql(name = "SAVE")]
    Save,
    #[graphql(name = "PENALTY")]
    Penalty,
    #[graphql(name = "FACE_OFF")]
    FaceOff,
    #[graphql(name = "PENALTY_SHOT")]
    PenaltyShot,
    #[graphql(name = "INJURY")]
    Injury,
    #[graphql(name = "TIMEOUT")]
    Timeout,
}

impl From<GameEventType> for EventType {
    fn from(kind: GameEventType) -> Self {
        match kind {
            GameEventType::Goal => EventType::Goal,
            GameEventType::Shot => EventType::Shot,
            GameEventType::Save => EventType::Save,
            GameEventType::Penalty => EventType::Penalty,
            GameEventType::FaceOff => EventType::FaceOff,
            GameEventType::PenaltyShot => EventType::PenaltyShot,
            GameEventType::Injury => EventType::Injury,
            GameEventType::Timeout => EventType::Timeout,
        }
    }
}

impl From<EventType> for GameEventType {
    fn from(event: EventType) -> Self {
        match event {
            EventType::Goal => GameEventType::Goal,
            EventType::Shot => GameEventType::Shot,
            EventType::Save => GameEventType::Save,
            EventType::Penalty => GameEventType::Penalty,
            EventType::FaceOff => GameEventType::FaceOff,
            EventType::PenaltyShot => GameEventType::PenaltyShot,
            EventType::Injury => GameEventType::Injury,
            EventType::Timeout => GameEventType::Timeout,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameSide {
    #[graphql(name = "HOST")]
    Host,
    #[graphql(name = "GUEST")]
    Guest,
}

impl From<GameSide> for Side {
    fn from(side: GameSide) -> Self {
        match side {
            GameSide::Host => Side::Host,
            GameSide::Guest => Side::Guest,
        }
    }
}

impl From<Side> for GameSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Host => GameSide::Host,
            Side::Guest => GameSide::Guest,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameClockStatus {
    #[graphql(name = "STOPPED")]
    Stopped,
    #[graphql(name = "RUNNING")]
    Running,
    #[graphql(name = "PAUSED")]
    Paused,
}

impl From<ClockStatus> for GameClockStatus {
    fn from(status: ClockStatus) -> Self {
        match status {
            ClockStatus::Stopped => GameClockStatus::Stopped,
            ClockStatus::Running => GameClockStatus::Running,
            ClockStatus::Paused => GameClockStatus::Paused,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Game {
    pub id: ID,
    pub organization_id: ID,
    pub name: String,
    pub info: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub competition_id: Option<ID>,
    pub season_id: Option<ID>,
    pub venue_id: Option<ID>,
    pub rule_pack_id: Option<ID>,
    pub host_team_id: ID,
    pub guest_team_id: ID,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::GameRow> for Game {
    fn from(row: infra::models::GameRow) -> Self {
        Self {
            id: row.id.into(),
            organization_id: row.organization_id.into(),
            name: row.name,
            info: row.info,
            start_date: row.start_date,
            start_time: row.start_time,
            competition_id: row.competition_id.map(Into::into),
            season_id: row.season_id.map(Into::into),
            venue_id: row.venue_id.map(Into::into),
            rule_pack_id: row.rule_pack_id.map(Into::into),
            host_team_id: row.host_team_id.into(),
            guest_team_id: row.guest_team_id.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn optional_uuid(id: &Option<ID>) -> Result<Option<Uuid>> {
    Ok(id.as_ref().map(|id| Uuid::parse_str(id.as_str())).transpose()?)
}

#[ComplexObject]
impl Game {
    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<Organization>> {
        let loader = ctx.data::<DataLoader<OrganizationLoader>>()?;
        let organization_id = Uuid::parse_str(self.organization_id.as_str())?;
        Ok(loader.load_one(organization_id).await?.map(Organization::from))
    }

    async fn host_team(&self, ctx: &Context<'_>) -> Result<Option<Team>> {
        let loader = ctx.data::<DataLoader<TeamLoader>>()?;
        let team_id = Uuid::parse_str(self.host_team_id.as_str())?;
        Ok(loader.load_one(team_id).await?.map(Team::from))
    }

    async fn guest_team(&self, ctx: &Context<'_>) -> Result<Option<Team>> {
        let loader = ctx.data::<DataLoader<TeamLoader>>()?;
        let team_id = Uuid::parse_str(self.guest_team_id.as_str())?;
        Ok(loader.load_one(team_id).await?.map(Team::from))
    }

    async fn competition(&self, ctx: &Context<'_>) -> Result<Option<Competition>> {
        let Some(id) = optional_uuid(&self.competition_id)? else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let row = infra::repos::competitions::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Competition::from))
    }

    async fn season(&self, ctx: &Context<'_>) -> Result<Option<Season>> {
        let Some(id) = optional_uuid(&self.season_id)? else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let row = infra::repos::seasons::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Season::from))
    }

    async fn venue(&self, ctx: &Context<'_>) -> Result<Option<Venue>> {
        let Some(id) = optional_uuid(&self.venue_id)? else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let row = infra::repos::venues::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Venue::from))
    }

    async fn rule_pack(&self, ctx: &Context<'_>) -> Result<Option<RulePack>> {
        let Some(id) = optional_uuid(&self.rule_pack_id)? else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let row = infra::repos::rule_packs::get_by_id(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(RulePack::from))
    }

    /// Running tally; zeroed until the first event is recorded
    async fn result(&self, ctx: &Context<'_>) -> Result<GameResult> {
        let state = ctx.data::<AppState>()?;
        let game_id = Uuid::parse_str(self.id.as_str())?;
        Ok(super::service::load_result(&state.db, game_id)
            .await
            .map_err(GqlError::from)?)
    }

    async fn events(&self, ctx: &Context<'_>, period: Option<String>) -> Result<Vec<GameEvent>> {
        let state = ctx.data::<AppState>()?;
        let game_id = Uuid::parse_str(self.id.as_str())?;
        let rows = infra::repos::game_events::list_by_game(&state.db, game_id, period.as_deref())
            .await
            .map_err(GqlError::from)?;
        GameEvent::from_rows(rows)
    }

    async fn clock(&self, ctx: &Context<'_>) -> Result<Option<GameClock>> {
        let state = ctx.data::<AppState>()?;
        let game_id = Uuid::parse_str(self.id.as_str())?;
        Ok(super::service::load_clock(&state.db, game_id)
            .await
            .map_err(GqlError::from)?)
    }
}

/// Host and guest counters for a whole game or for one period.
#[derive(SimpleObject, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GameCounters {
    pub host_goals: i32,
    pub guest_goals: i32,
    pub host_shots: i32,
    pub guest_shots: i32,
    pub host_saves: i32,
    pub guest_saves: i32,
    pub host_penalties: i32,
    pub guest_penalties: i32,
    pub host_face_offs: i32,
    pub guest_face_offs: i32,
    pub host_penalty_shots: i32,
    pub guest_penalty_shots: i32,
    pub host_injuries: i32,
    pub guest_injuries: i32,
    pub host_timeouts: i32,
    pub guest_timeouts: i32,
}

impl From<CounterColumns> for GameCounters {
    fn from(c: CounterColumns) -> Self {
        Self {
            host_goals: c.host_goals,
            guest_goals: c.guest_goals,
            host_shots: c.host_shots,
            guest_shots: c.guest_shots,
            host_saves: c.host_saves,
            guest_saves: c.guest_saves,
            host_penalties: c.host_penalties,
            guest_penalties: c.guest_penalties,
            host_face_offs: c.host_face_offs,
            guest_face_offs: c.guest_face_offs,
            host_penalty_shots: c.host_penalty_shots,
            guest_penalty_shots: c.guest_penalty_shots,
            host_injuries: c.host_injuries,
            guest_injuries: c.guest_injuries,
            host_timeouts: c.host_timeouts,
            guest_timeouts: c.guest_timeouts,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct GameResultPeriod {
    pub period: String,
    pub counters: GameCounters,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct GameResult {
    pub game_id: ID,
    pub status: GameStatus,
    pub period_active: Option<String>,
    pub totals: GameCounters,
    pub periods: Vec<GameResultPeriod>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameResult {
    /// Result of a game that has no recorded activity yet.
    pub fn empty(game_id: Uuid) -> Self {
        Self {
            game_id: game_id.into(),
            status: GameStatus::NotStarted,
            period_active: None,
            totals: GameCounters::default(),
            periods: Vec::new(),
            updated_at: None,
        }
    }

    pub fn from_rows(row: GameResultRow, periods: Vec<GameResultPeriodRow>) -> Self {
        Self {
            game_id: row.game_id.into(),
            status: GameStatus::from(row.game_status.as_str()),
            period_active: row.period_active,
            totals: row.counters.into(),
            periods: periods
                .into_iter()
                .map(|p| GameResultPeriod {
                    period: p.period,
                    counters: p.counters.into(),
                })
                .collect(),
            updated_at: Some(row.updated_at),
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct GameEvent {
    pub id: ID,
    pub game_id: ID,
    pub event_type: GameEventType,
    pub side: GameSide,
    pub period: String,
    /// Period clock when the event happened, `MM:SS`
    pub remaining_time: String,
    /// Elapsed game time, `MM:SS`
    pub game_time: String,
    pub player_id: Option<ID>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GameEventRow> for GameEvent {
    type Error = String;

    fn try_from(row: GameEventRow) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            game_id: row.game_id.into(),
            event_type: EventType::from_str(&row.event_type)?.into(),
            side: Side::from_str(&row.side)?.into(),
            period: row.period,
            remaining_time: row.remaining_time,
            game_time: row.game_time,
            player_id: row.player_id.map(Into::into),
            description: row.description,
            created_at: row.created_at,
        })
    }
}

impl GameEvent {
    pub fn from_rows(rows: Vec<GameEventRow>) -> Result<Vec<Self>> {
        rows.into_iter()
            .map(|row| GameEvent::try_from(row).map_err(|e| GqlError::new(e).into()))
            .collect()
    }
}

#[ComplexObject]
impl GameEvent {
    async fn player(&self, ctx: &Context<'_>) -> Result<Option<Player>> {
        let Some(id) = optional_uuid(&self.player_id)? else {
            return Ok(None);
        };
        let loader = ctx.data::<DataLoader<PlayerLoader>>()?;
        Ok(loader.load_one(id).await?.map(Player::from))
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct GameClock {
    pub game_id: ID,
    pub status: GameClockStatus,
    pub period: String,
    pub period_duration_seconds: i32,
    pub remaining_seconds: i32,
    /// Time left in the period, `MM:SS`
    pub remaining: String,
    /// Elapsed game time across all periods, `MM:SS`
    pub game_time: String,
    pub period_end_time: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl GameClock {
    pub fn build(row: &GameClockRow, periods: &[PeriodSpec], now: DateTime<Utc>) -> Self {
        let remaining_seconds = row.remaining_at(now).clamp(0, i64::from(i32::MAX)) as i32;
        let remaining = play::format_clock(remaining_seconds as u32);
        let game_time = play::remaining_to_game_time(&remaining, &row.period_name, periods);

        Self {
            game_id: row.game_id.into(),
            status: row.status().into(),
            period: row.period_name.clone(),
            period_duration_seconds: row.period_duration_seconds,
            remaining_seconds,
            remaining,
            game_time,
            period_end_time: row.period_end_time,
            updated_at: row.updated_at,
        }
    }
}

#[derive(InputObject)]
pub struct CreateGameInput {
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

#[derive(InputObject)]
pub struct UpdateGameInput {
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

#[derive(InputObject)]
pub struct RecordGameEventInput {
    pub game_id: Uuid,
    pub event_type: GameEventType,
    pub side: GameSide,
    /// Defaults to the clock's period, then the result's active period
    pub period: Option<String>,
    /// `MM:SS` left in the period; defaults to the running clock
    pub remaining_time: Option<String>,
    pub player_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct AdjustGameCounterInput {
    pub game_id: Uuid,
    pub period: String,
    pub event_type: GameEventType,
    pub side: GameSide,
    /// Usually +1 or -1; counters never drop below zero
    pub delta: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn clock_row(status: &str, remaining_seconds: i32, end: Option<DateTime<Utc>>) -> GameClockRow {
        let now = Utc::now();
        GameClockRow {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            clock_status: status.to_string(),
            period_name: "2".to_string(),
            period_duration_seconds: 1200,
            period_end_time: end,
            pause_started_at: None,
            remaining_seconds,
            created_at: now,
            updated_at: now,
        }
    }

    fn periods() -> Vec<PeriodSpec> {
        vec![
            PeriodSpec::new("1", 20, 1),
            PeriodSpec::new("2", 20, 2),
            PeriodSpec::new("3", 20, 3),
        ]
    }

    #[test]
    fn paused_clock_reports_frozen_time() {
        let clock = GameClock::build(&clock_row("paused", 300, None), &periods(), Utc::now());
        assert_eq!(clock.status, GameClockStatus::Paused);
        assert_eq!(clock.remaining, "05:00");
        assert_eq!(clock.game_time, "35:00");
    }

    #[test]
    fn running_clock_counts_down_from_end_time() {
        let now = Utc::now();
        let row = clock_row("running", 1200, Some(now + Duration::seconds(90)));
        let clock = GameClock::build(&row, &periods(), now);
        assert_eq!(clock.remaining_seconds, 90);
        assert_eq!(clock.remaining, "01:30");
        assert_eq!(clock.game_time, "38:30");
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            GameStatus::NotStarted,
            GameStatus::Running,
            GameStatus::Paused,
            GameStatus::Intermission,
            GameStatus::Finished,
        ] {
            assert_eq!(GameStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn event_rows_with_unknown_types_are_rejected() {
        let now = Utc::now();
        let row = GameEventRow {
            id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            event_type: "touchdown".to_string(),
            side: "host".to_string(),
            period: "1".to_string(),
            remaining_time: "10:00".to_string(),
            game_time: "10:00".to_string(),
            player_id: None,
            description: None,
            recorded_by: None,
            created_at: now,
        };
        assert!(GameEvent::try_from(row).is_err());
    }
}
