use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub status: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: String,
    pub logo_url: Option<String>,
    pub founded: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub country: Option<String>,
    pub position: Option<String>,
    pub stick: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Player joined with roster data for a single team.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RosterPlayerRow {
    pub team_id: Uuid,
    pub jersey: Option<i32>,
    pub roster_position: Option<String>,
    #[sqlx(flatten)]
    pub player: PlayerRow,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamPlayerRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub jersey: Option<i32>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub short_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SeasonRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VenueRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub nick: Option<String>,
    pub capacity: Option<i32>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RulePackRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PeriodRow {
    pub id: Uuid,
    pub rule_pack_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub duration: i32, // minutes
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameRow {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The sixteen host/guest counters shared by game totals and period breakdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CounterColumns {
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

impl CounterColumns {
    /// Column name and value pairs, in table order.
    pub fn columns(&self) -> [(&'static str, i32); 16] {
        [
            ("host_goals", self.host_goals),
            ("guest_goals", self.guest_goals),
            ("host_shots", self.host_shots),
            ("guest_shots", self.guest_shots),
            ("host_saves", self.host_saves),
            ("guest_saves", self.guest_saves),
            ("host_penalties", self.host_penalties),
            ("guest_penalties", self.guest_penalties),
            ("host_face_offs", self.host_face_offs),
            ("guest_face_offs", self.guest_face_offs),
            ("host_penalty_shots", self.host_penalty_shots),
            ("guest_penalty_shots", self.guest_penalty_shots),
            ("host_injuries", self.host_injuries),
            ("guest_injuries", self.guest_injuries),
            ("host_timeouts", self.host_timeouts),
            ("guest_timeouts", self.guest_timeouts),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameResultRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub game_status: String,
    pub period_active: Option<String>,
    #[sqlx(flatten)]
    pub counters: CounterColumns,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameResultPeriodRow {
    pub id: Uuid,
    pub game_result_id: Uuid,
    pub period: String,
    #[sqlx(flatten)]
    pub counters: CounterColumns,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameEventRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub event_type: String,
    pub side: String,
    pub period: String,
    pub remaining_time: String,
    pub game_time: String,
    pub player_id: Option<Uuid>,
    pub description: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameClockRow {
    pub id: Uuid,
    pub game_id: Uuid,
    pub clock_status: String,
    pub period_name: String,
    pub period_duration_seconds: i32,
    pub period_end_time: Option<DateTime<Utc>>,
    pub pause_started_at: Option<DateTime<Utc>>,
    /// Frozen remaining time; only authoritative while the clock is not running.
    pub remaining_seconds: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrganizationManagerRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}
