use std::fmt;
use std::str::FromStr;

use infra::models::CounterColumns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Goal,
    Shot,
    Save,
    Penalty,
    FaceOff,
    PenaltyShot,
    Injury,
    Timeout,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Goal,
        EventType::Shot,
        EventType::Save,
        EventType::Penalty,
        EventType::FaceOff,
        EventType::PenaltyShot,
        EventType::Injury,
        EventType::Timeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Goal => "goal",
            EventType::Shot => "shot",
            EventType::Save => "save",
            EventType::Penalty => "penalty",
            EventType::FaceOff => "face_off",
            EventType::PenaltyShot => "penalty_shot",
            EventType::Injury => "injury",
            EventType::Timeout => "timeout",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Unknown event type: {}", s))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Host,
    Guest,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Host => "host",
            Side::Guest => "guest",
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(Side::Host),
            "guest" => Ok(Side::Guest),
            _ => Err(format!("Unknown side: {}", s)),
        }
    }
}

/// Column that counts `event` for `side`, e.g. `host_goals`.
pub fn counter_field(event: EventType, side: Side) -> &'static str {
    match (event, side) {
        (EventType::Goal, Side::Host) => "host_goals",
        (EventType::Goal, Side::Guest) => "guest_goals",
        (EventType::Shot, Side::Host) => "host_shots",
        (EventType::Shot, Side::Guest) => "guest_shots",
        (EventType::Save, Side::Host) => "host_saves",
        (EventType::Save, Side::Guest) => "guest_saves",
        (EventType::Penalty, Side::Host) => "host_penalties",
        (EventType::Penalty, Side::Guest) => "guest_penalties",
        (EventType::FaceOff, Side::Host) => "host_face_offs",
        (EventType::FaceOff, Side::Guest) => "guest_face_offs",
        (EventType::PenaltyShot, Side::Host) => "host_penalty_shots",
        (EventType::PenaltyShot, Side::Guest) => "guest_penalty_shots",
        (EventType::Injury, Side::Host) => "host_injuries",
        (EventType::Injury, Side::Guest) => "guest_injuries",
        (EventType::Timeout, Side::Host) => "host_timeouts",
        (EventType::Timeout, Side::Guest) => "guest_timeouts",
    }
}

fn counter_mut(counters: &mut CounterColumns, event: EventType, side: Side) -> &mut i32 {
    match (event, side) {
        (EventType::Goal, Side::Host) => &mut counters.host_goals,
        (EventType::Goal, Side::Guest) => &mut counters.guest_goals,
        (EventType::Shot, Side::Host) => &mut counters.host_shots,
        (EventType::Shot, Side::Guest) => &mut counters.guest_shots,
        (EventType::Save, Side::Host) => &mut counters.host_saves,
        (EventType::Save, Side::Guest) => &mut counters.guest_saves,
        (EventType::Penalty, Side::Host) => &mut counters.host_penalties,
        (EventType::Penalty, Side::Guest) => &mut counters.guest_penalties,
        (EventType::FaceOff, Side::Host) => &mut counters.host_face_offs,
        (EventType::FaceOff, Side::Guest) => &mut counters.guest_face_offs,
        (EventType::PenaltyShot, Side::Host) => &mut counters.host_penalty_shots,
        (EventType::PenaltyShot, Side::Guest) => &mut counters.guest_penalty_shots,
        (EventType::Injury, Side::Host) => &mut counters.host_injuries,
        (EventType::Injury, Side::Guest) => &mut counters.guest_injuries,
        (EventType::Timeout, Side::Host) => &mut counters.host_timeouts,
        (EventType::Timeout, Side::Guest) => &mut counters.guest_timeouts,
    }
}

pub fn get(counters: &CounterColumns, event: EventType, side: Side) -> i32 {
    let mut copy = *counters;
    *counter_mut(&mut copy, event, side)
}

/// Add `delta` to one counter; counters never go below zero. Returns the new value.
pub fn apply(counters: &mut CounterColumns, event: EventType, side: Side, delta: i32) -> i32 {
    let slot = counter_mut(counters, event, side);
    *slot = slot.saturating_add(delta).max(0);
    *slot
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodTally {
    pub period: String,
    pub counters: CounterColumns,
}

/// Running game total plus a per-period breakdown, in order of first use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTally {
    pub total: CounterColumns,
    pub periods: Vec<PeriodTally>,
}

impl GameTally {
    pub fn period(&self, period: &str) -> Option<&PeriodTally> {
        self.periods.iter().find(|p| p.period == period)
    }

    fn period_mut(&mut self, period: &str) -> &mut PeriodTally {
        let index = match self.periods.iter().position(|p| p.period == period) {
            Some(index) => index,
            None => {
                self.periods.push(PeriodTally {
                    period: period.to_string(),
                    counters: CounterColumns::default(),
                });
                self.periods.len() - 1
            }
        };
        &mut self.periods[index]
    }

    /// Update both the game total and the period breakdown.
    pub fn apply(&mut self, period: &str, event: EventType, side: Side, delta: i32) {
        apply(&mut self.total, event, side, delta);
        apply(&mut self.period_mut(period).counters, event, side, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_field_per_event_and_side() {
        assert_eq!(counter_field(EventType::Goal, Side::Host), "host_goals");
        assert_eq!(counter_field(EventType::Save, Side::Guest), "guest_saves");
        assert_eq!(
            counter_field(EventType::PenaltyShot, Side::Guest),
            "guest_penalty_shots"
        );
    }

    #[test]
    fn counter_field_matches_column_layout() {
        let mut counters = CounterColumns::default();
        for event in EventType::ALL {
            for side in [Side::Host, Side::Guest] {
                apply(&mut counters, event, side, 1);
                let column = counter_field(event, side);
                let (_, value) = counters
                    .columns()
                    .into_iter()
                    .find(|(name, _)| *name == column)
                    .expect("column exists");
                assert_eq!(value, get(&counters, event, side));
            }
        }
        assert!(counters.columns().iter().all(|(_, v)| *v == 1));
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let mut counters = CounterColumns::default();
        assert_eq!(apply(&mut counters, EventType::Goal, Side::Host, -1), 0);
        assert_eq!(apply(&mut counters, EventType::Goal, Side::Host, 1), 1);
        assert_eq!(apply(&mut counters, EventType::Goal, Side::Host, -5), 0);
    }

    #[test]
    fn first_event_in_a_period_creates_its_breakdown() {
        let mut tally = GameTally::default();
        assert!(tally.period("1").is_none());

        tally.apply("1", EventType::Goal, Side::Guest, 1);
        tally.apply("2", EventType::Goal, Side::Guest, 1);
        tally.apply("1", EventType::Penalty, Side::Host, 1);

        assert_eq!(tally.total.guest_goals, 2);
        assert_eq!(tally.total.host_penalties, 1);
        assert_eq!(tally.periods.len(), 2);
        assert_eq!(tally.period("1").map(|p| p.counters.guest_goals), Some(1));
        assert_eq!(tally.period("2").map(|p| p.counters.host_penalties), Some(0));
    }

    #[test]
    fn undo_restores_previous_state() {
        let mut tally = GameTally::default();
        tally.apply("1", EventType::Shot, Side::Host, 1);
        let before = tally.clone();

        tally.apply("1", EventType::Goal, Side::Host, 1);
        tally.apply("1", EventType::Goal, Side::Host, -1);

        assert_eq!(tally, before);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("face_off".parse::<EventType>(), Ok(EventType::FaceOff));
        assert_eq!("guest".parse::<Side>(), Ok(Side::Guest));
        assert!("touchdown".parse::<EventType>().is_err());
        assert!("home".parse::<Side>().is_err());
    }
}
