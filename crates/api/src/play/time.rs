/// Zero sentinel returned for malformed clock strings and unknown periods.
pub const ZERO_CLOCK: &str = "00:00";

/// A configured segment of game time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSpec {
    pub name: String,
    pub duration_minutes: u32,
    pub priority: i32,
}

impl PeriodSpec {
    pub fn new(name: impl Into<String>, duration_minutes: u32, priority: i32) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            priority,
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

impl From<&infra::models::PeriodRow> for PeriodSpec {
    fn from(row: &infra::models::PeriodRow) -> Self {
        Self {
            name: row.name.clone(),
            duration_minutes: u32::try_from(row.duration).unwrap_or(0),
            priority: row.priority,
        }
    }
}

/// Parse `MM:SS` into whole seconds.
///
/// Minutes are one or more digits and may exceed 59 (game time runs past an
/// hour); seconds are exactly two digits below 60.
pub fn parse_clock(value: &str) -> Option<u32> {
    let (minutes, seconds) = value.split_once(':')?;

    if minutes.is_empty() || minutes.len() > 4 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if seconds.len() != 2 || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }

    Some(minutes * 60 + seconds)
}

pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Periods ordered by priority.
pub fn ordered(periods: &[PeriodSpec]) -> Vec<&PeriodSpec> {
    let mut sorted: Vec<&PeriodSpec> = periods.iter().collect();
    sorted.sort_by_key(|p| p.priority);
    sorted
}

fn find<'a>(periods: &'a [PeriodSpec], name: &str) -> Option<&'a PeriodSpec> {
    periods.iter().find(|p| p.name == name)
}

/// Seconds played in every period that precedes `period`.
pub fn elapsed_before(periods: &[PeriodSpec], period: &PeriodSpec) -> u32 {
    periods
        .iter()
        .filter(|p| p.priority < period.priority)
        .map(PeriodSpec::duration_seconds)
        .fold(0, u32::saturating_add)
}

/// Convert the clock shown during `period` (time left) into elapsed game time.
pub fn remaining_to_game_time(remaining: &str, period: &str, periods: &[PeriodSpec]) -> String {
    let (Some(remaining), Some(current)) = (parse_clock(remaining), find(periods, period)) else {
        return ZERO_CLOCK.to_string();
    };

    let duration = current.duration_seconds();
    let played = duration - remaining.min(duration);
    format_clock(elapsed_before(periods, current).saturating_add(played))
}

/// Inverse of [`remaining_to_game_time`] for the same period.
pub fn game_time_to_remaining(game_time: &str, period: &str, periods: &[PeriodSpec]) -> String {
    let (Some(game_time), Some(current)) = (parse_clock(game_time), find(periods, period)) else {
        return ZERO_CLOCK.to_string();
    };

    let duration = current.duration_seconds();
    let played = game_time
        .saturating_sub(elapsed_before(periods, current))
        .min(duration);
    format_clock(duration - played)
}

/// The period in which `game_time` falls. A boundary belongs to the period it
/// ends; times past the last period map to the last period.
pub fn period_for_game_time<'a>(
    game_time: &str,
    periods: &'a [PeriodSpec],
) -> Option<&'a PeriodSpec> {
    let game_time = parse_clock(game_time)?;
    let sorted = ordered(periods);

    let mut end: u32 = 0;
    for period in sorted.iter().copied() {
        end = end.saturating_add(period.duration_seconds());
        if game_time <= end {
            return Some(period);
        }
    }
    sorted.last().copied()
}

pub fn first_period(periods: &[PeriodSpec]) -> Option<&PeriodSpec> {
    periods.iter().min_by_key(|p| p.priority)
}

pub fn next_period<'a>(periods: &'a [PeriodSpec], current: &str) -> Option<&'a PeriodSpec> {
    let current = find(periods, current)?;
    periods
        .iter()
        .filter(|p| p.priority > current.priority)
        .min_by_key(|p| p.priority)
}

pub fn previous_period<'a>(periods: &'a [PeriodSpec], current: &str) -> Option<&'a PeriodSpec> {
    let current = find(periods, current)?;
    periods
        .iter()
        .filter(|p| p.priority < current.priority)
        .max_by_key(|p| p.priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hockey() -> Vec<PeriodSpec> {
        vec![
            PeriodSpec::new("1", 20, 1),
            PeriodSpec::new("2", 20, 2),
            PeriodSpec::new("3", 20, 3),
        ]
    }

    #[test]
    fn remaining_in_second_period_converts_to_game_time() {
        assert_eq!(remaining_to_game_time("05:00", "2", &hockey()), "35:00");
    }

    #[test]
    fn game_time_converts_back_to_remaining() {
        assert_eq!(game_time_to_remaining("35:00", "2", &hockey()), "05:00");
    }

    #[test]
    fn conversion_handles_seconds() {
        let periods = hockey();
        assert_eq!(remaining_to_game_time("05:30", "2", &periods), "34:30");
        assert_eq!(remaining_to_game_time("19:59", "1", &periods), "00:01");
        assert_eq!(game_time_to_remaining("34:30", "2", &periods), "05:30");
    }

    #[test]
    fn round_trip_is_exact_for_every_second_of_a_period() {
        let periods = hockey();
        for remaining in 0..=1200 {
            let shown = format_clock(remaining);
            let game = remaining_to_game_time(&shown, "3", &periods);
            assert_eq!(game_time_to_remaining(&game, "3", &periods), shown);
        }
    }

    #[test]
    fn period_order_follows_priority_not_position() {
        let periods = vec![
            PeriodSpec::new("OT", 5, 4),
            PeriodSpec::new("3", 20, 3),
            PeriodSpec::new("1", 20, 1),
            PeriodSpec::new("2", 20, 2),
        ];
        assert_eq!(remaining_to_game_time("02:00", "OT", &periods), "63:00");
        assert_eq!(next_period(&periods, "3").map(|p| p.name.as_str()), Some("OT"));
        assert_eq!(previous_period(&periods, "2").map(|p| p.name.as_str()), Some("1"));
        assert_eq!(first_period(&periods).map(|p| p.name.as_str()), Some("1"));
        assert!(next_period(&periods, "OT").is_none());
        assert!(previous_period(&periods, "1").is_none());
    }

    #[test]
    fn malformed_strings_yield_zero_sentinel() {
        let periods = hockey();
        for bad in ["", "5:0", "aa:bb", "10:60", "10", "10:5", "-1:00", "10:00:00", " 05:00"] {
            assert_eq!(remaining_to_game_time(bad, "1", &periods), ZERO_CLOCK, "{bad:?}");
            assert_eq!(game_time_to_remaining(bad, "1", &periods), ZERO_CLOCK, "{bad:?}");
        }
    }

    #[test]
    fn unknown_period_yields_zero_sentinel() {
        assert_eq!(remaining_to_game_time("05:00", "4", &hockey()), ZERO_CLOCK);
        assert_eq!(game_time_to_remaining("05:00", "4", &hockey()), ZERO_CLOCK);
    }

    #[test]
    fn out_of_range_values_are_clamped_to_the_period() {
        let periods = hockey();
        assert_eq!(remaining_to_game_time("25:00", "2", &periods), "20:00");
        assert_eq!(game_time_to_remaining("10:00", "2", &periods), "20:00");
        assert_eq!(game_time_to_remaining("55:00", "2", &periods), "00:00");
    }

    #[test]
    fn huge_durations_saturate_instead_of_overflowing() {
        let periods = vec![PeriodSpec::new("1", 80_000_000, 1), PeriodSpec::new("2", 20, 2)];
        assert_eq!(periods[0].duration_seconds(), u32::MAX);

        assert_eq!(
            remaining_to_game_time("05:00", "2", &periods),
            format_clock(u32::MAX)
        );
        assert_eq!(
            period_for_game_time("99:00", &periods).map(|p| p.name.as_str()),
            Some("1")
        );
    }

    #[test]
    fn parse_accepts_long_minutes() {
        assert_eq!(parse_clock("125:07"), Some(125 * 60 + 7));
        assert_eq!(parse_clock("0:00"), Some(0));
        assert_eq!(format_clock(125 * 60 + 7), "125:07");
        assert_eq!(format_clock(7), "00:07");
    }

    #[test]
    fn locates_period_for_game_time() {
        let periods = hockey();
        let name = |t: &str| period_for_game_time(t, &periods).map(|p| p.name.clone());
        assert_eq!(name("00:00").as_deref(), Some("1"));
        assert_eq!(name("20:00").as_deref(), Some("1"));
        assert_eq!(name("20:01").as_deref(), Some("2"));
        assert_eq!(name("59:59").as_deref(), Some("3"));
        assert_eq!(name("75:00").as_deref(), Some("3"));
        assert_eq!(name("xx"), None);
        assert!(period_for_game_time("10:00", &[]).is_none());
    }
}
