//! Live game scoring: clock string conversions and counter bookkeeping.
//!
//! Everything here is pure; persistence lives in the `games` GraphQL domain.

pub mod tally;
pub mod time;

pub use tally::{counter_field, EventType, GameTally, PeriodTally, Side};
pub use time::{
    first_period, format_clock, game_time_to_remaining, next_period, parse_clock,
    period_for_game_time, previous_period, remaining_to_game_time, PeriodSpec, ZERO_CLOCK,
};
