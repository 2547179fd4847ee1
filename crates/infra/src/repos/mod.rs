pub mod competitions;
pub mod game_clock;
pub mod game_events;
pub mod game_results;
pub mod games;
pub mod organization_managers;
pub mod organizations;
pub mod players;
pub mod rule_packs;
pub mod seasons;
pub mod teams;
pub mod users;
pub mod venues;

pub use game_clock::{ClockStatus, GameClockRepo};
pub use game_events::CreateGameEvent;
pub use games::GameFilter;
pub use users::{CreateUserData, UpdateUserData, UserFilter};
