pub mod clock;
pub mod resolvers;
pub mod service;
pub mod types;

pub use clock::{GameClockMutation, GameClockQuery};
pub use resolvers::{GameMutation, GameQuery};
