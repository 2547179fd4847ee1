pub mod clock_service;

pub use clock_service::{spawn_clock_service, ClockService};
