// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod auth;
pub mod competitions;
pub mod games;
pub mod organizations;
pub mod players;
pub mod rule_packs;
pub mod seasons;
pub mod teams;
pub mod uploads;
pub mod users;
pub mod venues;
