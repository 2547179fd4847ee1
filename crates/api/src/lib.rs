pub mod app;
pub mod auth;
pub mod error;
pub mod gql;
pub mod middleware;
pub mod play;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use state::AppState;
