pub mod config;
pub mod presign;

pub use config::StorageConfig;
pub use presign::{object_key, presign_url, PresignRequest};
