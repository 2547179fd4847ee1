use sqlx::PgPool;

/// Shared connection pool handed to every repository.
pub type Db = PgPool;
