/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`.
///
///   - `From<sqlx::Error>` logs the DB detail and shows a sanitized message to clients
///   - `From<uuid::Error>` shows "Invalid ID: ..."
///   - `GqlError::new("...")` for one-off messages
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Uuid(uuid::Error),
    Custom(String),
}

impl GqlError {
    pub fn new(msg: impl Into<String>) -> Self {
        GqlError::Custom(msg.into())
    }

    pub fn not_found(entity: &str) -> Self {
        GqlError::Custom(format!("{entity} not found"))
    }

    /// Unique and check constraint violations become `message`; anything else stays a DB error.
    pub fn conflict(e: sqlx::Error, message: &str) -> Self {
        let violated = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation() || db.is_check_violation());
        if violated {
            GqlError::Custom(message.to_string())
        } else {
            GqlError::Sqlx(e)
        }
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) => {
                // Log the real error server-side; return a generic message to clients
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Uuid(e) => write!(f, "Invalid ID: {e}"),
            GqlError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<uuid::Error> for GqlError {
    fn from(e: uuid::Error) -> Self {
        GqlError::Uuid(e)
    }
}

/// Maps a service error; database failures stay sanitized.
impl From<Box<dyn std::error::Error + Send + Sync>> for GqlError {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match e.downcast::<sqlx::Error>() {
            Ok(db) => GqlError::Sqlx(*db),
            Err(other) => GqlError::Custom(other.to_string()),
        }
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid game ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_keep_their_message() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "Game not found".into();
        assert_eq!(GqlError::from(boxed).to_string(), "Game not found");
    }

    #[test]
    fn database_errors_are_sanitized() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(sqlx::Error::RowNotFound);
        assert_eq!(GqlError::from(boxed).to_string(), "Internal database error");
    }

    #[test]
    fn gql_err_prefixes_context() {
        let err = "x".parse::<i32>().gql_err("Invalid jersey").unwrap_err();
        assert!(err.message.starts_with("Invalid jersey: "));
    }
}
