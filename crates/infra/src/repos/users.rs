use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{filter::escape_like, models::UserRow, pagination::LimitOffset};

const COLUMNS: &str = "id, email, name, password_hash, role, is_active, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserData {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

fn filtered(select: &str, filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{select} FROM users WHERE 1=1"));

    if let Some(search) = &filter.search {
        let search_pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        query.push(" AND (LOWER(email) LIKE ");
        query.push_bind(search_pattern.clone());
        query.push(r" ESCAPE '\' OR LOWER(name) LIKE ");
        query.push_bind(search_pattern);
        query.push(r" ESCAPE '\')");
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }

    query
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &UserFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<UserRow>> {
    let mut query = filtered(&format!("SELECT {COLUMNS}"), filter);
    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<UserRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &UserFilter) -> SqlxResult<i64> {
    let mut query = filtered("SELECT COUNT(*)", filter);
    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
    ))
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUserData) -> SqlxResult<UserRow> {
    sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (email, name, password_hash, role, is_active)
        VALUES (LOWER($1), $2, $3, $4, true)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.email)
    .bind(data.name)
    .bind(data.password_hash)
    .bind(data.role)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateUserData,
) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            role = COALESCE($3, role),
            is_active = COALESCE($4, is_active),
            password_hash = COALESCE($5, password_hash),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.name)
    .bind(data.role)
    .bind(data.is_active)
    .bind(data.password_hash)
    .fetch_optional(executor)
    .await
}
