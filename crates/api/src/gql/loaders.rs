use async_graphql::dataloader::Loader;
use infra::db::Db;
use infra::models::{OrganizationRow, PlayerRow, TeamRow};
use infra::repos::{organizations, players, teams};
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationLoader {
    pool: Db,
}

impl OrganizationLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for OrganizationLoader {
    type Value = OrganizationRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = organizations::list_by_ids(&pool, &ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// TeamLoader - host/guest teams of game listings
#[derive(Clone)]
pub struct TeamLoader {
    pool: Db,
}

impl TeamLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for TeamLoader {
    type Value = TeamRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = teams::list_by_ids(&pool, &ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// PlayerLoader - players referenced by game events
#[derive(Clone)]
pub struct PlayerLoader {
    pool: Db,
}

impl PlayerLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for PlayerLoader {
    type Value = PlayerRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = players::list_by_ids(&pool, &ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}
