use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService};
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    auth_config: AuthConfig,
    jwt_service: JwtService,
    storage: Option<StorageConfig>,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        if storage.is_none() {
            tracing::warn!("STORAGE_BUCKET not set, upload URLs are disabled");
        }

        Ok(Self::with_config(db, auth_config, storage))
    }

    pub fn with_config(db: PgPool, auth_config: AuthConfig, storage: Option<StorageConfig>) -> Self {
        let jwt_service = JwtService::new(&auth_config);

        Self {
            db,
            auth_config,
            jwt_service,
            storage,
        }
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn storage(&self) -> Option<&StorageConfig> {
        self.storage.as_ref()
    }
}
