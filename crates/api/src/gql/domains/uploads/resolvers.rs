use async_graphql::{Context, Object, Result};
use chrono::{Duration, Utc};
use hmac::digest::InvalidLength;

use crate::auth::permissions::require_role;
use crate::gql::common::helpers::require_non_blank;
use crate::gql::common::types::Role;
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;
use crate::storage::{object_key, presign_url, PresignRequest, StorageConfig};

use super::types::{UploadFolder, UploadUrl};

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/svg+xml"];

pub fn build_upload_url(
    config: &StorageConfig,
    folder: UploadFolder,
    file_name: &str,
    now: chrono::DateTime<Utc>,
) -> std::result::Result<UploadUrl, InvalidLength> {
    let key = object_key(folder.as_str(), file_name);
    let url = presign_url(
        config,
        &PresignRequest {
            method: "PUT",
            key: &key,
            signed_at: now,
            expires_seconds: config.url_expires_seconds,
        },
    )?;

    Ok(UploadUrl {
        url,
        public_url: format!("{}/{}", config.public_url.trim_end_matches('/'), key),
        key,
        expires_at: now + Duration::seconds(i64::from(config.url_expires_seconds)),
    })
}

#[derive(Default)]
pub struct UploadMutation;

#[Object]
impl UploadMutation {
    /// Pre-signed URL for uploading a logo or photo straight to object storage
    async fn create_upload_url(
        &self,
        ctx: &Context<'_>,
        folder: UploadFolder,
        file_name: String,
        content_type: String,
    ) -> Result<UploadUrl> {
        let user = require_role(ctx, Role::Manager).await?;
        let state = ctx.data::<AppState>()?;

        let config = state
            .storage()
            .ok_or_else(|| GqlError::new("File uploads are not configured"))?;
        let file_name = require_non_blank(&file_name, "fileName")?;
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(GqlError::new(format!("Unsupported content type: {content_type}")).into());
        }

        let upload = build_upload_url(config, folder, &file_name, Utc::now())
            .gql_err("Failed to sign upload URL")?;
        tracing::info!(user_id = %user.id, key = %upload.key, "Upload URL issued");
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use url::Url;

    #[test]
    fn upload_url_points_at_the_public_location() {
        let config = StorageConfig {
            endpoint: Url::parse("http://localhost:9000").unwrap(),
            bucket: "league".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "minio".to_string(),
            secret_access_key: "minio-secret".to_string(),
            public_url: "https://cdn.example.com/".to_string(),
            url_expires_seconds: 600,
            path_style: true,
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let upload = build_upload_url(&config, UploadFolder::Teams, "Logo.PNG", now).unwrap();

        assert!(upload.key.starts_with("teams/"));
        assert!(upload.key.ends_with("-logo.png"));
        assert_eq!(upload.public_url, format!("https://cdn.example.com/{}", upload.key));
        assert!(upload.url.starts_with("http://localhost:9000/league/teams/"));
        assert!(upload.url.contains("X-Amz-Expires=600"));
        assert_eq!(upload.expires_at, now + Duration::seconds(600));
    }
}
