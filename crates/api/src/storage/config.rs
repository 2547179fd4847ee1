use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub public_url: String,
    pub url_expires_seconds: u32,
    /// `endpoint/bucket/key` instead of `bucket.endpoint/key` (MinIO and friends).
    pub path_style: bool,
}

impl StorageConfig {
    /// Read storage settings; `Ok(None)` when uploads are not configured.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(bucket) = env::var("STORAGE_BUCKET") else {
            return Ok(None);
        };

        let endpoint = env::var("STORAGE_ENDPOINT")
            .unwrap_or_else(|_| "https://s3.amazonaws.com".to_string());
        let endpoint = Url::parse(&endpoint).context("STORAGE_ENDPOINT is not a valid URL")?;
        let path_style = env::var("STORAGE_PATH_STYLE")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let public_url = env::var("STORAGE_PUBLIC_URL").unwrap_or_else(|_| {
            let host = endpoint.host_str().unwrap_or_default();
            if path_style {
                format!("{}://{}/{}", endpoint.scheme(), host, bucket)
            } else {
                format!("{}://{}.{}", endpoint.scheme(), bucket, host)
            }
        });

        Ok(Some(Self {
            endpoint,
            region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: env::var("STORAGE_ACCESS_KEY_ID")
                .context("STORAGE_ACCESS_KEY_ID must be set when STORAGE_BUCKET is")?,
            secret_access_key: env::var("STORAGE_SECRET_ACCESS_KEY")
                .context("STORAGE_SECRET_ACCESS_KEY must be set when STORAGE_BUCKET is")?,
            public_url: public_url.trim_end_matches('/').to_string(),
            url_expires_seconds: env::var("STORAGE_URL_EXPIRES_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            path_style,
            bucket,
        }))
    }
}
