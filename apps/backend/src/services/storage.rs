//! S3/R2 storage service for profile pictures.

use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client, Config,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// S3/R2 storage service for profile picture uploads.
pub struct StorageService {
    client: Client,
    bucket: String,
    public_base: String,
}

impl StorageService {
    /// Create a new storage service from environment variables.
    ///
    /// Required env vars:
    /// - S3_BUCKET: Bucket name
    /// - S3_REGION: Region (use "auto" for Cloudflare R2)
    /// - S3_ENDPOINT: Custom endpoint URL (required for R2)
    /// - S3_ACCESS_KEY: Access key ID
    /// - S3_SECRET_KEY: Secret access key
    /// - S3_PUBLIC_URL: Public base URL objects are served from
    pub async fn new() -> Result<Self, StorageError> {
        let bucket = std::env::var("S3_BUCKET")
            .map_err(|_| StorageError::Config("S3_BUCKET not set".to_string()))?;

        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string());

        let endpoint = std::env::var("S3_ENDPOINT").ok();

        let access_key = std::env::var("S3_ACCESS_KEY")
            .map_err(|_| StorageError::Config("S3_ACCESS_KEY not set".to_string()))?;

        let secret_key = std::env::var("S3_SECRET_KEY")
            .map_err(|_| StorageError::Config("S3_SECRET_KEY not set".to_string()))?;

        let public_base = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));

        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,  // session token
            None,  // expiry
            "env", // provider name
        );

        let mut config_builder = Config::builder()
            .region(Region::new(region))
            .credentials_provider(credentials)
            .behavior_version_latest();

        // Set custom endpoint for R2 or other S3-compatible services
        if let Some(endpoint_url) = endpoint {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        let config = config_builder.build();
        let client = Client::from_conf(config);

        Ok(Self {
            client,
            bucket,
            public_base,
        })
    }

    /// Upload a profile picture and return its public URL.
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        file_name: &str,
        content: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let key = Self::avatar_key(user_id, file_name);
        let body = ByteStream::from(content.to_vec());

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!("Uploaded avatar to storage: {}", key);
        Ok(self.public_url(&key))
    }

    /// Delete every stored avatar object for a user. Used when the account
    /// is removed.
    pub async fn delete_avatars(&self, user_id: Uuid) -> Result<usize, StorageError> {
        let prefix = format!("avatars/{}/", user_id);
        let keys = self.list_keys(&prefix).await?;

        for key in &keys {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| StorageError::S3(e.to_string()))?;
            tracing::info!("Deleted avatar from storage: {}", key);
        }

        Ok(keys.len())
    }

    /// List object keys under a prefix.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(String::from))
            .collect();

        Ok(keys)
    }

    /// Generate the object key for a user's avatar.
    ///
    /// Format: `avatars/{user_id}/{file_name}`
    pub fn avatar_key(user_id: Uuid, file_name: &str) -> String {
        format!("avatars/{}/{}", user_id, file_name.trim_start_matches('/'))
    }

    /// Public URL an object key is served from.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), key)
    }

    /// Whether a stored URL points into this service's avatar space.
    pub fn owns_url(&self, url: &str) -> bool {
        url.starts_with(self.public_base.trim_end_matches('/'))
    }
}
