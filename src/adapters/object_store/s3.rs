//! S3 object-store implementation
//!
//! Wraps the AWS SDK ListObjectsV2 call behind the [`ObjectStore`] trait.
//! The client is built from explicit credentials: the access key id comes
//! from configuration and the secret access key from the key vault (see
//! `adapters::secrets`).

use super::{ObjectPage, ObjectStore};
use crate::config::BucketConfig;
use crate::domain::{ObjectRecord, ObjectStoreError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;

/// S3-backed object store
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Create a new S3 object store from configuration and the resolved
    /// secret access key.
    ///
    /// # Arguments
    ///
    /// * `config` - Bucket configuration (region, access key id, optional
    ///   endpoint override)
    /// * `secret_access_key` - Secret access key resolved from the key vault
    pub async fn connect(
        config: &BucketConfig,
        secret_access_key: &crate::config::SecretString,
    ) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.access_key_id.clone(),
            secret_access_key.expose_secret().as_ref().to_string(),
            None,
            None,
            "tidemark",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        // Custom endpoint is used for local test stacks.
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let aws_config = loader.load().await;
        let builder = aws_sdk_s3::config::Builder::from(&aws_config);

        let s3_config = if config.endpoint.is_some() {
            builder.force_path_style(true).build()
        } else {
            builder.build()
        };

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage> {
        let mut request = self.client.list_objects_v2().bucket(bucket);

        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| {
            ObjectStoreError::ListFailed {
                bucket: bucket.to_string(),
                message: e.to_string(),
            }
        })?;

        let mut entries = Vec::new();
        for object in response.contents.unwrap_or_default() {
            let Some(key) = object.key else {
                continue;
            };

            let last_modified = object
                .last_modified
                .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                .unwrap_or_else(|| {
                    tracing::warn!(key = %key, "Object has no last-modified timestamp, using epoch");
                    DateTime::<Utc>::UNIX_EPOCH
                });

            let size = object.size.unwrap_or(0).max(0) as u64;

            entries.push(ObjectRecord::new(key, last_modified, size));
        }

        Ok(ObjectPage {
            entries,
            next_continuation_token: response.next_continuation_token,
            is_truncated: response.is_truncated.unwrap_or(false),
        })
    }
}
