use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use {
    async_trait::async_trait,
    aws_sdk_s3::{
        Client,
        config::{BehaviorVersion, Builder, Credentials, Region},
        primitives::ByteStream,
    },
    relay_capture::{MediaReference, MediaUploader},
    relay_config::StorageConfig,
    secrecy::ExposeSecret,
    tracing::{debug, info},
};

use crate::{Error, Result, mime};

/// Minimal put-object seam over the S3 client.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;
}

/// `ObjectStore` backed by the AWS SDK, pointed at an S3-compatible endpoint.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.expose_secret().clone(),
            None,
            None,
            "inbox-relay",
        );
        let s3_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint_url())
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .build();
        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::external("failed to upload file to R2", e))?;
        Ok(())
    }
}

/// Uploads media to an R2 bucket and links it through the Cloudflare dashboard.
pub struct R2Uploader {
    store: Arc<dyn ObjectStore>,
    account_id: String,
    bucket: String,
}

impl R2Uploader {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_store(Arc::new(S3ObjectStore::new(config)), config)
    }

    #[must_use]
    pub fn with_store(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            account_id: config.account_id.clone(),
            bucket: config.bucket.clone(),
        }
    }

    /// Dashboard page for an object.
    #[must_use]
    pub fn dashboard_url(&self, key: &str) -> String {
        format!(
            "https://dash.cloudflare.com/{}/r2/default/buckets/{}/objects/{key}",
            self.account_id, self.bucket
        )
    }

    /// Upload `data` under a time-based key and return its dashboard reference.
    pub async fn upload_file(&self, data: Vec<u8>, extension: &str) -> Result<MediaReference> {
        if data.is_empty() {
            return Err(Error::invalid_input("refusing to upload an empty file"));
        }
        let content_type = mime::sniff(&data);
        let extension = if extension.is_empty() {
            mime::extension_for(content_type)
        } else {
            extension
        };
        let key = object_key(extension);
        debug!(key = %key, content_type, size = data.len(), "uploading object");

        self.store.put_object(&key, data, content_type).await?;

        let display_url = self.dashboard_url(&key);
        info!(key = %key, bucket = %self.bucket, "uploaded object");
        Ok(MediaReference {
            reference_url: format!("{display_url}/details"),
            display_url,
        })
    }
}

#[async_trait]
impl MediaUploader for R2Uploader {
    async fn upload(&self, data: Vec<u8>, extension: &str) -> relay_capture::Result<MediaReference> {
        Ok(self.upload_file(data, extension).await?)
    }
}

/// Unique object key: nanoseconds since the epoch plus the extension.
fn object_key(extension: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{nanos}{extension}")
}
