// S3-compatible object storage (AWS S3, R2, MinIO...)

use crate::Uploader;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use blog_builder_core::config::StorageConfig;
use blog_builder_core::{Error, Result, UploadResult};

pub struct S3Uploader {
    client: Client,
    config: StorageConfig,
}

impl S3Uploader {
    /// Build a client from static credentials in the global config.
    ///
    /// A custom `endpoint` points the SDK at an S3-compatible service.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        if config.bucket.trim().is_empty() {
            return Err(Error::ConfigParse("storage.bucket must not be empty".to_string()));
        }

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "blog-builder",
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<UploadResult> {
        let output = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                Error::Upload(format!(
                    "PUT s3://{}/{} failed: {}",
                    self.config.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let etag = output.e_tag().unwrap_or_default().trim_matches('"').to_string();
        log::debug!("stored s3://{}/{} etag={}", self.config.bucket, key, etag);

        Ok(UploadResult {
            url: public_url(&self.config, key),
            key: key.to_string(),
            etag,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::Upload(format!(
                    "DELETE s3://{}/{} failed: {}",
                    self.config.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

/// Address an uploaded object can be fetched from.
///
/// Preference order: `public_base_url`, then the custom endpoint (path style
/// or virtual host), then the regional AWS host.
pub fn public_url(config: &StorageConfig, key: &str) -> String {
    if let Some(base) = &config.public_base_url {
        return format!("{}/{}", base.trim_end_matches('/'), key);
    }

    match &config.endpoint {
        Some(endpoint) if config.path_style => {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), config.bucket, key)
        }
        Some(endpoint) => {
            let endpoint = endpoint.trim_end_matches('/');
            match endpoint.split_once("://") {
                Some((scheme, host)) => format!("{}://{}.{}/{}", scheme, config.bucket, host, key),
                None => format!("{}/{}/{}", endpoint, config.bucket, key),
            }
        }
        None => format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            config.bucket, config.region, key
        ),
    }
}
