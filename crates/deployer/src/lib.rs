// External collaborators: content generation and object storage

pub mod content;
pub mod local;
pub mod s3;

use async_trait::async_trait;
use blog_builder_core::text::is_cjk;
use blog_builder_core::{BlogContent, GenerationRequest, Result, UploadResult};
use chrono::{DateTime, Utc};

pub use content::HttpContentGenerator;
pub use local::DirectoryUploader;
pub use s3::S3Uploader;

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Produces a content bundle from a prompt
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<BlogContent>;
}

/// Stores bytes under a key and reports where they can be fetched
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<UploadResult>;

    /// Remove an object. Deleting a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Blog name usable inside an object key: every character other than ASCII
/// letters/digits and CJK ideographs becomes `-`.
pub fn key_safe_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || is_cjk(c) {
                c
            } else {
                '-'
            }
        })
        .collect();
    if name.is_empty() { "blog".to_string() } else { name }
}

/// Object key for a packaged site
///
/// Format: {prefix}/{name}-{timestamp}.zip
/// Example: "blogs" + "Ann's Log" -> "blogs/Ann-s-Log-2025-03-01T08-15-30-250Z.zip"
pub fn archive_key(prefix: &str, blog_title: &str, timestamp: DateTime<Utc>) -> String {
    let stamp = timestamp.format("%Y-%m-%dT%H-%M-%S-%3fZ");
    let name = key_safe_name(blog_title);
    let prefix = prefix.trim_matches('/');

    if prefix.is_empty() {
        format!("{}-{}.zip", name, stamp)
    } else {
        format!("{}/{}-{}.zip", prefix, name, stamp)
    }
}

/// Upload a serialized site archive under a timestamped key
pub async fn publish_archive(
    uploader: &dyn Uploader,
    prefix: &str,
    blog_title: &str,
    archive: Vec<u8>,
    now: DateTime<Utc>,
) -> Result<UploadResult> {
    let key = archive_key(prefix, blog_title, now);
    log::info!("uploading {} bytes to {}", archive.len(), key);
    uploader.upload(&key, archive, ZIP_CONTENT_TYPE).await
}
