use crate::Uploader;
use async_trait::async_trait;
use blog_builder_core::{Error, Result, UploadResult};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Uploader that writes objects below a local directory.
///
/// Useful for publishing to a mounted share or a directory served by another
/// web server. The etag is the SHA-256 of the body.
pub struct DirectoryUploader {
    root: PathBuf,
    base_url: Option<String>,
}

impl DirectoryUploader {
    pub fn new(root: impl Into<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            base_url,
        }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(Error::Upload(format!("Invalid object key: {}", key)));
        }
        Ok(self.root.join(relative))
    }

    fn url_for(&self, key: &str, path: &Path) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("file://{}", path.display()),
        }
    }
}

#[async_trait]
impl Uploader for DirectoryUploader {
    async fn upload(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<UploadResult> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let etag = format!("{:x}", Sha256::digest(&body));
        tokio::fs::write(&path, body).await?;
        log::debug!("wrote {}", path.display());

        Ok(UploadResult {
            url: self.url_for(key, &path),
            key: key.to_string(),
            etag,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} already absent", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
