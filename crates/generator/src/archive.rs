use blog_builder_core::config::validate_path;
use blog_builder_core::{Asset, Error, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Archive path of the rendered page
pub const INDEX_ENTRY: &str = "index.html";

/// Directory prefix for supplied assets
pub const ASSETS_DIR: &str = "assets";

/// In-memory site archive: `index.html` plus any number of assets.
///
/// Assembling the archive is synchronous; bytes are only produced by
/// [`SiteArchive::to_bytes`] or [`SiteArchive::into_bytes`].
#[derive(Debug, Clone)]
pub struct SiteArchive {
    html: String,
    assets: BTreeMap<String, Vec<u8>>,
}

impl SiteArchive {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            assets: BTreeMap::new(),
        }
    }

    /// Archive with the given assets; a later asset replaces an earlier one at
    /// the same path.
    pub fn with_assets(html: impl Into<String>, assets: impl IntoIterator<Item = Asset>) -> Result<Self> {
        let mut archive = Self::new(html);
        for asset in assets {
            archive.add_asset(&asset.path, asset.content)?;
        }
        Ok(archive)
    }

    /// Store `content` at `assets/{path}`. Last write wins.
    pub fn add_asset(&mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let normalized = normalize_asset_path(path)?;
        if self.assets.insert(normalized.clone(), content.into()).is_some() {
            log::debug!("asset '{}' replaced", normalized);
        }
        Ok(())
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Every entry that will be written, as (archive path, bytes), index first
    pub fn entries(&self) -> Vec<(String, &[u8])> {
        let mut entries = Vec::with_capacity(self.assets.len() + 1);
        entries.push((INDEX_ENTRY.to_string(), self.html.as_bytes()));
        for (path, content) in &self.assets {
            entries.push((format!("{}/{}", ASSETS_DIR, path), content.as_slice()));
        }
        entries
    }

    /// Serialize as a ZIP archive into `writer`
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        // Fixed timestamps keep equal input byte-identical
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        for (path, content) in self.entries() {
            zip.start_file(path.as_str(), options).map_err(archive_error)?;
            zip.write_all(content).map_err(archive_error)?;
        }

        zip.finish().map_err(archive_error)
    }

    /// Serialize to bytes on the current thread
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize to bytes on the blocking pool; the only suspending step of
    /// the pipeline.
    pub async fn into_bytes(self) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || self.to_bytes())
            .await
            .map_err(archive_error)?
    }

    /// Serialize and write the archive to a file
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)
            .map_err(|e| Error::Archive(format!("cannot write {}: {}", path.display(), e)))
    }
}

fn archive_error(err: impl std::fmt::Display) -> Error {
    Error::Archive(err.to_string())
}

/// Forward slashes, no leading `./`, and nothing that escapes `assets/`
fn normalize_asset_path(path: &str) -> Result<String> {
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }

    validate_path(trimmed, "asset").map_err(|e| match e {
        Error::ConfigParse(msg) => Error::InvalidData(msg),
        other => other,
    })?;

    let normalized = trimmed
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if normalized.is_empty() {
        return Err(Error::InvalidData(format!("asset path '{}' names no file", path)));
    }
    Ok(normalized)
}
