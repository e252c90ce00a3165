use crate::error::{Error, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default posts directory, relative to the project root
pub const DEFAULT_POSTS_DIR: &str = "posts";

/// Default assets directory, relative to the project root
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Raw TOML configuration structure
/// This matches the blog.toml file structure exactly
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    site: RawSite,
    #[serde(default)]
    theme: ThemeOverride,
    #[serde(default)]
    content: RawContent,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    title: Option<String>,
    author: Option<String>,
    tagline: Option<String>,
    about: Option<String>,
    template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContent {
    posts_dir: Option<String>, // Convert to PathBuf
    assets_dir: Option<String>,
}

/// A blog project as described by blog.toml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogProject {
    pub info: DraftInfo,
    /// Template identifier as written; resolved leniently at render time
    pub template: String,
    pub theme: ThemeOverride,
    pub posts_dir: PathBuf,
    pub assets_dir: PathBuf,
}

/// Parse blog.toml from a file path
pub fn parse_blog_toml<P: AsRef<Path>>(path: P) -> Result<BlogProject> {
    let content = fs::read_to_string(path)?;
    parse_blog_toml_str(&content)
}

/// Parse blog.toml from a string (useful for testing)
pub fn parse_blog_toml_str(content: &str) -> Result<BlogProject> {
    let raw: RawProject = toml::from_str(content)?;

    validate_theme_override(&raw.theme)?;

    let posts_dir = validate_path(
        raw.content.posts_dir.as_deref().unwrap_or(DEFAULT_POSTS_DIR),
        "content.posts_dir",
    )?;
    let assets_dir = validate_path(
        raw.content.assets_dir.as_deref().unwrap_or(DEFAULT_ASSETS_DIR),
        "content.assets_dir",
    )?;

    Ok(BlogProject {
        info: DraftInfo {
            title: raw.site.title,
            author: raw.site.author,
            tagline: raw.site.tagline,
            about: raw.site.about,
        },
        template: raw
            .site
            .template
            .unwrap_or_else(|| ThemeName::default().as_str().to_string()),
        theme: raw.theme,
        posts_dir,
        assets_dir,
    })
}

/// Reject override values that could break out of the inline stylesheet
fn validate_theme_override(theme: &ThemeOverride) -> Result<()> {
    for (field, value) in theme.entries() {
        if let Some(value) = value
            && !is_safe_css_value(value)
        {
            return Err(Error::ConfigParse(format!(
                "Invalid colour in 'theme.{}': '{}'. Use a plain CSS colour such as #ff6b35.",
                field, value
            )));
        }
    }
    Ok(())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so that a
/// blog.toml, or an asset name inside an archive, can never point outside the
/// project directory.
///
/// ```text
/// validate_path("posts", "content.posts_dir")          → Ok(PathBuf)
/// validate_path("img/logo.png", "asset")               → Ok(PathBuf)
/// validate_path("/etc/passwd", "asset")                → Err("Absolute paths not allowed...")
/// validate_path("../../../etc/passwd", "asset")        → Err("Parent directory references...")
/// ```
pub fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    // Reject absolute paths, including rooted ones on Windows
    if path.is_absolute() || path_str.starts_with('/') || path_str.starts_with('\\') {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path
        .components()
        .any(|component| component == std::path::Component::ParentDir)
        || path_str.split(['/', '\\']).any(|segment| segment == "..")
    {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}

// ============================================================================
// Global configuration
// ============================================================================

/// Machine-wide settings for the external collaborators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentServiceConfig>,
}

/// S3-compatible object storage (AWS S3, Tencent COS, MinIO, R2...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for non-AWS providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Base URL under which uploaded objects are publicly reachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default)]
    pub path_style: bool,
}

fn default_key_prefix() -> String {
    "blogs".to_string()
}

/// HTTP endpoint that turns a prompt into a content bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentServiceConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

/// Load the global config; a missing file is not an error
pub fn load_global_config<P: AsRef<Path>>(path: P) -> Result<Option<GlobalConfig>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    parse_global_config_str(&contents).map(Some)
}

/// Parse the global config from a string
pub fn parse_global_config_str(contents: &str) -> Result<GlobalConfig> {
    let config: GlobalConfig = toml::from_str(contents)?;

    if let Some(storage) = &config.storage {
        if storage.bucket.trim().is_empty() {
            return Err(Error::ConfigParse("storage.bucket must not be empty".to_string()));
        }
        if let Some(endpoint) = &storage.endpoint
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(Error::ConfigParse(format!(
                "storage.endpoint must be an http(s) URL: '{}'",
                endpoint
            )));
        }
    }

    if let Some(content) = &config.content
        && !content.endpoint.starts_with("http://")
        && !content.endpoint.starts_with("https://")
    {
        return Err(Error::ConfigParse(format!(
            "content.endpoint must be an http(s) URL: '{}'",
            content.endpoint
        )));
    }

    Ok(config)
}

/// Write the global config, creating parent directories
pub fn save_global_config<P: AsRef<Path>>(path: P, config: &GlobalConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
