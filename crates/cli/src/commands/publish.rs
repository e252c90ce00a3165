use anyhow::{Context, Result};
use blog_builder_core::config::{
    ContentServiceConfig, GlobalConfig, StorageConfig, load_global_config, save_global_config,
};
use blog_builder_deployer::{DirectoryUploader, S3Uploader, Uploader, publish_archive};
use blog_builder_generator::project::{build_project, load_project};
use chrono::Utc;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Key prefix used when no storage config supplies one
const DEFAULT_KEY_PREFIX: &str = "blogs";

/// Path to the global config file
///
/// An explicit `--config` wins; otherwise ~/.blog-builder/config.toml.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".blog-builder").join("config.toml"))
}

/// Load global config
pub fn load_config(explicit: Option<&Path>) -> Result<Option<GlobalConfig>> {
    let path = config_path(explicit)?;
    load_global_config(&path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Save global config
fn save_config(explicit: Option<&Path>, config: &GlobalConfig) -> Result<()> {
    let path = config_path(explicit)?;
    save_global_config(&path, config).context("Failed to write config file")?;
    println!("✅ Configuration saved to: {}", path.display());
    Ok(())
}

/// Storage section of the global config, or a hint on how to create it
pub fn require_storage(explicit: Option<&Path>) -> Result<StorageConfig> {
    load_config(explicit)?
        .and_then(|c| c.storage)
        .context("No storage configuration found.\nRun 'blog-builder configure' first")
}

/// Uploader for configured object storage
pub async fn storage_uploader(storage: &StorageConfig) -> Result<Box<dyn Uploader>> {
    let uploader = S3Uploader::from_config(storage)
        .await
        .context("Failed to create storage client")?;
    Ok(Box::new(uploader))
}

fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt for a value, keeping `current` when the answer is empty
fn ask(label: &str, current: Option<&str>) -> Result<String> {
    match current.filter(|c| !c.is_empty()) {
        Some(current) => {
            let input = read_input(&format!("{} [current: {}]: ", label, current))?;
            Ok(if input.is_empty() { current.to_string() } else { input })
        }
        None => read_input(&format!("{}: ", label)),
    }
}

/// Prompt for an optional value; 'none' clears it
fn ask_optional(label: &str, current: Option<&str>) -> Result<Option<String>> {
    let input = match current {
        Some(current) => read_input(&format!(
            "{} [current: {}] (press Enter to keep, 'none' to remove): ",
            label, current
        ))?,
        None => read_input(&format!("{} (optional, press Enter to skip): ", label))?,
    };
    Ok(resolve_optional(&input, current))
}

fn resolve_optional(input: &str, current: Option<&str>) -> Option<String> {
    if input.is_empty() {
        current.map(str::to_string)
    } else if input.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(input.to_string())
    }
}

/// Hide most of a secret when echoing the current value
fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{}...", shown)
}

pub async fn configure(explicit: Option<&Path>) -> Result<()> {
    println!("🔧 Configuring blog-builder...\n");

    let existing = load_config(explicit)?.unwrap_or_default();

    println!("📋 Storage (any S3-compatible service: AWS S3, Tencent COS, MinIO, R2)");
    let current = existing.storage.as_ref();

    let bucket = ask("Bucket", current.map(|s| s.bucket.as_str()))?;
    if bucket.is_empty() {
        anyhow::bail!("Bucket is required");
    }
    let region = ask("Region", current.map(|s| s.region.as_str()))?;
    if region.is_empty() {
        anyhow::bail!("Region is required");
    }
    let endpoint = ask_optional(
        "Custom endpoint URL",
        current.and_then(|s| s.endpoint.as_deref()),
    )?;

    let masked_key = current.map(|s| mask(&s.access_key_id));
    let access_key_id = match read_input(&match &masked_key {
        Some(m) => format!("Access key ID [current: {}]: ", m),
        None => "Access key ID: ".to_string(),
    })? {
        input if input.is_empty() => current.map(|s| s.access_key_id.clone()).unwrap_or_default(),
        input => input,
    };
    let secret_access_key = match read_input(if current.is_some() {
        "Secret access key [press Enter to keep]: "
    } else {
        "Secret access key: "
    })? {
        input if input.is_empty() => current
            .map(|s| s.secret_access_key.clone())
            .unwrap_or_default(),
        input => input,
    };
    if access_key_id.is_empty() || secret_access_key.is_empty() {
        anyhow::bail!("Access key ID and secret are required");
    }

    let public_base_url = ask_optional(
        "Public base URL",
        current.and_then(|s| s.public_base_url.as_deref()),
    )?;
    let key_prefix = ask(
        "Key prefix",
        Some(current.map(|s| s.key_prefix.as_str()).unwrap_or(DEFAULT_KEY_PREFIX)),
    )?;
    let path_style = {
        let was = current.map(|s| s.path_style).unwrap_or(false);
        let input = read_input(&format!(
            "Path-style addressing? [{}]: ",
            if was { "Y/n" } else { "y/N" }
        ))?;
        match input.to_lowercase().as_str() {
            "" => was,
            "y" | "yes" => true,
            _ => false,
        }
    };

    println!();
    println!("📋 Content service (optional, used by 'blog-builder generate')");
    let current_content = existing.content.as_ref();
    let content = match ask_optional(
        "Endpoint URL",
        current_content.map(|c| c.endpoint.as_str()),
    )? {
        Some(endpoint) => {
            let api_key = ask_optional(
                "API key",
                current_content.and_then(|c| c.api_key.as_deref()),
            )?;
            let model = ask_optional("Model", current_content.and_then(|c| c.model.as_deref()))?;
            Some(ContentServiceConfig {
                endpoint,
                api_key,
                model,
                timeout_secs: current_content.map(|c| c.timeout_secs).unwrap_or(60),
            })
        }
        None => None,
    };

    let config = GlobalConfig {
        storage: Some(StorageConfig {
            bucket,
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            public_base_url,
            key_prefix,
            path_style,
        }),
        content,
    };

    save_config(explicit, &config)?;

    println!();
    println!("✅ Configuration complete!");
    println!("🚀 Ready to publish! Try: blog-builder publish <blog-path>");

    Ok(())
}

/// Package a project and upload the archive
pub async fn publish(explicit: Option<&Path>, path: PathBuf, to_dir: Option<PathBuf>) -> Result<()> {
    println!("🚀 Publishing blog...\n");

    let project = load_project(&path).context("Failed to load blog project")?;
    let title = project.info.complete().title;

    println!("📋 Publish Plan:");
    println!("   Blog: {}", title);
    println!("   Template: {}", project.template);

    let (uploader, prefix): (Box<dyn Uploader>, String) = match to_dir {
        Some(dir) => {
            println!("   Target: {}", dir.display());
            let uploader: Box<dyn Uploader> = Box::new(DirectoryUploader::new(dir, None));
            (uploader, DEFAULT_KEY_PREFIX.to_string())
        }
        None => {
            let storage = require_storage(explicit)?;
            println!("   Target: bucket {} ({})", storage.bucket, storage.region);
            let uploader = storage_uploader(&storage).await?;
            (uploader, storage.key_prefix)
        }
    };
    println!();

    println!("🔨 Building site...");
    let site = build_project(&path).context("Failed to build site")?;
    let asset_count = site.assets.len();
    let bytes = site
        .into_archive()
        .context("Failed to package site")?
        .into_bytes()
        .await
        .context("Failed to package site")?;
    println!("   ✓ {} bytes, {} asset(s)", bytes.len(), asset_count);

    println!("📤 Uploading...");
    let result = publish_archive(uploader.as_ref(), &prefix, &title, bytes, Utc::now())
        .await
        .context("Upload failed")?;

    println!();
    println!("✅ Published!");
    println!("   Key: {}", result.key);
    println!("   URL: {}", result.url);
    println!("   ETag: {}", result.etag);

    Ok(())
}

/// Delete a previously published archive
pub async fn unpublish(explicit: Option<&Path>, key: String, force: bool) -> Result<()> {
    println!("🗑️  Removing published archive...\n");

    let storage = require_storage(explicit)?;
    println!("⚠️  WARNING: This will permanently delete:");
    println!("   s3://{}/{}", storage.bucket, key);
    println!();

    if !force {
        println!("⚠️  Type the key to confirm deletion:");
        let input = read_input("   > ")?;
        if input != key {
            println!("❌ Key doesn't match. Unpublish cancelled.");
            return Ok(());
        }
    }

    let uploader = storage_uploader(&storage).await?;
    uploader.delete(&key).await.context("Delete failed")?;

    println!("✅ Deleted {}", key);
    Ok(())
}
