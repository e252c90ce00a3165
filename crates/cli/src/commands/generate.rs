use anyhow::{Context, Result};
use blog_builder_core::{GenerationRequest, ThemeOverride};
use blog_builder_deployer::{ContentGenerator, HttpContentGenerator, publish_archive};
use blog_builder_generator::{SiteArchive, render_site, site_from_content};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use super::publish::{load_config, require_storage, storage_uploader};

pub struct GenerateArgs {
    pub prompt: String,
    pub template: Option<String>,
    pub style: Option<String>,
    pub author: Option<String>,
    pub output: PathBuf,
    pub publish: bool,
}

impl GenerateArgs {
    fn request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.clone(),
            template: self.template.clone(),
            style: self.style.clone(),
            author: self.author.clone(),
            theme: self.template.clone(),
        }
    }
}

/// Ask a content generator for a bundle and package the rendered site
pub async fn generate_archive(
    generator: &dyn ContentGenerator,
    request: &GenerationRequest,
) -> Result<(String, Vec<u8>)> {
    let content = generator
        .generate(request)
        .await
        .context("Content generation failed")?;
    println!("   ✓ {} by {}", content.title, content.author);
    println!("   ✓ {} article(s)", content.articles.len());

    let site = site_from_content(&content);
    let html = render_site(&site, &ThemeOverride::default());
    let bytes = SiteArchive::new(html)
        .into_bytes()
        .await
        .context("Failed to package site")?;

    Ok((site.info.title, bytes))
}

pub async fn run(explicit: Option<&Path>, args: GenerateArgs) -> Result<()> {
    println!("✍️  Generating blog content...");
    println!("   Prompt: {}", args.prompt);
    println!();

    let content_config = load_config(explicit)?
        .and_then(|c| c.content)
        .context("No content service configured.\nRun 'blog-builder configure' first")?;

    // Fail before spending a generation when publishing cannot succeed
    let storage = if args.publish {
        Some(require_storage(explicit)?)
    } else {
        None
    };

    let generator = HttpContentGenerator::new(&content_config)
        .context("Failed to create content service client")?;

    println!("🤖 Requesting content from {}...", content_config.endpoint);
    let (title, bytes) = generate_archive(&generator, &args.request()).await?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("📦 Archive written: {}", args.output.display());

    if let Some(storage) = storage {
        println!("📤 Uploading...");
        let uploader = storage_uploader(&storage).await?;
        let result = publish_archive(uploader.as_ref(), &storage.key_prefix, &title, bytes, Utc::now())
            .await
            .context("Upload failed")?;
        println!("   ✓ URL: {}", result.url);
    }

    println!();
    println!("✅ Done!");
    Ok(())
}
