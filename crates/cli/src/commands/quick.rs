use anyhow::{Context, Result};
use blog_builder_core::ThemeOverride;
use blog_builder_generator::{SiteArchive, resolve_prompt, render_site};
use std::fs;
use std::path::PathBuf;

/// Turn a one-sentence description straight into a downloadable archive
pub async fn run(prompt: String, output: PathBuf, html_out: Option<PathBuf>) -> Result<()> {
    println!("⚡ Generating blog from description...");

    let resolved = resolve_prompt(&prompt);
    println!("   Title: {}", resolved.info.title);
    println!("   Author: {}", resolved.info.author);
    println!("   Theme: {}", resolved.theme);
    println!();

    let site = resolved.into_site(Vec::new());
    let html = render_site(&site, &ThemeOverride::default());

    if let Some(html_path) = &html_out {
        fs::write(html_path, &html)
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        println!("📄 Wrote {}", html_path.display());
    }

    let bytes = SiteArchive::new(html)
        .into_bytes()
        .await
        .context("Failed to package site")?;
    fs::write(&output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✅ Archive ready: {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
