use anyhow::{Context, Result};
use blog_builder_generator::archive::{ASSETS_DIR, INDEX_ENTRY};
use blog_builder_generator::project::{PROJECT_FILE, build_project};
use blog_builder_generator::GeneratedSite;
use std::fs;
use std::path::{Path, PathBuf};

fn check_project(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Blog directory does not exist: {}", path.display());
    }
    if !path.join(PROJECT_FILE).exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'blog-builder init {}' first",
            PROJECT_FILE,
            path.display(),
            path.display()
        );
    }
    Ok(())
}

fn build(path: &Path) -> Result<GeneratedSite> {
    check_project(path)?;
    let site = build_project(path).context("Failed to build site")?;
    println!("✓ Rendered index.html");
    println!("  Assets: {}", site.assets.len());
    println!();
    Ok(site)
}

/// Write a generated site into `output` as index.html plus assets/
pub fn write_site(site: &GeneratedSite, output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;
    fs::write(output.join(INDEX_ENTRY), &site.html).context("Failed to write index.html")?;

    for asset in &site.assets {
        let dst = output.join(ASSETS_DIR).join(&asset.path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dst, &asset.content)
            .with_context(|| format!("Failed to write {}", dst.display()))?;
    }
    Ok(())
}

/// Build static site into a directory
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = build(&path)?;

    println!("📁 Writing files...");
    write_site(&site, &output)?;
    println!("   ✓ Wrote index.html and {} asset(s)", site.assets.len());

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Build static site and write it as a ZIP archive
pub async fn package(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("📦 Packaging static site...");
    println!("   Source: {}", path.display());
    println!("   Archive: {}", output.display());
    println!();

    let site = build(&path)?;

    let archive = site.into_archive().context("Failed to package site")?;
    archive
        .write_to_path(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✅ Package complete!");
    println!("   Archive: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_builder_core::Asset;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_FILE),
            "[site]\ntitle = \"Notes\"\nauthor = \"Ann\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("assets/img")).unwrap();
        fs::write(dir.path().join("assets/img/a.png"), [9u8, 9]).unwrap();
        dir
    }

    #[test]
    fn test_write_site_layout() {
        let out = TempDir::new().unwrap();
        let site = GeneratedSite {
            html: "<html></html>".to_string(),
            assets: vec![Asset::new("css/site.css", "body{}")],
        };
        write_site(&site, out.path()).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("index.html")).unwrap(),
            "<html></html>"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("assets/css/site.css")).unwrap(),
            "body{}"
        );
    }

    #[tokio::test]
    async fn test_build_writes_directory() {
        let dir = project();
        let out = TempDir::new().unwrap();
        run(dir.path().to_path_buf(), out.path().join("site"))
            .await
            .unwrap();

        let html = fs::read_to_string(out.path().join("site/index.html")).unwrap();
        assert!(html.contains("<title>Notes</title>"));
        assert_eq!(fs::read(out.path().join("site/assets/img/a.png")).unwrap(), vec![9u8, 9]);
    }

    #[tokio::test]
    async fn test_package_writes_archive() {
        let dir = project();
        let out = TempDir::new().unwrap();
        let zip_path = out.path().join("site.zip");
        package(dir.path().to_path_buf(), zip_path.clone()).await.unwrap();

        let bytes = fs::read(&zip_path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_build_without_project_file_fails() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let err = run(dir.path().to_path_buf(), out.path().to_path_buf())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("blog.toml not found"));
    }
}
