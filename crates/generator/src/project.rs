use crate::markdown::import_posts_dir;
use crate::render::render_site;
use crate::resolver::resolve_template;
use crate::GeneratedSite;
use blog_builder_core::config::{BlogProject, parse_blog_toml};
use blog_builder_core::{Asset, Error, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Project configuration file name
pub const PROJECT_FILE: &str = "blog.toml";

/// Load `blog.toml` from a project directory
pub fn load_project(dir: &Path) -> Result<BlogProject> {
    let config_path = dir.join(PROJECT_FILE);
    if !config_path.exists() {
        return Err(Error::ConfigParse(format!(
            "{} not found in {}",
            PROJECT_FILE,
            dir.display()
        )));
    }
    parse_blog_toml(&config_path)
}

/// Build the site described by a project directory.
///
/// Reads blog.toml, imports the posts, collects the assets and renders the
/// page with the configured template and colour overrides.
pub fn build_project(dir: &Path) -> Result<GeneratedSite> {
    let project = load_project(dir)?;

    let articles = import_posts_dir(&dir.join(&project.posts_dir))?;
    let assets = collect_assets(&dir.join(&project.assets_dir))?;
    log::info!(
        "building {}: {} article(s), {} asset(s), template '{}'",
        dir.display(),
        articles.len(),
        assets.len(),
        project.template
    );

    let site = resolve_template(&project.info, &project.template).into_site(articles);
    let html = render_site(&site, &project.theme);

    Ok(GeneratedSite { html, assets })
}

/// Every file below `dir`, keyed by its forward-slash path relative to `dir`
pub fn collect_assets(dir: &Path) -> Result<Vec<Asset>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::InvalidData(format!("cannot read assets: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| Error::InvalidData(e.to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if name.split('/').any(|segment| segment.starts_with('.')) {
            log::debug!("skipping hidden asset {}", name);
            continue;
        }

        assets.push(Asset::new(name, fs::read(entry.path())?));
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(dir: &Path, toml: &str) {
        fs::write(dir.join(PROJECT_FILE), toml).unwrap();
    }

    #[test]
    fn test_build_project_without_posts_uses_placeholders() {
        let dir = TempDir::new().unwrap();
        write_project(
            dir.path(),
            r##"
[site]
title = "Ann's Log"
author = "Ann"
template = "dark"
"##,
        );

        let site = build_project(dir.path()).unwrap();
        assert_eq!(site.html.matches(r#"<a class="post""#).count(), 3);
        assert!(site.html.contains("--bg:#000;"));
        assert!(site.assets.is_empty());
    }

    #[test]
    fn test_build_project_with_posts_assets_and_override() {
        let dir = TempDir::new().unwrap();
        write_project(
            dir.path(),
            r##"
[site]
title = "Ann's Log"
author = "Ann"

[theme]
primary = "#ff6b35"
"##,
        );
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts").join("a.md"), "# First Post\n\nHello").unwrap();
        fs::create_dir_all(dir.path().join("assets").join("img")).unwrap();
        fs::write(dir.path().join("assets").join("img").join("logo.png"), [1u8, 2, 3]).unwrap();
        fs::write(dir.path().join("assets").join(".DS_Store"), "junk").unwrap();

        let site = build_project(dir.path()).unwrap();
        assert_eq!(site.html.matches(r#"<a class="post""#).count(), 1);
        assert!(site.html.contains(r##"href="#first-post""##));
        assert!(site.html.contains(r#"<section class="article" id="first-post">"#));
        assert!(site.html.contains("--primary:#ff6b35;"));
        assert_eq!(site.assets, vec![Asset::new("img/logo.png", vec![1u8, 2, 3])]);
    }

    #[test]
    fn test_build_project_requires_blog_toml() {
        let dir = TempDir::new().unwrap();
        let result = build_project(dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("blog.toml not found"));
    }
}
