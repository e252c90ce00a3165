use anyhow::{Context, Result};
use blog_builder_core::config::{DEFAULT_ASSETS_DIR, DEFAULT_POSTS_DIR, parse_blog_toml_str};
use blog_builder_core::{DEFAULT_AUTHOR, DEFAULT_TITLE, ThemeName};
use blog_builder_generator::project::PROJECT_FILE;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Escape a string for safe inclusion in a TOML basic string
///
/// The scaffold is written by hand so it can carry comments; serializing
/// through the toml crate would drop them.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn known_template(id: &str) -> bool {
    ThemeName::ALL
        .iter()
        .any(|t| t.as_str() == id.trim().to_lowercase())
}

pub async fn run(
    path: PathBuf,
    title: Option<String>,
    author: Option<String>,
    template: String,
) -> Result<()> {
    println!("Initializing blog directory: {}", path.display());

    let project_path = path.join(PROJECT_FILE);
    if project_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            PROJECT_FILE,
            project_path.display()
        );
    }

    if !known_template(&template) {
        let names: Vec<&str> = ThemeName::ALL.iter().map(|t| t.as_str()).collect();
        anyhow::bail!(
            "Unknown template '{}'. Choose one of: {}",
            template,
            names.join(", ")
        );
    }

    fs::create_dir_all(path.join(DEFAULT_POSTS_DIR)).context("Failed to create posts directory")?;
    fs::create_dir_all(path.join(DEFAULT_ASSETS_DIR)).context("Failed to create assets directory")?;

    generate_blog_toml(&path, title.as_deref(), author.as_deref(), &template)?;
    generate_first_post(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── blog.toml            ← Edit this to set title, author, colours");
    println!("  ├── assets/              ← Images and files shipped with the site");
    println!("  └── posts/");
    println!("      └── hello-world.md   ← Your first post");

    println!("\nNext steps:");
    println!("  1. Edit blog.toml (title, author, about text)");
    println!("  2. Write posts in posts/ as Markdown");
    println!("  3. Preview: blog-builder preview {}", path.display());

    Ok(())
}

fn generate_blog_toml(
    base: &Path,
    title: Option<&str>,
    author: Option<&str>,
    template: &str,
) -> Result<()> {
    let blog_title = toml_escape_string(title.unwrap_or(DEFAULT_TITLE));
    let blog_author = toml_escape_string(author.unwrap_or(DEFAULT_AUTHOR));
    let template = toml_escape_string(&template.trim().to_lowercase());

    let title_comment = if title.is_some() {
        ""
    } else {
        "  # TODO: Set blog title"
    };
    let author_comment = if author.is_some() {
        ""
    } else {
        "  # TODO: Set author name"
    };

    let toml = format!(
        "# Generated by blog-builder init\n\
# Edit this file to customize your blog\n\
\n\
[site]\n\
title = \"{blog_title}\"{title_comment}\n\
author = \"{blog_author}\"{author_comment}\n\
tagline = \"Notes and essays\"\n\
about = \"\"\"\n\
Write a few lines about yourself here.\n\
Line breaks are kept.\"\"\"\n\
template = \"{template}\"  # clean, dark or magazine\n\
\n\
# Optional colour overrides, applied on top of the template\n\
[theme]\n\
# primary = \"#ff6b35\"\n\
# background = \"#ffffff\"\n\
\n\
[content]\n\
posts_dir = \"{DEFAULT_POSTS_DIR}\"\n\
assets_dir = \"{DEFAULT_ASSETS_DIR}\"\n"
    );

    parse_blog_toml_str(&toml)
        .context("Generated blog.toml is invalid - this is a bug in the template generator")?;

    fs::write(base.join(PROJECT_FILE), toml)?;

    Ok(())
}

fn generate_first_post(base: &Path) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d");
    let post = format!(
        r##"# Hello, World

Welcome to the first post, written on {today}.

Posts are Markdown, so you can use:

- **Bold** and *italic* text
- Lists, tables and ~~strikethrough~~
- Links and code blocks

The first heading becomes the title and the first paragraph the excerpt.
"##
    );

    fs::write(base.join(DEFAULT_POSTS_DIR).join("hello-world.md"), post)?;

    Ok(())
}
