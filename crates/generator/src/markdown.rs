//! Markdown import: one file in, one [`Article`] out.

use blog_builder_core::text::{EXCERPT_CHARS, excerpt, slugify};
use blog_builder_core::{Article, Result};
use pulldown_cmark::{Options, Parser, html};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Slug used when a title has no URL-safe characters at all
const FALLBACK_SLUG: &str = "article";

/// Title from the first `# heading` line, else the file name without extension
pub fn extract_title(markdown: &str, file_name: &str) -> String {
    markdown
        .lines()
        .find_map(|line| {
            let rest = line.strip_prefix('#')?;
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let title = rest.trim();
            (!title.is_empty()).then(|| title.to_string())
        })
        .unwrap_or_else(|| strip_markdown_extension(file_name).to_string())
}

fn strip_markdown_extension(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    for ext in [".markdown", ".md"] {
        if lower.ends_with(ext) {
            return &file_name[..file_name.len() - ext.len()];
        }
    }
    file_name
}

/// Convert Markdown to HTML with the common GitHub extensions enabled
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Build an article from Markdown text and the name of the file it came from
pub fn parse_markdown(markdown: &str, file_name: &str) -> Article {
    let title = extract_title(markdown, file_name);
    let html = markdown_to_html(markdown);

    let mut slug = slugify(if title.is_empty() { file_name } else { &title });
    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }

    Article {
        excerpt: excerpt(&html, EXCERPT_CHARS),
        title,
        slug,
        html,
    }
}

/// Read and parse files in the given order. Slugs are made unique.
pub fn import_markdown_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Article>> {
    let mut articles = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let article = parse_markdown(&text, file_name);
        log::debug!("imported {} as '{}'", path.display(), article.slug);
        articles.push(article);
    }

    dedupe_slugs(&mut articles);
    Ok(articles)
}

/// Import every Markdown file below `dir`, sorted by path.
///
/// A missing directory yields no articles.
pub fn import_posts_dir(dir: &Path) -> Result<Vec<Article>> {
    if !dir.exists() {
        log::debug!("posts directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    MARKDOWN_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    import_markdown_files(&paths)
}

/// Suffix repeated slugs with `-2`, `-3`... so every anchor is unique
fn dedupe_slugs(articles: &mut [Article]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for article in articles.iter_mut() {
        let count = seen.entry(article.slug.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let mut n = *count;
            let mut candidate = format!("{}-{}", article.slug, n);
            while seen.contains_key(&candidate) {
                n += 1;
                candidate = format!("{}-{}", article.slug, n);
            }
            log::warn!("duplicate slug '{}' renamed to '{}'", article.slug, candidate);
            seen.insert(candidate.clone(), 1);
            article.slug = candidate;
        }
    }
}
