// Single-page blog generation: resolve a template, render HTML, package a ZIP

pub mod archive;
pub mod markdown;
pub mod project;
pub mod render;
pub mod resolver;

use blog_builder_core::text::summarize;
use blog_builder_core::{
    Article, Asset, BasicInfo, BlogContent, DraftInfo, Result, Site, ThemeName, ThemeOverride,
};

pub use archive::SiteArchive;
pub use project::build_project;
pub use render::render_site;
pub use resolver::{Resolved, resolve_prompt, resolve_template};

/// A rendered site ready to be written out or packaged
#[derive(Debug, Clone)]
pub struct GeneratedSite {
    pub html: String,
    pub assets: Vec<Asset>,
}

impl GeneratedSite {
    pub fn new(html: String) -> Self {
        Self {
            html,
            assets: Vec::new(),
        }
    }

    pub fn into_archive(self) -> Result<SiteArchive> {
        SiteArchive::with_assets(self.html, self.assets)
    }
}

/// Render a page from explicit form fields and a template id
pub fn generate_html_by_template(
    draft: &DraftInfo,
    template_id: &str,
    articles: Vec<Article>,
    theme_override: &ThemeOverride,
) -> String {
    let site = resolve_template(draft, template_id).into_site(articles);
    render_site(&site, theme_override)
}

/// Render a page from a one-sentence description
pub fn generate_html_auto(
    prompt: &str,
    articles: Vec<Article>,
    theme_override: &ThemeOverride,
) -> String {
    let site = resolve_prompt(prompt).into_site(articles);
    render_site(&site, theme_override)
}

/// Turn a content-service bundle into a renderable site.
///
/// Article bodies arrive as Markdown and are converted here. Slugs are
/// positional (`article-1`, `article-2`...) and missing excerpts are derived
/// from the body.
pub fn site_from_content(content: &BlogContent) -> Site {
    let theme = ThemeName::from_template_id(&content.theme);

    let articles = content
        .articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let excerpt = if a.excerpt.trim().is_empty() {
                summarize(&a.content)
            } else {
                a.excerpt.clone()
            };
            Article {
                title: a.title.clone(),
                slug: format!("article-{}", i + 1),
                excerpt,
                html: markdown::markdown_to_html(&a.content),
            }
        })
        .collect();

    let info: BasicInfo = DraftInfo {
        title: Some(content.title.clone()),
        author: Some(content.author.clone()),
        tagline: Some(content.tagline.clone()),
        about: Some(content.about.clone()),
    }
    .complete();

    Site {
        info,
        tokens: theme.palette(),
        articles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_builder_core::{ContentArticle, DEFAULT_TITLE};

    fn bundle() -> BlogContent {
        BlogContent {
            title: "Tech Notes".to_string(),
            author: "Ann".to_string(),
            tagline: "learning in public".to_string(),
            about: "I write about compilers.".to_string(),
            articles: vec![
                ContentArticle {
                    title: "Hooks".to_string(),
                    content: "# Hooks\n\nState in *functions*.".to_string(),
                    excerpt: "About hooks".to_string(),
                },
                ContentArticle {
                    title: "Composition".to_string(),
                    content: "Composition API notes".to_string(),
                    excerpt: String::new(),
                },
            ],
            theme: "dark".to_string(),
            style: "professional".to_string(),
        }
    }

    #[test]
    fn test_site_from_content() {
        let site = site_from_content(&bundle());
        assert_eq!(site.tokens, ThemeName::Dark.palette());
        assert_eq!(site.info.title, "Tech Notes");
        assert_eq!(site.info.tagline.as_deref(), Some("learning in public"));
        assert_eq!(site.articles.len(), 2);
        assert_eq!(site.articles[0].slug, "article-1");
        assert_eq!(site.articles[1].slug, "article-2");
        assert_eq!(site.articles[0].excerpt, "About hooks");
        assert_eq!(site.articles[1].excerpt, "Composition API notes");
        assert!(site.articles[0].html.contains("<em>functions</em>"));
    }

    #[test]
    fn test_site_from_content_blank_fields_use_defaults() {
        let mut content = bundle();
        content.title = String::new();
        content.theme = "unknown".to_string();
        content.tagline = String::new();
        let site = site_from_content(&content);
        assert_eq!(site.info.title, DEFAULT_TITLE);
        assert_eq!(site.info.tagline, None);
        assert_eq!(site.tokens, ThemeName::Clean.palette());
    }

    #[test]
    fn test_generate_html_auto_uses_prompt_theme() {
        let html = generate_html_auto("a night blog", Vec::new(), &ThemeOverride::default());
        assert!(html.contains("--bg:#000;"));
        assert!(html.contains("a night blog"));
    }

    #[test]
    fn test_generate_html_by_template() {
        let draft = DraftInfo {
            title: Some("Magazine".to_string()),
            ..Default::default()
        };
        let html = generate_html_by_template(&draft, "magazine", Vec::new(), &ThemeOverride::default());
        assert!(html.contains("--bg:#fafafa;"));
        assert!(html.contains("<title>Magazine</title>"));
    }

    #[test]
    fn test_generated_site_into_archive() {
        let mut site = GeneratedSite::new("<html></html>".to_string());
        site.assets.push(Asset::new("a.txt", "a"));
        let archive = site.into_archive().unwrap();
        assert_eq!(archive.asset_count(), 1);
        assert_eq!(archive.html(), "<html></html>");
    }
}
