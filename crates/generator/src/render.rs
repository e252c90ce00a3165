use blog_builder_core::{Article, Site, ThemeOverride};

/// Cards shown when a site has no articles yet
const PLACEHOLDER_ARTICLES: [(&str, &str, &str); 3] = [
    ("第一篇：开篇词", "记录我的学习与成长路径。", "post-1"),
    ("第二篇：组件化思维", "谈谈前端组件设计与复用。", "post-2"),
    ("第三篇：AI辅助开发实践", "用AI提升效率的几个小技巧。", "post-3"),
];

const AUTHOR_LABEL: &str = "作者：";
const ABOUT_HEADING: &str = "关于我";
const CONTACT_LABEL: &str = "联系我";
const FOOTER_TEXT: &str = "Powered by Blog Builder";

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Card data for the grid: supplied articles, or the placeholders when empty
fn card_list(articles: &[Article]) -> Vec<Article> {
    if articles.is_empty() {
        PLACEHOLDER_ARTICLES
            .iter()
            .map(|(title, excerpt, slug)| Article::card(title, slug, excerpt))
            .collect()
    } else {
        articles.to_vec()
    }
}

fn render_card(article: &Article) -> String {
    format!(
        r##"
    <a class="post" href="#{}">
      <h3>{}</h3>
      <p>{}</p>
    </a>
  "##,
        html_escape(&article.slug),
        html_escape(&article.title),
        html_escape(&article.excerpt)
    )
}

/// Full body of the first article that has one
fn render_article_section(articles: &[Article]) -> String {
    match articles.iter().find(|a| !a.html.trim().is_empty()) {
        Some(article) => {
            let id = if article.slug.is_empty() {
                "article"
            } else {
                article.slug.as_str()
            };
            format!(
                r#"<section class="article" id="{}">{}</section>"#,
                html_escape(id),
                article.html
            )
        }
        None => String::new(),
    }
}

/// Render the complete single-page site.
///
/// The page is self-contained: every style is inlined and no external asset is
/// referenced. Output depends only on the inputs, so equal inputs give
/// byte-identical documents.
///
/// # Arguments
///
/// * `site` - Resolved site details, palette and articles
/// * `theme_override` - Per-key colour overrides merged over `site.tokens`
pub fn render_site(site: &Site, theme_override: &ThemeOverride) -> String {
    let palette = site.tokens.merged(theme_override);

    let root_vars: String = palette
        .css_properties()
        .iter()
        .map(|(name, value)| format!("{}:{};", name, value))
        .collect::<Vec<_>>()
        .join(" ");

    let cards: String = card_list(&site.articles).iter().map(render_card).collect();
    let article_section = render_article_section(&site.articles);

    let title = html_escape(&site.info.title);
    let author = html_escape(&site.info.author);
    let byline = match site.info.tagline.as_deref().filter(|t| !t.is_empty()) {
        Some(tagline) => format!("{}{} · {}", AUTHOR_LABEL, author, html_escape(tagline)),
        None => format!("{}{}", AUTHOR_LABEL, author),
    };
    let about = html_escape(site.info.about.as_deref().unwrap_or(""));

    format!(
        r##"<!doctype html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <style>
    :root {{ {root_vars} }}
    * {{ box-sizing: border-box; }}
    body {{ margin: 0; font-family: -apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial; background: var(--bg); color: var(--fg); }}
    a {{ color: inherit; text-decoration: none; }}
    header {{ padding: 40px 20px 16px; border-bottom: 1px solid var(--border); }}
    .container {{ max-width: 980px; margin: 0 auto; }}
    .title {{ font-size: 32px; font-weight: 700; }}
    .sub {{ color: var(--sub); margin-top: 8px; }}
    .grid {{ display: grid; gap: 16px; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); margin-top: 24px; }}
    .post {{ background: var(--card); border: 1px solid var(--border); padding: 16px; border-radius: 10px; transition: border .2s ease; }}
    .post:hover {{ border-color: var(--primary); }}
    .post h3 {{ margin: 0 0 8px; font-size: 18px; }}
    .post p {{ margin: 0; color: var(--sub); }}
    .about {{ background: var(--card); border: 1px solid var(--border); padding: 16px; border-radius: 10px; margin-top: 24px; }}
    footer {{ text-align: center; color: var(--sub); padding: 24px; }}
    .button {{ display: inline-block; background: var(--primary); color: #fff; padding: 10px 14px; border-radius: 8px; margin-top: 16px; }}
    .article {{ background: var(--card); border: 1px solid var(--border); padding: 16px; border-radius: 10px; margin-top: 24px; }}
    .article h1, .article h2, .article h3 {{ margin-top: 1.4em; }}
  </style>
</head>
<body>
  <header>
    <div class="container">
      <div class="title">{title}</div>
      <div class="sub">{byline}</div>
    </div>
  </header>
  <main>
    <div class="container">
      <section class="grid">{cards}</section>
      <section class="about">
        <h3>{about_heading}</h3>
        <p style="white-space:pre-wrap; line-height:1.8;">{about}</p>
        <a class="button" href="#">{contact}</a>
      </section>
      {article_section}
    </div>
  </main>
  <footer>{footer}</footer>
</body>
</html>
"##,
        title = title,
        root_vars = root_vars,
        byline = byline,
        cards = cards,
        about_heading = ABOUT_HEADING,
        about = about,
        contact = CONTACT_LABEL,
        article_section = article_section,
        footer = FOOTER_TEXT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_builder_core::{BasicInfo, ThemeName};

    fn site(articles: Vec<Article>) -> Site {
        Site {
            info: BasicInfo {
                title: "Ann's Log".to_string(),
                author: "Ann".to_string(),
                tagline: Some("notes".to_string()),
                about: Some("hi\nthere".to_string()),
            },
            tokens: ThemeName::Clean.palette(),
            articles,
        }
    }

    fn card_count(html: &str) -> usize {
        html.matches(r#"<a class="post""#).count()
    }

    /// Text between the about paragraph's opening and closing tags
    fn about_text(html: &str) -> &str {
        let open = r#"<p style="white-space:pre-wrap; line-height:1.8;">"#;
        let start = html.find(open).unwrap() + open.len();
        let end = start + html[start..].find("</p>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_cjk_title_and_byline_pass_through() {
        let mut s = site(vec![Article::card("第一章", "chapter-1", "开篇")]);
        s.info.title = "我的新博客".to_string();
        s.info.tagline = Some("学习 & 成长".to_string());
        let html = render_site(&s, &ThemeOverride::default());
        assert!(html.contains("<title>我的新博客</title>"));
        assert!(html.contains("作者：Ann · 学习 &amp; 成长"));
        assert!(html.contains("<h3>第一章</h3>"));
    }

    #[test]
    fn test_slug_cannot_break_out_of_attributes() {
        let articles = vec![Article {
            title: "Quoted".to_string(),
            slug: "a' onmouseover='x".to_string(),
            excerpt: String::new(),
            html: "<p>body</p>".to_string(),
        }];
        let html = render_site(&site(articles), &ThemeOverride::default());
        assert!(html.contains(r##"href="#a&#x27; onmouseover=&#x27;x""##));
        assert!(html.contains(r#"id="a&#x27; onmouseover=&#x27;x""#));
        assert!(!html.contains("onmouseover='x"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let s = site(vec![Article::card("One", "one", "first")]);
        let first = render_site(&s, &ThemeOverride::default());
        let second = render_site(&s, &ThemeOverride::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_articles_render_three_placeholders() {
        let html = render_site(&site(vec![]), &ThemeOverride::default());
        assert_eq!(card_count(&html), 3);
        assert!(html.contains(r##"href="#post-1""##));
        assert!(html.contains(r##"href="#post-3""##));
        assert!(!html.contains(r#"<section class="article""#));
    }

    #[test]
    fn test_supplied_articles_render_exactly() {
        let articles = vec![
            Article::card("Alpha", "alpha", "first post"),
            Article::card("Beta", "beta", "second post"),
        ];
        let html = render_site(&site(articles), &ThemeOverride::default());
        assert_eq!(card_count(&html), 2);
        assert!(html.contains(r##"href="#alpha""##));
        assert!(html.contains("<h3>Beta</h3>"));
        assert!(html.contains("<p>second post</p>"));
        assert!(!html.contains("post-1"));
    }

    #[test]
    fn test_override_changes_only_primary() {
        let s = site(vec![]);
        let over = ThemeOverride {
            primary: Some("#ff6b35".to_string()),
            ..Default::default()
        };
        let html = render_site(&s, &over);
        assert!(html.contains("--primary:#ff6b35;"));
        assert!(!html.contains("--primary:#007AFF;"));
        assert!(html.contains("--bg:#fff;"));
        assert!(html.contains("--fg:#000;"));
        assert!(html.contains("--sub:#8E8E93;"));
        assert!(html.contains("--card:#fff;"));
        assert!(html.contains("--border:#f0f0f0;"));
    }

    #[test]
    fn test_about_preserves_line_breaks() {
        let html = render_site(&site(vec![]), &ThemeOverride::default());
        assert_eq!(about_text(&html), "hi\nthere");
    }

    #[test]
    fn test_header_and_footer() {
        let html = render_site(&site(vec![]), &ThemeOverride::default());
        assert!(html.contains("<title>Ann&#x27;s Log</title>"));
        assert!(html.contains("作者：Ann · notes"));
        assert!(html.contains("<footer>Powered by Blog Builder</footer>"));
    }

    #[test]
    fn test_missing_optional_fields_render_empty() {
        let mut s = site(vec![]);
        s.info.tagline = None;
        s.info.about = None;
        let html = render_site(&s, &ThemeOverride::default());
        assert!(html.contains(r#"<div class="sub">作者：Ann</div>"#));
        assert_eq!(about_text(&html), "");
    }

    #[test]
    fn test_first_article_with_body_is_rendered_in_full() {
        let articles = vec![
            Article::card("Summary only", "summary-only", "no body"),
            Article {
                title: "Full".to_string(),
                slug: "full".to_string(),
                excerpt: "has body".to_string(),
                html: "<h1>Full</h1>\n<p>Body text</p>".to_string(),
            },
        ];
        let html = render_site(&site(articles), &ThemeOverride::default());
        assert!(html.contains(
            r#"<section class="article" id="full"><h1>Full</h1>
<p>Body text</p></section>"#
        ));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let articles = vec![Article::card("<b>bold</b>", "x\"y", "a & b")];
        let mut s = site(articles);
        s.info.author = "<script>".to_string();
        let html = render_site(&s, &ThemeOverride::default());
        assert!(html.contains("<h3>&lt;b&gt;bold&lt;/b&gt;</h3>"));
        assert!(html.contains(r##"href="#x&quot;y""##));
        assert!(html.contains("<p>a &amp; b</p>"));
        assert!(html.contains("作者：&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_no_external_references() {
        let html = render_site(&site(vec![]), &ThemeOverride::default());
        assert!(!html.contains("<link"));
        assert!(!html.contains("src="));
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }
}
