//! Template resolution: template id or free-text prompt to palette + site details.
//!
//! Resolution never fails. Anything that cannot be recognised falls back to a
//! documented default.

use blog_builder_core::{Article, BasicInfo, DraftInfo, Site, ThemeName, ThemeTokens};
use regex::Regex;
use std::sync::LazyLock;

/// Checked first: a prompt mentioning both dark and light words is dark.
const DARK_WORDS: &[&str] = &["深色", "暗色", "夜间", "dark", "night"];
const LIGHT_WORDS: &[&str] = &["白", "light", "简洁", "极简", "minimal", "clean"];

// ASCII word characters plus the basic CJK block
const NAME_TOKEN: &str = r"[0-9A-Za-z_\x{4e00}-\x{9fa5}]";

static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:作者|author)\s*[:：]?\s*({NAME_TOKEN}+)"))
        .expect("author pattern is valid")
});

static LABELLED_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:博客|站点|网站|blog|site|website)?\s*(?:名称|标题|name|title)\s*[:：]\s*({NAME_TOKEN}{{2,20}})"
    ))
    .expect("labelled title pattern is valid")
});

static LOOSE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:博客|站点|网站)?(?:名称|标题)?[:：]?({NAME_TOKEN}{{2,20}})"
    ))
    .expect("loose title pattern is valid")
});

/// Outcome of template resolution: everything except the articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub theme: ThemeName,
    pub tokens: ThemeTokens,
    pub info: BasicInfo,
}

impl Resolved {
    pub fn into_site(self, articles: Vec<Article>) -> Site {
        Site {
            info: self.info,
            tokens: self.tokens,
            articles,
        }
    }
}

/// Resolve an explicit template id. Unknown ids select `clean`.
pub fn resolve_template(draft: &DraftInfo, template_id: &str) -> Resolved {
    let theme = ThemeName::from_template_id(template_id);
    log::debug!("template '{}' resolved to theme '{}'", template_id, theme);

    Resolved {
        theme,
        tokens: theme.palette(),
        info: draft.complete(),
    }
}

/// Resolve a free-text description of the desired blog.
///
/// The whole prompt becomes the about text; the tagline stays empty.
pub fn resolve_prompt(prompt: &str) -> Resolved {
    let theme = theme_from_prompt(prompt);
    let draft = DraftInfo {
        title: extract_title(prompt),
        author: extract_author(prompt),
        tagline: None,
        about: Some(prompt.to_string()),
    };
    log::debug!("prompt resolved to theme '{}', draft {:?}", theme, draft);

    Resolved {
        theme,
        tokens: theme.palette(),
        info: draft.complete(),
    }
}

/// Keyword test: dark vocabulary, then light vocabulary, then `magazine`.
pub fn theme_from_prompt(prompt: &str) -> ThemeName {
    let lower = prompt.to_lowercase();
    if DARK_WORDS.iter().any(|w| lower.contains(w)) {
        ThemeName::Dark
    } else if LIGHT_WORDS.iter().any(|w| lower.contains(w)) {
        ThemeName::Clean
    } else {
        ThemeName::Magazine
    }
}

/// Name token following "作者" / "author", if any
pub fn extract_author(prompt: &str) -> Option<String> {
    AUTHOR_RE
        .captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Site name: an explicitly labelled title wins, otherwise the first 2-20
/// character word run in the prompt.
pub fn extract_title(prompt: &str) -> Option<String> {
    LABELLED_TITLE_RE
        .captures(prompt)
        .or_else(|| LOOSE_TITLE_RE.captures(prompt))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_builder_core::{DEFAULT_AUTHOR, DEFAULT_TITLE};

    #[test]
    fn test_dark_beats_light() {
        assert_eq!(theme_from_prompt("一个极简的博客，主题深色"), ThemeName::Dark);
        assert_eq!(theme_from_prompt("a minimal blog with a dark theme"), ThemeName::Dark);
        assert_eq!(theme_from_prompt("Light by day, NIGHT by night"), ThemeName::Dark);
    }

    #[test]
    fn test_light_words_select_clean() {
        assert_eq!(theme_from_prompt("简洁的个人主页"), ThemeName::Clean);
        assert_eq!(theme_from_prompt("A Minimal portfolio"), ThemeName::Clean);
    }

    #[test]
    fn test_fallback_is_magazine_not_clean() {
        assert_eq!(theme_from_prompt("a travel journal"), ThemeName::Magazine);
        assert_eq!(theme_from_prompt(""), ThemeName::Magazine);
    }

    #[test]
    fn test_extract_author() {
        assert_eq!(
            extract_author("一个极简的技术博客，作者Ann，主题深色").as_deref(),
            Some("Ann")
        );
        assert_eq!(extract_author("作者：小明 的日记").as_deref(), Some("小明"));
        assert_eq!(extract_author("Author: Grace about compilers").as_deref(), Some("Grace"));
        assert_eq!(extract_author("no name given"), None);
    }

    #[test]
    fn test_extract_title_prefers_labelled_form() {
        assert_eq!(
            extract_title("做一个技术站，博客名称：星辰笔记，作者Ann").as_deref(),
            Some("星辰笔记")
        );
        assert_eq!(extract_title("a dark blog, title: Nightfall").as_deref(), Some("Nightfall"));
    }

    #[test]
    fn test_extract_title_loose_form() {
        assert_eq!(
            extract_title("一个极简的技术博客，作者Ann").as_deref(),
            Some("一个极简的技术博客")
        );
        assert_eq!(extract_title("!!! ? ."), None);
        assert_eq!(extract_title("a"), None);
    }

    #[test]
    fn test_resolve_prompt_applies_defaults() {
        let resolved = resolve_prompt("??");
        assert_eq!(resolved.theme, ThemeName::Magazine);
        assert_eq!(resolved.info.title, DEFAULT_TITLE);
        assert_eq!(resolved.info.author, DEFAULT_AUTHOR);
        assert_eq!(resolved.info.tagline, None);
        assert_eq!(resolved.info.about.as_deref(), Some("??"));
        assert_eq!(resolved.tokens, ThemeName::Magazine.palette());
    }

    #[test]
    fn test_resolve_prompt_full() {
        let prompt = "一个极简的技术博客，作者Ann，主题深色，简介记录AI与Web开发";
        let resolved = resolve_prompt(prompt);
        assert_eq!(resolved.theme, ThemeName::Dark);
        assert_eq!(resolved.info.author, "Ann");
        assert_eq!(resolved.info.title, "一个极简的技术博客");
        assert_eq!(resolved.info.about.as_deref(), Some(prompt));
    }

    #[test]
    fn test_resolve_template_unknown_id_is_clean() {
        let draft = DraftInfo {
            title: Some("Ann's Log".to_string()),
            ..Default::default()
        };
        let resolved = resolve_template(&draft, "brutalist");
        assert_eq!(resolved.theme, ThemeName::Clean);
        assert_eq!(resolved.tokens, ThemeName::Clean.palette());
        assert_eq!(resolved.info.title, "Ann's Log");
        assert_eq!(resolved.info.author, DEFAULT_AUTHOR);
    }
}
