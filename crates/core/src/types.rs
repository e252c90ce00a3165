use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder title used when no site name is supplied
pub const DEFAULT_TITLE: &str = "我的新博客";

/// Placeholder author used when no author is supplied
pub const DEFAULT_AUTHOR: &str = "作者";

/// Named template preset selecting a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Clean,
    Dark,
    Magazine,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Clean, ThemeName::Dark, ThemeName::Magazine];

    /// Map a template identifier to a theme. Unknown identifiers fall back to `Clean`.
    pub fn from_template_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "dark" => ThemeName::Dark,
            "magazine" => ThemeName::Magazine,
            _ => ThemeName::Clean,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Clean => "clean",
            ThemeName::Dark => "dark",
            ThemeName::Magazine => "magazine",
        }
    }

    /// The fixed palette for this preset
    pub fn palette(&self) -> ThemeTokens {
        match self {
            ThemeName::Dark => ThemeTokens::new("#000", "#fff", "#8E8E93", "#007AFF", "#111", "#1f1f1f"),
            ThemeName::Magazine => {
                ThemeTokens::new("#fafafa", "#000", "#8E8E93", "#007AFF", "#fff", "#eaeaea")
            }
            ThemeName::Clean => ThemeTokens::new("#fff", "#000", "#8E8E93", "#007AFF", "#fff", "#f0f0f0"),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six colours that drive the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTokens {
    #[serde(alias = "bg")]
    pub background: String,
    #[serde(alias = "fg")]
    pub foreground: String,
    #[serde(alias = "sub")]
    pub subtext: String,
    pub primary: String,
    pub card: String,
    pub border: String,
}

impl ThemeTokens {
    pub fn new(
        background: &str,
        foreground: &str,
        subtext: &str,
        primary: &str,
        card: &str,
        border: &str,
    ) -> Self {
        Self {
            background: background.to_string(),
            foreground: foreground.to_string(),
            subtext: subtext.to_string(),
            primary: primary.to_string(),
            card: card.to_string(),
            border: border.to_string(),
        }
    }

    /// Apply an override on top of this palette. Present, safe values win key-by-key.
    pub fn merged(&self, theme_override: &ThemeOverride) -> ThemeTokens {
        let pick = |base: &String, over: &Option<String>| -> String {
            match over {
                Some(value) if is_safe_css_value(value) => value.trim().to_string(),
                Some(value) => {
                    log::warn!("ignoring unsafe theme override value {:?}", value);
                    base.clone()
                }
                None => base.clone(),
            }
        };

        ThemeTokens {
            background: pick(&self.background, &theme_override.background),
            foreground: pick(&self.foreground, &theme_override.foreground),
            subtext: pick(&self.subtext, &theme_override.subtext),
            primary: pick(&self.primary, &theme_override.primary),
            card: pick(&self.card, &theme_override.card),
            border: pick(&self.border, &theme_override.border),
        }
    }

    /// (css custom property, value) pairs in render order
    pub fn css_properties(&self) -> [(&'static str, &str); 6] {
        [
            ("--bg", &self.background),
            ("--fg", &self.foreground),
            ("--sub", &self.subtext),
            ("--primary", &self.primary),
            ("--card", &self.card),
            ("--border", &self.border),
        ]
    }
}

impl Default for ThemeTokens {
    fn default() -> Self {
        ThemeName::Clean.palette()
    }
}

/// Partial palette, e.g. from a colour picker or the `[theme]` table of blog.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeOverride {
    #[serde(alias = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(alias = "fg", skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(alias = "sub", skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

impl ThemeOverride {
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_none())
    }

    /// (field name, value) pairs, used for validation messages
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("background", self.background.as_deref()),
            ("foreground", self.foreground.as_deref()),
            ("subtext", self.subtext.as_deref()),
            ("primary", self.primary.as_deref()),
            ("card", self.card.as_deref()),
            ("border", self.border.as_deref()),
        ]
    }
}

/// A value may be placed inside the inline `<style>` block only if it cannot
/// terminate the declaration or the element.
pub fn is_safe_css_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && value.len() <= 64
        && !value
            .chars()
            .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\') || c.is_control())
}

/// Site details after defaults have been applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

/// Site details as supplied by a form, config file or prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl DraftInfo {
    /// Fill missing or blank fields with the documented placeholders
    pub fn complete(&self) -> BasicInfo {
        let non_blank = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

        BasicInfo {
            title: non_blank(&self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: non_blank(&self.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tagline: non_blank(&self.tagline),
            about: self.about.clone().filter(|s| !s.is_empty()),
        }
    }
}

/// One blog post: card metadata plus optional rendered body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub html: String,
}

impl Article {
    /// Summary-only article with no body
    pub fn card(title: &str, slug: &str, excerpt: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: excerpt.to_string(),
            html: String::new(),
        }
    }
}

/// Everything the renderer needs for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub info: BasicInfo,
    pub tokens: ThemeTokens,
    pub articles: Vec<Article>,
}

/// A file shipped next to index.html under `assets/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Path relative to `assets/`, forward slashes
    pub path: String,
    pub content: Vec<u8>,
}

impl Asset {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Request sent to a content service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Structured bundle returned by a content service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogContent {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub articles: Vec<ContentArticle>,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub style: String,
}

/// Article as delivered by a content service; `content` is Markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentArticle {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
}

/// Where an uploaded object ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
    pub key: String,
    pub etag: String,
}
