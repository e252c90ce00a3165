//! Text helpers shared by the importer, renderer and uploader.

/// Maximum length of a card excerpt, in characters
pub const EXCERPT_CHARS: usize = 120;

const SUMMARY_WORDS: usize = 30;
const SUMMARY_CHARS: usize = 100;

/// CJK Unified Ideographs, basic block
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Derive a URL-safe slug from a title.
///
/// Lower-cases the input, collapses every run of characters other than ASCII
/// letters/digits and CJK ideographs into a single `-`, and trims hyphens from
/// both ends.
///
/// ```text
/// slugify("Hello, World! 2024")  → "hello-world-2024"
/// slugify("我的 第一篇")           → "我的-第一篇"
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || is_cjk(c) {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn remove_tags(html: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push_str(replacement);
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Plain text of an HTML fragment: tags dropped, basic entities decoded,
/// whitespace collapsed to single spaces.
pub fn strip_html(html: &str) -> String {
    let text = decode_entities(&remove_tags(html, " "));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Card excerpt: the first `max_chars` characters of the plain text
pub fn excerpt(html: &str, max_chars: usize) -> String {
    strip_html(html).chars().take(max_chars).collect()
}

/// Short summary of free-form content, used when a bundle article has no excerpt.
///
/// Keeps the first 30 words; anything over 100 characters is cut and marked
/// with `...`.
pub fn summarize(content: &str) -> String {
    let clean = remove_tags(content, "");
    let joined = clean
        .split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let words: Vec<&str> = joined.split(' ').take(SUMMARY_WORDS).collect();
    let summary = words.join(" ");

    if summary.chars().count() > SUMMARY_CHARS {
        let cut: String = summary.chars().take(SUMMARY_CHARS).collect();
        format!("{}...", cut)
    } else {
        summary
    }
}
