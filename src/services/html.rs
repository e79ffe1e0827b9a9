use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const WORDS_PER_MINUTE: usize = 200;

static SANITIZER: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut tags = ammonia::Builder::default().clone_tags();
    for tag in [
        "pre", "code", "span", "table", "thead", "tbody", "tr", "th", "td", "del", "figure",
        "figcaption", "picture", "source", "video", "iframe",
    ] {
        tags.insert(tag);
    }

    let mut attrs = ammonia::Builder::default().clone_tag_attributes();
    attrs.insert("span", ["class"].into_iter().collect());
    attrs.insert("code", ["class"].into_iter().collect());
    attrs.insert(
        "img",
        ["src", "alt", "title", "width", "height", "loading"]
            .into_iter()
            .collect(),
    );
    attrs.insert(
        "source",
        ["src", "srcset", "type", "media"].into_iter().collect(),
    );
    attrs.insert(
        "video",
        ["src", "controls", "poster", "width", "height", "preload"]
            .into_iter()
            .collect(),
    );
    attrs.insert(
        "iframe",
        ["src", "width", "height", "allowfullscreen", "title"]
            .into_iter()
            .collect(),
    );
    for h in ["h1", "h2", "h3", "h4", "h5", "h6"] {
        attrs.insert(h, ["id"].into_iter().collect());
    }

    let mut builder = ammonia::Builder::default();
    builder.tags(tags).tag_attributes(attrs);
    builder
});

static BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|blockquote|pre|tr|td|th|figcaption)>|<br\s*/?>")
        .expect("valid regex")
});

static TEXT_ONLY: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut builder = ammonia::Builder::default();
    builder.tags(HashSet::new()).clean_content_tags(
        ["script", "style"].into_iter().collect(),
    );
    builder
});

/// Sanitizes rich-text post content, keeping formatting and media embeds.
pub fn sanitize(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Visible text of an HTML fragment with whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let spaced = BLOCK_END.replace_all(html, "$0 ");
    let cleaned = TEXT_ONLY.clean(&spaced).to_string();
    let decoded = cleaned
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn generate_excerpt(html: &str, max_len: usize) -> String {
    let text = plain_text(html);

    if text.chars().count() <= max_len {
        return text;
    }

    let truncated: String = text.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &truncated[..pos]),
        _ => format!("{}...", truncated),
    }
}

/// Minutes to read at 200 words per minute, never less than one.
pub fn reading_time(html: &str) -> u32 {
    let words = plain_text(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}
