use once_cell::sync::Lazy;
use regex::Regex;
use slug::slugify;

pub const MAX_SLUG_LENGTH: usize = 200;
const MAX_SUFFIX: u32 = 1000;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_ ]+").expect("valid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("valid regex"));

/// Post slug from a title. Transliterates to ASCII, so the result always validates
/// unless the title has no letters or digits at all.
pub fn generate_slug(title: &str) -> String {
    let mut slug = slugify(title);
    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Category slug: lowercase, strip non-word characters, spaces become hyphens.
pub fn category_slug(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    let hyphenated = SPACES.replace_all(stripped.trim(), "-");
    hyphenated.into_owned()
}

pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// First of `base`, `base-2`, `base-3`, ... for which `taken` is false.
pub fn unique_slug<F>(base: &str, mut taken: F) -> anyhow::Result<String>
where
    F: FnMut(&str) -> anyhow::Result<bool>,
{
    if !taken(base)? {
        return Ok(base.to_string());
    }
    for n in 2..=MAX_SUFFIX {
        let suffix = format!("-{}", n);
        let mut stem = base.to_string();
        stem.truncate(MAX_SLUG_LENGTH.saturating_sub(suffix.len()));
        let candidate = format!("{}{}", stem.trim_end_matches('-'), suffix);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
    }
    anyhow::bail!("no free slug for '{}' after {} attempts", base, MAX_SUFFIX)
}
