use crate::models::{BlogPost, TagsInput};
use serde::Serialize;
use std::collections::HashMap;

pub const MAX_TAG_LENGTH: usize = 50;

/// Trimmed, non-empty, first occurrence wins. Comparison for duplicates is case-insensitive.
pub fn normalize_tags(input: &TagsInput) -> Vec<String> {
    let raw: Vec<&str> = match input {
        TagsInput::Empty => Vec::new(),
        TagsInput::Text(s) => s.split(',').collect(),
        TagsInput::List(items) => items.iter().map(String::as_str).collect(),
    };

    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(MAX_TAG_LENGTH).collect::<String>())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Tag usage over the given posts, most used first, then by name.
pub fn tag_counts(posts: &[BlogPost]) -> Vec<TagCount> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            let entry = counts
                .entry(tag.to_lowercase())
                .or_insert_with(|| (tag.clone(), 0));
            entry.1 += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_values()
        .map(|(name, count)| TagCount { name, count })
        .collect();
    tags.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    tags
}
