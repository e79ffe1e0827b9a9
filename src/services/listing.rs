//! In-memory filtering, sorting and pagination of the published post set.

use crate::models::BlogPost;
use crate::services::html;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

const MAX_RELATED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Featured,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "featured" => Ok(Self::Featured),
            _ => Err(()),
        }
    }
}

/// Query parameters of the public post list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// Unknown values fall back to newest first.
    pub fn sort_order(&self) -> SortOrder {
        self.sort
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn matches_search(post: &BlogPost, terms: &[String]) -> bool {
    let haystack = format!(
        "{}\n{}\n{}\n{}",
        post.title,
        post.excerpt,
        html::plain_text(&post.content),
        post.tags.join("\n")
    )
    .to_lowercase();
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

/// Applies the category, search and tag filters. Each filter is skipped when absent.
pub fn filter_posts(posts: Vec<BlogPost>, query: &ListQuery) -> Vec<BlogPost> {
    let category = active(&query.category).map(str::to_lowercase);
    let tag = active(&query.tag).map(str::to_lowercase);
    let terms: Vec<String> = query
        .search
        .as_deref()
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    posts
        .into_iter()
        .filter(|p| category.as_ref().map_or(true, |c| p.category_slug == *c))
        .filter(|p| {
            tag.as_ref()
                .map_or(true, |t| p.tags.iter().any(|pt| pt.to_lowercase() == *t))
        })
        .filter(|p| terms.is_empty() || matches_search(p, &terms))
        .collect()
}

fn newest_first(a: &BlogPost, b: &BlogPost) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

pub fn sort_posts(posts: &mut [BlogPost], order: SortOrder) {
    match order {
        SortOrder::Newest => posts.sort_by(newest_first),
        SortOrder::Oldest => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Featured => {
            posts.sort_by(|a, b| b.featured.cmp(&a.featured).then_with(|| newest_first(a, b)))
        }
    }
}

/// `page` is 1-based and clamped to at least 1; `per_page` to `1..=max_per_page`.
/// A page past the end yields no items but keeps the totals.
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: usize,
    max_per_page: usize,
) -> Page<T> {
    let max_per_page = max_per_page.max(1);
    let per_page = per_page
        .map(|n| n.clamp(1, max_per_page as i64) as usize)
        .unwrap_or_else(|| default_per_page.clamp(1, max_per_page));
    let page = page.unwrap_or(1).max(1) as usize;

    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        total,
        page,
        per_page,
        total_pages,
    }
}

/// Filter, sort and paginate in one pass over the published set.
pub fn list(
    posts: Vec<BlogPost>,
    query: &ListQuery,
    default_per_page: usize,
    max_per_page: usize,
) -> Page<BlogPost> {
    let mut filtered = filter_posts(posts, query);
    sort_posts(&mut filtered, query.sort_order());
    paginate(
        filtered,
        query.page,
        query.per_page,
        default_per_page,
        max_per_page,
    )
}

/// Up to three other posts from the same category, newest first.
pub fn related_posts(posts: &[BlogPost], post: &BlogPost) -> Vec<BlogPost> {
    let mut related: Vec<BlogPost> = posts
        .iter()
        .filter(|p| p.id != post.id && p.category_slug == post.category_slug)
        .cloned()
        .collect();
    related.sort_by(newest_first);
    related.truncate(MAX_RELATED);
    related
}
