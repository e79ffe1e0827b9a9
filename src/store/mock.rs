use super::ContentStore;
use crate::models::{
    Author, BlogPost, Category, CategoryColor, CreateCategory, CreatePost, PostScope,
    UpdateCategory, UpdatePost,
};
use crate::services::error::ContentError;
use crate::services::html;
use crate::services::slug::category_slug;
use anyhow::Result;
use once_cell::sync::Lazy;

const MOCK_CREATED_AT: &str = "2024-01-01T00:00:00.000Z";

struct MockPost {
    id: &'static str,
    slug: &'static str,
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    cover_image: Option<&'static str>,
    category: &'static str,
    tags: &'static [&'static str],
    published: bool,
    featured: bool,
    created_at: &'static str,
}

const MOCK_CATEGORIES: [(&str, &str, CategoryColor, &str); 3] = [
    (
        "mock-cat-web",
        "Web Development",
        CategoryColor::Blue,
        "Building for the browser and the server behind it.",
    ),
    (
        "mock-cat-design",
        "Design",
        CategoryColor::Purple,
        "Interfaces, typography and visual systems.",
    ),
    (
        "mock-cat-career",
        "Career",
        CategoryColor::Green,
        "Notes on working in software.",
    ),
];

const MOCK_POSTS: [MockPost; 4] = [
    MockPost {
        id: "mock-post-1",
        slug: "building-a-portfolio-that-lasts",
        title: "Building a Portfolio That Lasts",
        excerpt: "What I learned rebuilding my personal site for the third time.",
        content: "<p>Every few years I rebuild this site. This time the goal was simple: fewer moving parts and content that outlives the framework.</p><h2>Keep content portable</h2><p>Posts live in one table with plain HTML bodies, so moving them is a single export.</p>",
        cover_image: Some("/images/blog/portfolio.jpg"),
        category: "Web Development",
        tags: &["portfolio", "architecture", "react"],
        published: true,
        featured: true,
        created_at: "2024-03-12T09:00:00.000Z",
    },
    MockPost {
        id: "mock-post-2",
        slug: "designing-with-a-fixed-palette",
        title: "Designing With a Fixed Palette",
        excerpt: "Ten colors are enough for a blog. Here is how I chose them.",
        content: "<p>A small palette forces decisions early. Each category gets one color and keeps it everywhere it appears.</p>",
        cover_image: None,
        category: "Design",
        tags: &["design", "color"],
        published: true,
        featured: false,
        created_at: "2024-02-20T14:30:00.000Z",
    },
    MockPost {
        id: "mock-post-3",
        slug: "from-freelance-to-full-time",
        title: "From Freelance to Full-Time",
        excerpt: "Trading variety for depth, and why it was worth it.",
        content: "<p>After four years of freelance work I joined a product team. The biggest change was owning things for longer than a contract.</p>",
        cover_image: Some("/images/blog/career.jpg"),
        category: "Career",
        tags: &["career", "freelance"],
        published: true,
        featured: false,
        created_at: "2024-01-15T08:15:00.000Z",
    },
    MockPost {
        id: "mock-post-4",
        slug: "draft-notes-on-caching",
        title: "Draft: Notes on Caching",
        excerpt: "Stale-while-revalidate, explained with a coffee machine.",
        content: "<p>Unfinished.</p>",
        cover_image: None,
        category: "Web Development",
        tags: &["caching", "performance"],
        published: false,
        featured: false,
        created_at: "2024-04-01T10:00:00.000Z",
    },
];

fn mock_author() -> Author {
    Author {
        name: "Site Owner".to_string(),
        bio: Some("Developer and occasional writer.".to_string()),
        avatar: None,
    }
}

static POSTS: Lazy<Vec<BlogPost>> = Lazy::new(|| {
    MOCK_POSTS
        .iter()
        .map(|p| {
            let color = MOCK_CATEGORIES
                .iter()
                .find(|(_, name, _, _)| *name == p.category)
                .map(|(_, _, color, _)| *color)
                .unwrap_or_default();
            BlogPost {
                id: p.id.to_string(),
                slug: p.slug.to_string(),
                title: p.title.to_string(),
                excerpt: p.excerpt.to_string(),
                content: p.content.to_string(),
                cover_image: p.cover_image.map(String::from),
                category: p.category.to_string(),
                category_slug: category_slug(p.category),
                category_color: color,
                tags: p.tags.iter().map(|t| t.to_string()).collect(),
                published: p.published,
                featured: p.featured,
                reading_time: html::reading_time(p.content),
                author: Some(mock_author()),
                created_at: p.created_at.to_string(),
                updated_at: p.created_at.to_string(),
            }
        })
        .collect()
});

static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    MOCK_CATEGORIES
        .iter()
        .map(|(id, name, color, description)| {
            let slug = category_slug(name);
            let post_count = POSTS
                .iter()
                .filter(|p| p.published && p.category_slug == slug)
                .count() as i64;
            Category {
                id: id.to_string(),
                name: name.to_string(),
                slug,
                color: *color,
                description: Some(description.to_string()),
                post_count,
                created_at: MOCK_CREATED_AT.to_string(),
                updated_at: MOCK_CREATED_AT.to_string(),
            }
        })
        .collect()
});

/// The hardcoded sample posts, newest first.
pub fn posts() -> Vec<BlogPost> {
    let mut posts = POSTS.clone();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

pub fn categories() -> Vec<Category> {
    CATEGORIES.clone()
}

/// Read-only store over the sample dataset.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockStore;

impl ContentStore for MockStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn list_posts(&self, scope: PostScope) -> Result<Vec<BlogPost>> {
        Ok(posts()
            .into_iter()
            .filter(|p| scope == PostScope::All || p.published)
            .collect())
    }

    fn get_post(&self, id: &str) -> Result<Option<BlogPost>> {
        Ok(POSTS.iter().find(|p| p.id == id).cloned())
    }

    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(POSTS.iter().find(|p| p.slug == slug).cloned())
    }

    fn create_post(&self, _input: CreatePost) -> Result<BlogPost> {
        Err(ContentError::ReadOnly.into())
    }

    fn update_post(&self, _id: &str, _input: UpdatePost) -> Result<BlogPost> {
        Err(ContentError::ReadOnly.into())
    }

    fn delete_post(&self, _id: &str) -> Result<bool> {
        Err(ContentError::ReadOnly.into())
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(categories())
    }

    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        Ok(CATEGORIES.iter().find(|c| c.id == id).cloned())
    }

    fn create_category(&self, _input: CreateCategory) -> Result<Category> {
        Err(ContentError::ReadOnly.into())
    }

    fn update_category(&self, _id: &str, _input: UpdateCategory) -> Result<Category> {
        Err(ContentError::ReadOnly.into())
    }

    fn delete_category(&self, _id: &str) -> Result<bool> {
        Err(ContentError::ReadOnly.into())
    }
}
