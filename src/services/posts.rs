use crate::config::ContentConfig;
use crate::models::{Author, BlogPost, CategoryColor, CreatePost, PostScope, UpdatePost};
use crate::services::error::ContentError;
use crate::services::slug::{category_slug, generate_slug, unique_slug, validate_slug};
use crate::services::{html, tags};
use crate::Database;
use anyhow::Result;
use chrono::SecondsFormat;
use rusqlite::{Connection, OptionalExtension};

const MAX_TITLE_LENGTH: usize = 300;

const POST_COLUMNS: &str = "id, slug, title, excerpt, content, cover_image, category, category_slug, category_color, tags, published, featured, reading_time, author, created_at, updated_at";

/// Values filled in when a create request leaves them out.
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub category: String,
    pub category_color: CategoryColor,
    pub author: Author,
    pub excerpt_length: usize,
}

impl From<&ContentConfig> for PostDefaults {
    fn from(config: &ContentConfig) -> Self {
        Self {
            category: config.default_category.clone(),
            category_color: config.default_category_color,
            author: Author {
                name: config.default_author.name.clone(),
                bio: config.default_author.bio.clone(),
                avatar: config.default_author.avatar.clone(),
            },
            excerpt_length: config.excerpt_length,
        }
    }
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self::from(&ContentConfig::default())
    }
}

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ContentError::validation("title cannot be empty").into());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ContentError::validation(format!(
            "title must be {} characters or less",
            MAX_TITLE_LENGTH
        ))
        .into());
    }
    Ok(title.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Category name, slug and color for a post. Known categories win; unknown names
/// keep the submitted spelling and get the default color.
fn resolve_category(
    conn: &Connection,
    name: &str,
    defaults: &PostDefaults,
) -> Result<(String, String, CategoryColor)> {
    let name = name.trim();
    let name = if name.is_empty() {
        defaults.category.as_str()
    } else {
        name
    };
    let slug = category_slug(name);

    let known: Option<(String, String)> = conn
        .query_row(
            "SELECT name, color FROM categories WHERE slug = ?",
            [&slug],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(match known {
        Some((known_name, color)) => (
            known_name,
            slug,
            color.parse().unwrap_or(defaults.category_color),
        ),
        None => (name.to_string(), slug, defaults.category_color),
    })
}

fn slug_taken(conn: &Connection, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM blog_posts WHERE slug = ?1 AND id != COALESCE(?2, '')",
        rusqlite::params![slug, exclude_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn create_post(db: &Database, input: CreatePost, defaults: &PostDefaults) -> Result<BlogPost> {
    let title = validate_title(&input.title)?;
    let conn = db.get()?;

    let slug = match non_blank(input.slug) {
        Some(slug) => {
            if !validate_slug(&slug) {
                return Err(ContentError::InvalidSlug(slug).into());
            }
            if slug_taken(&conn, &slug, None)? {
                return Err(ContentError::DuplicateSlug(slug).into());
            }
            slug
        }
        None => {
            let base = generate_slug(&title);
            if base.is_empty() {
                return Err(ContentError::validation(
                    "title must contain at least one letter or digit",
                )
                .into());
            }
            unique_slug(&base, |candidate| slug_taken(&conn, candidate, None))?
        }
    };

    let content = html::sanitize(&input.content);
    let excerpt = non_blank(input.excerpt)
        .unwrap_or_else(|| html::generate_excerpt(&content, defaults.excerpt_length));
    let (category, cat_slug, color) = resolve_category(
        &conn,
        input.category.as_deref().unwrap_or_default(),
        defaults,
    )?;
    let tags = tags::normalize_tags(&input.tags);
    let author = input.author.unwrap_or_else(|| defaults.author.clone());
    let now = timestamp();

    let post = BlogPost {
        id: uuid::Uuid::new_v4().to_string(),
        slug,
        title,
        excerpt,
        reading_time: html::reading_time(&content),
        content,
        cover_image: non_blank(input.cover_image),
        category,
        category_slug: cat_slug,
        category_color: color,
        tags,
        published: input.published,
        featured: input.featured,
        author: Some(author),
        created_at: now.clone(),
        updated_at: now,
    };

    insert_post(&conn, &post)?;
    tracing::debug!("Created post {} ({})", post.id, post.slug);
    Ok(post)
}

pub(crate) fn insert_post(conn: &Connection, post: &BlogPost) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO blog_posts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            POST_COLUMNS
        ),
        rusqlite::params![
            post.id,
            post.slug,
            post.title,
            post.excerpt,
            post.content,
            post.cover_image,
            post.category,
            post.category_slug,
            post.category_color.as_str(),
            serde_json::to_string(&post.tags)?,
            post.published,
            post.featured,
            post.reading_time,
            post.author.as_ref().map(serde_json::to_string).transpose()?,
            post.created_at,
            post.updated_at,
        ],
    )?;
    Ok(())
}

/// Partial update: only fields present in `input` change. Last write wins.
pub fn update_post(
    db: &Database,
    id: &str,
    input: UpdatePost,
    defaults: &PostDefaults,
) -> Result<BlogPost> {
    let conn = db.get()?;
    let mut post = fetch_post(&conn, "id", id)?.ok_or(ContentError::NotFound("post"))?;

    if let Some(title) = input.title {
        post.title = validate_title(&title)?;
    }

    if let Some(slug) = non_blank(input.slug) {
        if slug != post.slug {
            if !validate_slug(&slug) {
                return Err(ContentError::InvalidSlug(slug).into());
            }
            if slug_taken(&conn, &slug, Some(id))? {
                return Err(ContentError::DuplicateSlug(slug).into());
            }
            post.slug = slug;
        }
    }

    if let Some(content) = input.content {
        post.content = html::sanitize(&content);
        post.reading_time = html::reading_time(&post.content);
    }

    match input.excerpt {
        Some(excerpt) if !excerpt.trim().is_empty() => post.excerpt = excerpt.trim().to_string(),
        Some(_) => post.excerpt = html::generate_excerpt(&post.content, defaults.excerpt_length),
        None => {}
    }

    if let Some(cover) = input.cover_image {
        post.cover_image = non_blank(Some(cover));
    }

    if let Some(category) = input.category {
        let (name, slug, color) = resolve_category(&conn, &category, defaults)?;
        post.category = name;
        post.category_slug = slug;
        post.category_color = color;
    }

    if let Some(tags) = input.tags {
        post.tags = tags::normalize_tags(&tags);
    }

    if let Some(published) = input.published {
        post.published = published;
    }
    if let Some(featured) = input.featured {
        post.featured = featured;
    }
    if let Some(author) = input.author {
        post.author = Some(author);
    }

    post.updated_at = timestamp();

    conn.execute(
        r#"
        UPDATE blog_posts SET slug = ?1, title = ?2, excerpt = ?3, content = ?4, cover_image = ?5,
            category = ?6, category_slug = ?7, category_color = ?8, tags = ?9, published = ?10,
            featured = ?11, reading_time = ?12, author = ?13, updated_at = ?14
        WHERE id = ?15
        "#,
        rusqlite::params![
            post.slug,
            post.title,
            post.excerpt,
            post.content,
            post.cover_image,
            post.category,
            post.category_slug,
            post.category_color.as_str(),
            serde_json::to_string(&post.tags)?,
            post.published,
            post.featured,
            post.reading_time,
            post.author.as_ref().map(serde_json::to_string).transpose()?,
            post.updated_at,
            id,
        ],
    )?;

    Ok(post)
}

/// Returns `false` when no post had this id.
pub fn delete_post(db: &Database, id: &str) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM blog_posts WHERE id = ?", [id])?;
    Ok(affected > 0)
}

pub fn get_post(db: &Database, id: &str) -> Result<Option<BlogPost>> {
    let conn = db.get()?;
    fetch_post(&conn, "id", id)
}

pub fn get_post_by_slug(db: &Database, slug: &str) -> Result<Option<BlogPost>> {
    let conn = db.get()?;
    fetch_post(&conn, "slug", slug)
}

pub fn list_posts(db: &Database, scope: PostScope) -> Result<Vec<BlogPost>> {
    let conn = db.get()?;
    let filter = match scope {
        PostScope::All => "",
        PostScope::Published => "WHERE published = 1",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM blog_posts {} ORDER BY created_at DESC, rowid DESC",
        POST_COLUMNS, filter
    ))?;
    let posts = stmt
        .query_map([], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn count_posts(db: &Database, scope: PostScope) -> Result<i64> {
    let conn = db.get()?;
    let sql = match scope {
        PostScope::All => "SELECT COUNT(*) FROM blog_posts",
        PostScope::Published => "SELECT COUNT(*) FROM blog_posts WHERE published = 1",
    };
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

fn fetch_post(conn: &Connection, column: &str, value: &str) -> Result<Option<BlogPost>> {
    let post = conn
        .query_row(
            &format!("SELECT {} FROM blog_posts WHERE {} = ?", POST_COLUMNS, column),
            [value],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<BlogPost> {
    let tags: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(9)?).unwrap_or_default();
    let author: Option<Author> = row
        .get::<_, Option<String>>(13)?
        .and_then(|raw| serde_json::from_str(&raw).ok());

    Ok(BlogPost {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        cover_image: row.get(5)?,
        category: row.get(6)?,
        category_slug: row.get(7)?,
        category_color: row
            .get::<_, String>(8)?
            .parse()
            .unwrap_or_default(),
        tags,
        published: row.get(10)?,
        featured: row.get(11)?,
        reading_time: row.get(12)?,
        author,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}
