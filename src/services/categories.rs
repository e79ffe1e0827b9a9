use crate::models::{Category, CategoryColor, CreateCategory, UpdateCategory};
use crate::services::error::ContentError;
use crate::services::posts::timestamp;
use crate::services::slug::category_slug;
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

const MAX_NAME_LENGTH: usize = 100;

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.slug, c.color, c.description, c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM blog_posts p WHERE p.category_slug = c.slug AND p.published = 1) AS post_count
    FROM categories c
"#;

fn validate_name(name: &str) -> Result<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContentError::validation("category name cannot be empty").into());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ContentError::validation(format!(
            "category name must be {} characters or less",
            MAX_NAME_LENGTH
        ))
        .into());
    }
    let slug = category_slug(name);
    if slug.is_empty() {
        return Err(ContentError::validation(
            "category name must contain at least one letter or digit",
        )
        .into());
    }
    Ok((name.to_string(), slug))
}

fn name_taken(conn: &Connection, name: &str, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE (lower(name) = lower(?1) OR slug = ?2) AND id != COALESCE(?3, '')",
        rusqlite::params![name, slug, exclude_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn create_category(
    db: &Database,
    input: CreateCategory,
    default_color: CategoryColor,
) -> Result<Category> {
    let (name, slug) = validate_name(&input.name)?;
    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let conn = &tx;

    if name_taken(conn, &name, &slug, None)? {
        return Err(ContentError::DuplicateCategory(name).into());
    }

    let now = timestamp();
    let category = Category {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        slug,
        color: input.color.unwrap_or(default_color),
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        post_count: 0,
        created_at: now.clone(),
        updated_at: now,
    };

    insert_category(conn, &category)?;

    // Posts written before the category existed pick up its canonical name and color.
    conn.execute(
        "UPDATE blog_posts SET category = ?1, category_color = ?2 WHERE category_slug = ?3",
        (&category.name, category.color.as_str(), &category.slug),
    )?;

    let created = fetch_category(conn, &category.id)?.ok_or(ContentError::NotFound("category"))?;
    tx.commit()?;
    Ok(created)
}

pub(crate) fn insert_category(conn: &Connection, category: &Category) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (id, name, slug, color, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            category.id,
            category.name,
            category.slug,
            category.color.as_str(),
            category.description,
            category.created_at,
            category.updated_at,
        ],
    )?;
    Ok(())
}

/// Renames and recolors cascade into the posts filed under the category.
pub fn update_category(db: &Database, id: &str, input: UpdateCategory) -> Result<Category> {
    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let conn = &tx;
    let current = fetch_category(conn, id)?.ok_or(ContentError::NotFound("category"))?;

    let (name, slug) = match input.name {
        Some(ref n) => validate_name(n)?,
        None => (current.name.clone(), current.slug.clone()),
    };
    if name_taken(conn, &name, &slug, Some(id))? {
        return Err(ContentError::DuplicateCategory(name).into());
    }

    let color = input.color.unwrap_or(current.color);
    let description = match input.description {
        Some(d) => Some(d.trim().to_string()).filter(|d| !d.is_empty()),
        None => current.description.clone(),
    };

    conn.execute(
        "UPDATE categories SET name = ?1, slug = ?2, color = ?3, description = ?4, updated_at = ?5 WHERE id = ?6",
        rusqlite::params![name, slug, color.as_str(), description, timestamp(), id],
    )?;

    conn.execute(
        "UPDATE blog_posts SET category = ?1, category_slug = ?2, category_color = ?3 WHERE category_slug = ?4",
        rusqlite::params![name, slug, color.as_str(), current.slug],
    )?;

    let updated = fetch_category(conn, id)?.ok_or(ContentError::NotFound("category"))?;
    tx.commit()?;
    Ok(updated)
}

/// Returns `false` when no category had this id. Posts keep their category text.
pub fn delete_category(db: &Database, id: &str) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
    Ok(affected > 0)
}

pub fn get_category(db: &Database, id: &str) -> Result<Option<Category>> {
    let conn = db.get()?;
    fetch_category(&conn, id)
}

pub fn get_category_by_slug(db: &Database, slug: &str) -> Result<Option<Category>> {
    let conn = db.get()?;
    let category = conn
        .query_row(
            &format!("{} WHERE c.slug = ?", CATEGORY_SELECT),
            [slug],
            row_to_category,
        )
        .optional()?;
    Ok(category)
}

pub fn list_categories(db: &Database) -> Result<Vec<Category>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!("{} ORDER BY c.name COLLATE NOCASE", CATEGORY_SELECT))?;
    let categories = stmt
        .query_map([], row_to_category)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

fn fetch_category(conn: &Connection, id: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            &format!("{} WHERE c.id = ?", CATEGORY_SELECT),
            [id],
            row_to_category,
        )
        .optional()?;
    Ok(category)
}

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        color: row.get::<_, String>(3)?.parse().unwrap_or_default(),
        description: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        post_count: row.get(7)?,
    })
}
