use super::CategoryColor;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub category: String,
    pub category_slug: String,
    pub category_color: CategoryColor,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub reading_time: u32,
    pub author: Option<Author>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tags as submitted by a client: `"a, b"`, `["a", "b"]`, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagsInput {
    #[default]
    Empty,
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for TagsInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<Option<String>>),
            Null,
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => TagsInput::Text(s),
            Raw::List(items) => TagsInput::List(items.into_iter().flatten().collect()),
            Raw::Null => TagsInput::Empty,
        })
    }
}

impl From<&str> for TagsInput {
    fn from(s: &str) -> Self {
        TagsInput::Text(s.to_string())
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(v: Vec<String>) -> Self {
        TagsInput::List(v)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: TagsInput,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<TagsInput>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub author: Option<Author>,
}

/// Which posts a list read should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Published,
}

impl PostScope {
    pub fn cache_key(&self) -> &'static str {
        match self {
            Self::All => "posts:all",
            Self::Published => "posts:published",
        }
    }
}
