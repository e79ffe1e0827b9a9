use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Orange,
    Yellow,
    Pink,
    Teal,
    Indigo,
    Gray,
}

impl CategoryColor {
    pub const PALETTE: [CategoryColor; 10] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Pink,
        Self::Teal,
        Self::Indigo,
        Self::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Teal => "teal",
            Self::Indigo => "indigo",
            Self::Gray => "gray",
        }
    }
}

impl FromStr for CategoryColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::PALETTE
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: CategoryColor,
    pub description: Option<String>,
    pub post_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub color: Option<CategoryColor>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub color: Option<CategoryColor>,
    pub description: Option<String>,
}
