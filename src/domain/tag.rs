use serde::{Deserialize, Serialize};

/// Label attached to recipes, filterable by slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    /// Display color as a `#RRGGBB` hex code.
    pub color: String,
    pub slug: String,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl NewTag {
    /// Construct a new tag payload with trimmed fields and a normalized color.
    pub fn new(name: impl Into<String>, color: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            color: color.into().trim().to_uppercase(),
            slug: slug.into().trim().to_string(),
        }
    }
}
