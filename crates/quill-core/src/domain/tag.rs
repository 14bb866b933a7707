use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a label attached to posts, addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a new tag; the slug is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            slug: slug::slugify(&name),
            name,
        }
    }
}
