use serde::{Deserialize, Serialize};

use super::{Id, Publication, UNSAVED_ID};

/// Topic a post belongs to, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub publication: Publication,
}

impl Category {
    pub fn new(title: String, description: String, slug: String) -> Self {
        Self {
            id: UNSAVED_ID,
            title,
            description,
            slug,
            publication: Publication::new(),
        }
    }
}
