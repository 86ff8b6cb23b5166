use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, Publication, UNSAVED_ID};

/// Post entity - a blog publication, possibly scheduled for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub text: String,
    /// May lie in the future; the post stays hidden from others until then.
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub publication: Publication,
    pub author_id: Id,
    pub location_id: Option<Id>,
    pub category_id: Option<Id>,
}

impl Post {
    /// Create a new published post owned by `author_id`.
    pub fn new(author_id: Id, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: UNSAVED_ID,
            title,
            text,
            pub_date,
            image: None,
            publication: Publication::new(),
            author_id,
            location_id: None,
            category_id: None,
        }
    }
}
