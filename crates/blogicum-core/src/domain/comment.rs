use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED_ID};

/// Comment left by a user under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Id,
    pub post_id: Id,
}

impl Comment {
    pub fn new(author_id: Id, post_id: Id, text: String) -> Self {
        Self {
            id: UNSAVED_ID,
            text,
            created_at: Utc::now(),
            author_id,
            post_id,
        }
    }
}
