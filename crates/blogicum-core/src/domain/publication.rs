use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state shared by locations, categories and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Publication {
    /// Published, created now.
    pub fn new() -> Self {
        Self {
            is_published: true,
            created_at: Utc::now(),
        }
    }

    /// Same creation time, with the given flag.
    pub fn with_published(self, is_published: bool) -> Self {
        Self {
            is_published,
            ..self
        }
    }
}

impl Default for Publication {
    fn default() -> Self {
        Self::new()
    }
}
