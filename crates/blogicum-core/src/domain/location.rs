use serde::{Deserialize, Serialize};

use super::{Id, Publication, UNSAVED_ID};

/// Geographic tag a post can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Id,
    pub name: String,
    pub publication: Publication,
}

impl Location {
    pub fn new(name: String) -> Self {
        Self {
            id: UNSAVED_ID,
            name,
            publication: Publication::new(),
        }
    }
}
