use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED_ID};

/// User entity - an account of the authentication subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet persisted, regular user.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: UNSAVED_ID,
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            password_hash,
            is_staff: false,
            date_joined: Utc::now(),
        }
    }

    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_staff {
            roles.push("staff".to_string());
        }
        roles
    }
}
