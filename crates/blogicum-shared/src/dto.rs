//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn published_by_default() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request to replace the signed-in account's password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Identity carried by the presented token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Post create/edit form. Also returned pre-filled by the edit endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM` (read as UTC).
    pub pub_date: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Profile edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub name: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// `?page=N`. Kept as text so malformed values fall back to the first page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?is_published=true|false` on admin lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishedFilter {
    pub is_published: Option<bool>,
}

/// Filters of the admin post list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPostQuery {
    pub page: Option<String>,
    pub is_published: Option<bool>,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Inclusive, same formats as a post's `pub_date`.
    pub pub_date_from: Option<String>,
    /// Exclusive.
    pub pub_date_until: Option<String>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Only present on the owner's own documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Category as shown next to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub slug: String,
    pub title: String,
}

/// A post as shown in listings and on its own page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub category: Option<CategoryRef>,
    pub location: Option<String>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    /// Oldest first.
    pub comments: Vec<CommentResponse>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserResponse,
    pub is_owner: bool,
    pub posts: PageResponse<PostResponse>,
}

/// A static informational page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPageResponse {
    pub title: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_optional_fields_default() {
        let req: PostRequest = serde_json::from_str(
            r#"{"title":"Hi","text":"Body","pub_date":"2024-05-01T10:30"}"#,
        )
        .unwrap();

        assert_eq!(req.image, None);
        assert_eq!(req.category_id, None);
        assert_eq!(req.location_id, None);
    }

    #[test]
    fn test_category_request_is_published_by_default() {
        let req: CategoryRequest =
            serde_json::from_str(r#"{"title":"Travel","description":"Trips","slug":"travel"}"#)
                .unwrap();
        assert!(req.is_published);
    }

    #[test]
    fn test_user_response_hides_missing_email() {
        let user = UserResponse {
            id: 1,
            username: "leo".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            full_name: "leo".to_string(),
            email: None,
            date_joined: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["username"], "leo");
    }
}
