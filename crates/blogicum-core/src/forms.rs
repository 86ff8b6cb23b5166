//! Submitted field sets and their validation.
//!
//! Each form carries raw client input; `validate` either returns the cleaned
//! value or every field-level message at once.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{Category, Id, Location, Post, User};
use crate::error::{DomainError, ValidationErrors};

pub const TITLE_MAX_LENGTH: usize = 256;
pub const NAME_MAX_LENGTH: usize = 256;
pub const SLUG_MAX_LENGTH: usize = 64;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PERSON_NAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const PASSWORD_MIN_LENGTH: usize = 8;

fn check_required(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

fn check_max_len(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    check_required(errors, "username", username);
    check_max_len(errors, "username", username, USERNAME_MAX_LENGTH);
    let allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);
    if !username.chars().all(allowed) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    check_max_len(errors, "email", email, EMAIL_MAX_LENGTH);
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        errors.add("email", "Enter a valid email address.");
    }
}

fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(
            field,
            format!("Password must be at least {PASSWORD_MIN_LENGTH} characters."),
        );
    }
}

/// Parse RFC 3339, or a `datetime-local` value (`2024-05-01T10:30`) read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Post create/edit form. Author and publication flag are not form fields.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub image: Option<String>,
    pub location_id: Option<Id>,
    pub category_id: Option<Id>,
}

/// Cleaned post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub location_id: Option<Id>,
    pub category_id: Option<Id>,
}

impl PostForm {
    pub fn validate(self) -> Result<PostDraft, DomainError> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "title", &self.title);
        check_max_len(&mut errors, "title", &self.title, TITLE_MAX_LENGTH);
        check_required(&mut errors, "text", &self.text);

        let pub_date = parse_timestamp(&self.pub_date);
        if pub_date.is_none() {
            errors.add("pub_date", "Enter a valid date/time.");
        }

        errors.into_result()?;
        Ok(PostDraft {
            title: self.title.trim().to_string(),
            text: self.text,
            pub_date: pub_date.unwrap_or_default(),
            image: self.image.filter(|s| !s.trim().is_empty()),
            location_id: self.location_id,
            category_id: self.category_id,
        })
    }
}

impl PostDraft {
    /// Build a new post owned by `author_id`.
    pub fn into_post(self, author_id: Id) -> Post {
        let mut post = Post::new(author_id, self.title, self.text, self.pub_date);
        post.image = self.image;
        post.location_id = self.location_id;
        post.category_id = self.category_id;
        post
    }

    /// Overwrite the editable fields of `post`; ownership and flag are kept.
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.image = self.image;
        post.location_id = self.location_id;
        post.category_id = self.category_id;
    }
}

/// Comment create/edit form.
#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(self) -> Result<String, DomainError> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "text", &self.text);
        errors.into_result()?;
        Ok(self.text)
    }
}

/// Own-profile edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);
        check_max_len(&mut errors, "first_name", &self.first_name, PERSON_NAME_MAX_LENGTH);
        check_max_len(&mut errors, "last_name", &self.last_name, PERSON_NAME_MAX_LENGTH);
        // Email may be left blank on a profile.
        if !self.email.trim().is_empty() {
            check_email(&mut errors, &self.email);
        }
        errors.into_result()?;
        Ok(Self {
            email: self.email.trim().to_string(),
            ..self
        })
    }

    pub fn apply_to(self, user: &mut User) {
        user.username = self.username;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.email = self.email;
    }
}

/// Account registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegistrationForm {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);
        check_email(&mut errors, &self.email);
        check_max_len(&mut errors, "first_name", &self.first_name, PERSON_NAME_MAX_LENGTH);
        check_max_len(&mut errors, "last_name", &self.last_name, PERSON_NAME_MAX_LENGTH);
        check_password(&mut errors, "password", &self.password);
        errors.into_result()?;
        Ok(self)
    }
}

/// Password change of the signed-in account. The old password is checked
/// against the stored hash by the service.
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChangeForm {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "old_password", &self.old_password);
        check_password(&mut errors, "new_password", &self.new_password);
        if !self.old_password.is_empty() && self.old_password == self.new_password {
            errors.add("new_password", "The new password must differ from the old one.");
        }
        errors.into_result()?;
        Ok(self)
    }
}

/// Admin form for categories.
#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl CategoryForm {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "title", &self.title);
        check_max_len(&mut errors, "title", &self.title, TITLE_MAX_LENGTH);
        check_required(&mut errors, "description", &self.description);
        check_required(&mut errors, "slug", &self.slug);
        check_max_len(&mut errors, "slug", &self.slug, SLUG_MAX_LENGTH);
        let slug_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if !self.slug.chars().all(slug_char) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of Latin letters, numbers, underscores or hyphens.",
            );
        }
        errors.into_result()?;
        Ok(self)
    }

    pub fn apply_to(self, category: &mut Category) {
        category.title = self.title;
        category.description = self.description;
        category.slug = self.slug;
        category.publication.is_published = self.is_published;
    }
}

/// Admin form for locations.
#[derive(Debug, Clone)]
pub struct LocationForm {
    pub name: String,
    pub is_published: bool,
}

impl LocationForm {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name);
        check_max_len(&mut errors, "name", &self.name, NAME_MAX_LENGTH);
        errors.into_result()?;
        Ok(self)
    }

    pub fn apply_to(self, location: &mut Location) {
        location.name = self.name;
        location.publication.is_published = self.is_published;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn validation_errors(err: DomainError) -> ValidationErrors {
        match err {
            DomainError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_post_form_collects_all_field_errors() {
        let form = PostForm {
            title: " ".to_string(),
            text: String::new(),
            pub_date: "yesterday".to_string(),
            ..PostForm::default()
        };

        let errors = validation_errors(form.validate().unwrap_err());
        assert!(errors.has("title"));
        assert!(errors.has("text"));
        assert!(errors.has("pub_date"));
    }

    #[test]
    fn test_post_form_accepts_datetime_local() {
        let draft = PostForm {
            title: "Trip".to_string(),
            text: "Went north".to_string(),
            pub_date: "2030-05-01T10:30".to_string(),
            image: Some(String::new()),
            ..PostForm::default()
        }
        .validate()
        .unwrap();

        assert_eq!(draft.pub_date.year(), 2030);
        assert_eq!(draft.pub_date.hour(), 10);
        assert_eq!(draft.image, None);
    }

    #[test]
    fn test_title_length_limit() {
        let form = PostForm {
            title: "x".repeat(TITLE_MAX_LENGTH + 1),
            text: "body".to_string(),
            pub_date: "2024-01-01T00:00:00Z".to_string(),
            ..PostForm::default()
        };
        let errors = validation_errors(form.validate().unwrap_err());
        assert!(errors.has("title"));
        assert_eq!(errors.fields().len(), 1);
    }

    #[test]
    fn test_profile_form_rejects_bad_username_and_email() {
        let form = ProfileForm {
            username: "has space".to_string(),
            email: "nobody".to_string(),
            ..ProfileForm::default()
        };
        let errors = validation_errors(form.validate().unwrap_err());
        assert!(errors.has("username"));
        assert!(errors.has("email"));
    }

    #[test]
    fn test_profile_form_allows_blank_email() {
        let form = ProfileForm {
            username: "leo".to_string(),
            email: "  ".to_string(),
            ..ProfileForm::default()
        }
        .validate()
        .unwrap();
        assert_eq!(form.email, "");
    }

    #[test]
    fn test_category_slug_format() {
        let form = CategoryForm {
            title: "Travel".to_string(),
            description: "Trips".to_string(),
            slug: "путешествия".to_string(),
            is_published: true,
        };
        let errors = validation_errors(form.validate().unwrap_err());
        assert!(errors.has("slug"));
    }

    #[test]
    fn test_registration_password_length() {
        let form = RegistrationForm {
            username: "leo".to_string(),
            email: "leo@example.com".to_string(),
            password: "short".to_string(),
            ..RegistrationForm::default()
        };
        let errors = validation_errors(form.validate().unwrap_err());
        assert!(errors.has("password"));
        assert!(!errors.has("username"));
    }

    #[test]
    fn test_password_change_rules() {
        let errors = validation_errors(
            PasswordChangeForm {
                old_password: String::new(),
                new_password: "short".to_string(),
            }
            .validate()
            .unwrap_err(),
        );
        assert!(errors.has("old_password"));
        assert!(errors.has("new_password"));

        let errors = validation_errors(
            PasswordChangeForm {
                old_password: "war-and-peace".to_string(),
                new_password: "war-and-peace".to_string(),
            }
            .validate()
            .unwrap_err(),
        );
        assert!(errors.has("new_password"));
        assert!(!errors.has("old_password"));
    }
}
