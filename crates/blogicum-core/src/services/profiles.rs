use serde::Serialize;

use super::{BlogService, PostSummary, require_user};
use crate::context::RequestContext;
use crate::domain::User;
use crate::error::{DomainError, ValidationErrors};
use crate::forms::ProfileForm;
use crate::pagination::{Page, PageRequest};
use crate::visibility::PostQuery;

/// A user's public page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub user: User,
    /// The requester is looking at their own profile.
    pub is_owner: bool,
    pub posts: Page<PostSummary>,
}

impl BlogService {
    /// Posts of `username`: all of them for the owner, visible ones otherwise.
    pub async fn profile_page(
        &self,
        ctx: &RequestContext,
        username: &str,
        page: PageRequest,
    ) -> Result<ProfilePage, DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let query = PostQuery::by_author(user.id, &ctx.viewer, ctx.now);
        let posts = self.list_posts(&query, page).await?;
        Ok(ProfilePage {
            is_owner: ctx.viewer.is(user.id),
            user,
            posts,
        })
    }

    /// The requester's own account.
    pub async fn own_profile(&self, ctx: &RequestContext) -> Result<User, DomainError> {
        let user_id = require_user(ctx)?;
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// Edit the requester's own account; there is no way to address another one.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        form: ProfileForm,
    ) -> Result<User, DomainError> {
        let mut user = self.own_profile(ctx).await?;
        let form = form.validate()?;

        if form.username != user.username {
            let taken = self.repos.users.find_by_username(&form.username).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                let mut errors = ValidationErrors::new();
                errors.add("username", "A user with that username already exists.");
                return Err(DomainError::Validation(errors));
            }
        }

        form.apply_to(&mut user);
        let user = self.repos.users.save(user).await?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user)
    }
}
