use std::collections::HashMap;

use super::{BlogService, CommentView, PostDetail, WriteOutcome, require_user};
use crate::context::RequestContext;
use crate::domain::{Id, Post, User};
use crate::error::{DomainError, ValidationErrors};
use crate::forms::{PostDraft, PostForm};
use crate::visibility::{Access, detail_access, post_mutation_access};

impl BlogService {
    /// Post page with its comments, oldest comment first.
    pub async fn post_detail(
        &self,
        ctx: &RequestContext,
        post_id: Id,
    ) -> Result<PostDetail, DomainError> {
        let post = self.visible_post(ctx, post_id).await?;

        let comments = self.repos.comments.find_by_post(post.id).await?;
        let mut author_ids: Vec<Id> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<Id, User> = self
            .repos
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let comments = comments
            .into_iter()
            .map(|comment| CommentView {
                author: authors
                    .get(&comment.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                comment,
            })
            .collect();

        let summary = self
            .summarize(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        Ok(PostDetail { summary, comments })
    }

    /// Load a post the requester is allowed to read; hidden posts are not found.
    pub(crate) async fn visible_post(
        &self,
        ctx: &RequestContext,
        post_id: Id,
    ) -> Result<Post, DomainError> {
        let post = self.repos.posts.find_by_id(post_id).await?;
        let category = match post.as_ref().and_then(|p| p.category_id) {
            Some(category_id) => self.repos.categories.find_by_id(category_id).await?,
            None => None,
        };

        match detail_access(&ctx.viewer, post.as_ref(), category.as_ref(), ctx.now) {
            Access::Allowed => post.ok_or_else(|| DomainError::not_found("post", post_id)),
            _ => Err(DomainError::not_found("post", post_id)),
        }
    }

    /// Create a post owned by the requester.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let author_id = require_user(ctx)?;
        let draft = form.validate()?;
        self.check_references(&draft).await?;

        let post = self.repos.posts.save(draft.into_post(author_id)).await?;
        tracing::info!(post_id = post.id, author_id, "Post created");
        Ok(post)
    }

    /// Current values of a post, for its author's edit form.
    pub async fn post_for_edit(
        &self,
        ctx: &RequestContext,
        post_id: Id,
    ) -> Result<WriteOutcome<Post>, DomainError> {
        let post = self.repos.posts.find_by_id(post_id).await?;
        match post_mutation_access(&ctx.viewer, post.as_ref()) {
            Access::Allowed => post
                .map(WriteOutcome::Done)
                .ok_or_else(|| DomainError::not_found("post", post_id)),
            denied => deny(ctx, denied, post_id),
        }
    }

    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: Id,
        form: PostForm,
    ) -> Result<WriteOutcome<Post>, DomainError> {
        let mut post = match self.post_for_edit(ctx, post_id).await? {
            WriteOutcome::Done(post) => post,
            WriteOutcome::Redirect { post_id } => return Ok(WriteOutcome::Redirect { post_id }),
        };

        let draft = form.validate()?;
        self.check_references(&draft).await?;
        draft.apply_to(&mut post);

        let post = self.repos.posts.save(post).await?;
        tracing::info!(post_id = post.id, "Post updated");
        Ok(WriteOutcome::Done(post))
    }

    /// Delete a post; its comments go with it.
    pub async fn delete_post(
        &self,
        ctx: &RequestContext,
        post_id: Id,
    ) -> Result<WriteOutcome<Post>, DomainError> {
        let post = match self.post_for_edit(ctx, post_id).await? {
            WriteOutcome::Done(post) => post,
            WriteOutcome::Redirect { post_id } => return Ok(WriteOutcome::Redirect { post_id }),
        };

        self.repos.posts.delete(post.id).await?;
        tracing::info!(post_id = post.id, "Post deleted");
        Ok(WriteOutcome::Done(post))
    }

    /// Referenced category and location must exist.
    async fn check_references(&self, draft: &PostDraft) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();
        if let Some(category_id) = draft.category_id {
            if self.repos.categories.find_by_id(category_id).await?.is_none() {
                errors.add("category_id", "Select a valid choice.");
            }
        }
        if let Some(location_id) = draft.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                errors.add("location_id", "Select a valid choice.");
            }
        }
        errors.into_result()
    }
}

/// Turn a non-`Allowed` access decision into the matching service result.
pub(crate) fn deny<T>(
    ctx: &RequestContext,
    access: Access,
    requested_id: Id,
) -> Result<WriteOutcome<T>, DomainError> {
    match access {
        Access::DeniedRedirect { post_id } => {
            tracing::warn!(
                viewer = ?ctx.viewer,
                post_id,
                "Owner-gated action refused, redirecting to post"
            );
            Ok(WriteOutcome::Redirect { post_id })
        }
        _ => Err(DomainError::not_found("post", requested_id)),
    }
}
