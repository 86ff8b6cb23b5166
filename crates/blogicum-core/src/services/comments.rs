use super::posts::deny;
use super::{BlogService, CommentView, WriteOutcome, require_user};
use crate::context::RequestContext;
use crate::domain::{Comment, Id};
use crate::error::DomainError;
use crate::forms::CommentForm;
use crate::visibility::{Access, comment_mutation_access};

impl BlogService {
    /// Comment on a post the requester can see.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: Id,
        form: CommentForm,
    ) -> Result<CommentView, DomainError> {
        let author_id = require_user(ctx)?;
        let post = self.visible_post(ctx, post_id).await?;
        let text = form.validate()?;

        let comment = self
            .repos
            .comments
            .save(Comment::new(author_id, post.id, text))
            .await?;
        tracing::info!(comment_id = comment.id, post_id, "Comment added");

        let author = self
            .repos
            .users
            .find_by_id(author_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();
        Ok(CommentView { comment, author })
    }

    /// Current text of a comment, for its author's edit form.
    pub async fn comment_for_edit(
        &self,
        ctx: &RequestContext,
        post_id: Id,
        comment_id: Id,
    ) -> Result<WriteOutcome<Comment>, DomainError> {
        let comment = self.repos.comments.find_by_id(comment_id).await?;
        match comment_mutation_access(&ctx.viewer, post_id, comment.as_ref()) {
            Access::Allowed => comment
                .map(WriteOutcome::Done)
                .ok_or_else(|| DomainError::not_found("comment", comment_id)),
            Access::NotFound => Err(DomainError::not_found("comment", comment_id)),
            denied => deny(ctx, denied, post_id),
        }
    }

    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        post_id: Id,
        comment_id: Id,
        form: CommentForm,
    ) -> Result<WriteOutcome<Comment>, DomainError> {
        let mut comment = match self.comment_for_edit(ctx, post_id, comment_id).await? {
            WriteOutcome::Done(comment) => comment,
            WriteOutcome::Redirect { post_id } => return Ok(WriteOutcome::Redirect { post_id }),
        };

        comment.text = form.validate()?;
        let comment = self.repos.comments.save(comment).await?;
        tracing::info!(comment_id, post_id, "Comment updated");
        Ok(WriteOutcome::Done(comment))
    }

    pub async fn delete_comment(
        &self,
        ctx: &RequestContext,
        post_id: Id,
        comment_id: Id,
    ) -> Result<WriteOutcome<Comment>, DomainError> {
        let comment = match self.comment_for_edit(ctx, post_id, comment_id).await? {
            WriteOutcome::Done(comment) => comment,
            WriteOutcome::Redirect { post_id } => return Ok(WriteOutcome::Redirect { post_id }),
        };

        self.repos.comments.delete(comment.id).await?;
        tracing::info!(comment_id, post_id, "Comment deleted");
        Ok(WriteOutcome::Done(comment))
    }
}
