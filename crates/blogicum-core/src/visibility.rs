//! Post visibility and ownership rules.
//!
//! Every read decides what a viewer may see through [`is_publicly_visible`]
//! or a [`PostQuery`]; every write asks one of the `*_access` functions
//! before touching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Comment, Id, Post};

/// Who is looking at the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viewer {
    Anonymous,
    User(Id),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Id> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    /// Whether this viewer is the user `id`.
    pub fn is(&self, id: Id) -> bool {
        self.user_id() == Some(id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::User(_))
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// Not the owner: send the requester to the post's read-only page.
    DeniedRedirect { post_id: Id },
    NotFound,
}

/// Published, not scheduled for later, and not filed under a hidden category.
///
/// `category` is the resolved category of the post. A post without a category
/// (never set, or nulled when the category was deleted) passes that clause.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.publication.is_published
        && post.pub_date <= now
        && category.is_none_or(|c| c.publication.is_published)
}

/// Single-post lookups: authors always see their own posts, everybody else
/// only visible ones. Hidden posts are reported as missing.
pub fn detail_access(
    viewer: &Viewer,
    post: Option<&Post>,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> Access {
    match post {
        None => Access::NotFound,
        Some(post) if viewer.is(post.author_id) => Access::Allowed,
        Some(post) if is_publicly_visible(post, category, now) => Access::Allowed,
        Some(_) => Access::NotFound,
    }
}

/// Edit and delete of a post are reserved to its author.
pub fn post_mutation_access(viewer: &Viewer, post: Option<&Post>) -> Access {
    match post {
        None => Access::NotFound,
        Some(post) if viewer.is(post.author_id) => Access::Allowed,
        Some(post) => Access::DeniedRedirect { post_id: post.id },
    }
}

/// Edit and delete of a comment are reserved to its author. The comment must
/// belong to the post named in the request.
pub fn comment_mutation_access(viewer: &Viewer, post_id: Id, comment: Option<&Comment>) -> Access {
    match comment {
        Some(comment) if comment.post_id != post_id => Access::NotFound,
        None => Access::NotFound,
        Some(comment) if viewer.is(comment.author_id) => Access::Allowed,
        Some(comment) => Access::DeniedRedirect {
            post_id: comment.post_id,
        },
    }
}

/// Filter over the post table.
///
/// `visible_at` applies [`is_publicly_visible`] at the given instant; the
/// other fields are plain equality filters. Results are always ordered by
/// `pub_date` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<Id>,
    pub category_id: Option<Id>,
    pub location_id: Option<Id>,
    pub is_published: Option<bool>,
    /// Inclusive lower bound on `pub_date`.
    pub pub_date_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `pub_date`.
    pub pub_date_until: Option<DateTime<Utc>>,
    pub visible_at: Option<DateTime<Utc>>,
}

impl PostQuery {
    /// Every post, hidden or not.
    pub fn all() -> Self {
        Self::default()
    }

    /// Home page.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    /// Category page; the caller checks the category itself is published.
    pub fn in_category(category_id: Id, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::public(now)
        }
    }

    /// Profile page: everything for the author themself, visible posts for
    /// anyone else.
    pub fn by_author(author_id: Id, viewer: &Viewer, now: DateTime<Utc>) -> Self {
        let visible_at = if viewer.is(author_id) { None } else { Some(now) };
        Self {
            author_id: Some(author_id),
            visible_at,
            ..Self::default()
        }
    }

    /// In-process evaluation, for stores that cannot push the filter down.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        self.author_id.is_none_or(|id| post.author_id == id)
            && self.category_id.is_none_or(|id| post.category_id == Some(id))
            && self.location_id.is_none_or(|id| post.location_id == Some(id))
            && self
                .is_published
                .is_none_or(|flag| post.publication.is_published == flag)
            && self.pub_date_from.is_none_or(|from| post.pub_date >= from)
            && self.pub_date_until.is_none_or(|until| post.pub_date < until)
            && self
                .visible_at
                .is_none_or(|now| is_publicly_visible(post, category, now))
    }
}
