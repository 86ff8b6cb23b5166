//! Blog services: every read and write the HTTP layer exposes, expressed over
//! the repository ports and gated by the rules in [`crate::visibility`].

mod accounts;
mod admin;
mod comments;
mod posts;
mod profiles;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

pub use admin::AdminPostFilter;
pub use profiles::ProfilePage;

use crate::context::RequestContext;
use crate::domain::{Category, Comment, Id, Location, Post, User};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::Repositories;
use crate::visibility::PostQuery;

/// Result of an owner-gated write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Done(T),
    /// Requester is not the owner; nothing was changed.
    Redirect { post_id: Id },
}

impl<T> WriteOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        match self {
            WriteOutcome::Done(value) => WriteOutcome::Done(f(value)),
            WriteOutcome::Redirect { post_id } => WriteOutcome::Redirect { post_id },
        }
    }
}

/// A post together with what listings display next to it.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: String,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

/// A comment with its author's username.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: String,
}

/// Single post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub comments: Vec<CommentView>,
}

/// Category page.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub posts: Page<PostSummary>,
}

/// Entry point for all blog operations.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Home page: visible posts, newest first.
    pub async fn home_page(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        self.list_posts(&PostQuery::public(ctx.now), page).await
    }

    /// Visible posts of a published category.
    pub async fn category_page(
        &self,
        ctx: &RequestContext,
        slug: &str,
        page: PageRequest,
    ) -> Result<CategoryPage, DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.publication.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let posts = self
            .list_posts(&PostQuery::in_category(category.id, ctx.now), page)
            .await?;
        Ok(CategoryPage { category, posts })
    }

    pub(crate) async fn list_posts(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        let total = self.repos.posts.count(query).await?;
        let window = page.resolve(total);
        let posts = self
            .repos
            .posts
            .find_page(query, window.offset, window.limit)
            .await?;
        let items = self.summarize(posts).await?;
        Ok(Page::new(items, window, total))
    }

    /// Attach author, category, location and comment count to each post.
    pub(crate) async fn summarize(&self, posts: Vec<Post>) -> Result<Vec<PostSummary>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Id> = posts.iter().map(|p| p.id).collect();
        let author_ids = unique(posts.iter().map(|p| p.author_id));
        let category_ids = unique(posts.iter().filter_map(|p| p.category_id));
        let location_ids = unique(posts.iter().filter_map(|p| p.location_id));

        let authors: HashMap<Id, User> = self
            .repos
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let categories: HashMap<Id, Category> = self
            .repos
            .categories
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let locations: HashMap<Id, Location> = self
            .repos
            .locations
            .find_by_ids(&location_ids)
            .await?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();
        let counts = self.repos.comments.count_by_posts(&post_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostSummary {
                author: authors
                    .get(&post.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                location: post.location_id.and_then(|id| locations.get(&id).cloned()),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
            .collect())
    }
}

/// Identity of an authenticated requester, or `Unauthorized`.
pub(crate) fn require_user(ctx: &RequestContext) -> Result<Id, DomainError> {
    ctx.viewer.user_id().ok_or(DomainError::Unauthorized)
}

fn unique(ids: impl Iterator<Item = Id>) -> Vec<Id> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
