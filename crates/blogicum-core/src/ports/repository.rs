use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, Comment, Id, Location, Post, User};
use crate::error::RepoError;
use crate::visibility::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Id> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<User>, RepoError>;
}

/// Post repository. Deleting the author removes their posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Id> {
    /// Number of posts matching `query`.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Posts matching `query`, newest `pub_date` first.
    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository. Deleting the post or the author removes the comments.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Id> {
    /// Comments of one post, oldest first.
    async fn find_by_post(&self, post_id: Id) -> Result<Vec<Comment>, RepoError>;

    /// Comment totals keyed by post id; posts without comments are absent.
    async fn count_by_posts(&self, post_ids: &[Id]) -> Result<HashMap<Id, u64>, RepoError>;
}

/// Category repository. Deleting a category nulls the reference on its posts.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Id> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Category>, RepoError>;

    /// All categories ordered by title, optionally filtered by publication flag.
    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Category>, RepoError>;
}

/// Location repository. Deleting a location nulls the reference on its posts.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Id> {
    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Location>, RepoError>;

    /// All locations ordered by name, optionally filtered by publication flag.
    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Location>, RepoError>;
}

/// Every repository the blog services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
}
