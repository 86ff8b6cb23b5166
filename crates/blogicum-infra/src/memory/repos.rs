use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use blogicum_core::domain::{Category, Comment, Id, Location, Post, UNSAVED_ID, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::visibility::PostQuery;

use super::{InMemoryStore, Tables};

/// An entity kept in one of the in-memory tables.
pub trait Stored: Clone + Send + Sync + 'static {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self>;
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self>;
    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);

    /// Unique and foreign key checks before a write.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Referential actions after the row `id` was removed.
    fn on_delete(_tables: &mut Tables, _id: Id) {}
}

/// Generic in-memory repository over one table of an [`InMemoryStore`].
pub struct InMemoryRepository<T> {
    store: Arc<InMemoryStore>,
    _entity: PhantomData<T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }
}

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

/// In-memory post repository.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

/// In-memory comment repository.
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

/// In-memory category repository.
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;

/// In-memory location repository.
pub type InMemoryLocationRepository = InMemoryRepository<Location>;

#[async_trait]
impl<T: Stored> BaseRepository<T, Id> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Id) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn save(&self, mut entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        entity.check(&tables)?;

        if entity.id() == UNSAVED_ID {
            let id = tables.allocate_id();
            entity.set_id(id);
        } else if !T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }

        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::table_mut(&mut tables).remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::on_delete(&mut tables, id);
        Ok(())
    }
}

fn by_ids<T: Clone>(table: &BTreeMap<Id, T>, ids: &[Id]) -> Vec<T> {
    ids.iter().filter_map(|id| table.get(id).cloned()).collect()
}

impl Stored for User {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self> {
        &tables.users
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self> {
        &mut tables.users
    }
    fn id(&self) -> Id {
        self.id
    }
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .users
            .values()
            .any(|u| u.username == self.username && u.id != self.id);
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Id) {
        let post_ids: Vec<Id> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in post_ids {
            tables.posts.remove(&post_id);
            Post::on_delete(tables, post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
    }
}

impl Stored for Post {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self> {
        &tables.posts
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self> {
        &mut tables.posts
    }
    fn id(&self) -> Id {
        self.id
    }
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let dangling = !tables.users.contains_key(&self.author_id)
            || self
                .category_id
                .is_some_and(|id| !tables.categories.contains_key(&id))
            || self
                .location_id
                .is_some_and(|id| !tables.locations.contains_key(&id));
        if dangling {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Id) {
        tables.comments.retain(|_, c| c.post_id != id);
    }
}

impl Stored for Comment {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self> {
        &tables.comments
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self> {
        &mut tables.comments
    }
    fn id(&self) -> Id {
        self.id
    }
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) || !tables.posts.contains_key(&self.post_id)
        {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }
        Ok(())
    }
}

impl Stored for Category {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self> {
        &tables.categories
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self> {
        &mut tables.categories
    }
    fn id(&self) -> Id {
        self.id
    }
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .categories
            .values()
            .any(|c| c.slug == self.slug && c.id != self.id);
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Id) {
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl Stored for Location {
    fn table(tables: &Tables) -> &BTreeMap<Id, Self> {
        &tables.locations
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Id, Self> {
        &mut tables.locations
    }
    fn id(&self) -> Id {
        self.id
    }
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn on_delete(tables: &mut Tables, id: Id) {
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(by_ids(&tables.users, ids))
    }
}

impl InMemoryPostRepository {
    /// Matching posts, newest `pub_date` first.
    fn select(tables: &Tables, query: &PostQuery) -> Vec<Post> {
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| {
                let category = post.category_id.and_then(|id| tables.categories.get(&id));
                query.matches(post, category)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        posts
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(Self::select(&tables, query).len() as u64)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(Self::select(&tables, query)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Id) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn count_by_posts(&self, post_ids: &[Id]) -> Result<HashMap<Id, u64>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut counts = HashMap::new();
        for comment in tables.comments.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(by_ids(&tables.categories, ids))
    }

    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| is_published.is_none_or(|flag| c.publication.is_published == flag))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Location>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(by_ids(&tables.locations, ids))
    }

    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Location>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .values()
            .filter(|l| is_published.is_none_or(|flag| l.publication.is_published == flag))
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}
