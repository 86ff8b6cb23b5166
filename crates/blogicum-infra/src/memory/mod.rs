//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All tables live behind one async `RwLock`, and deletes reproduce the
//! foreign key policies of the SQL schema (cascade for authors and posts,
//! set-null for categories and locations).
//! Note: Data is lost on process restart.

mod repos;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use blogicum_core::domain::{Category, Comment, Id, Location, Post, User};
use blogicum_core::ports::Repositories;

pub use repos::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryLocationRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};

#[derive(Default)]
pub struct Tables {
    pub(crate) next_id: Id,
    pub(crate) users: BTreeMap<Id, User>,
    pub(crate) posts: BTreeMap<Id, Post>,
    pub(crate) comments: BTreeMap<Id, Comment>,
    pub(crate) categories: BTreeMap<Id, Category>,
    pub(crate) locations: BTreeMap<Id, Location>,
}

impl Tables {
    pub(crate) fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared storage behind every in-memory repository.
#[derive(Default)]
pub struct InMemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build every repository over one shared store.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryUserRepository::new(self.clone())),
            posts: Arc::new(InMemoryPostRepository::new(self.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(self.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(self.clone())),
            locations: Arc::new(InMemoryLocationRepository::new(self.clone())),
        }
    }
}
