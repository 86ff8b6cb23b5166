//! # Blogicum Core
//!
//! The domain layer of Blogicum.
//! This crate contains the entities, the post visibility rules and the blog
//! services, with zero infrastructure dependencies.

pub mod context;
pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod visibility;

pub use context::RequestContext;
pub use error::DomainError;
pub use visibility::{Access, Viewer};
