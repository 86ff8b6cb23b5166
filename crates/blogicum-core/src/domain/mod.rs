//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod publication;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use post::Post;
pub use publication::Publication;
pub use user::User;

/// Identifier assigned by the datastore; `0` until the entity is persisted.
pub type Id = i64;

/// Placeholder id carried by entities that have not been saved yet.
pub const UNSAVED_ID: Id = 0;
