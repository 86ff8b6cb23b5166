//! SeaORM entities, one module per table.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

use blogicum_core::domain::{Id, UNSAVED_ID};
use sea_orm::{ActiveValue, NotSet, Set};

/// Unsaved domain entities leave the key to the database sequence.
pub(crate) fn key(id: Id) -> ActiveValue<Id> {
    if id == UNSAVED_ID { NotSet } else { Set(id) }
}
