//! Local storage module for persisting user state.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a durable key/value store
//! and keeps the favourites list mirrored into it.

mod connection;
/// Favourites list with deduplication and write-through persistence.
pub mod favourites;
/// Key/value storage operations.
pub mod local_storage;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory};
pub use favourites::{AddOutcome, FAVOURITES_KEY, FavouritesStore};
pub use local_storage::{get_item, remove_item, set_item};
