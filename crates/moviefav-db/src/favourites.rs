//! Favourites list mirrored into local storage.
//!
//! The whole list is stored as one JSON array under [`FAVOURITES_KEY`] and
//! rewritten after every mutation.

use anyhow::{Context, Result};
use moviefav_api::omdb::MovieSummary;
use rusqlite::Connection;

use crate::local_storage::{get_item, set_item};

/// Storage key holding the serialized favourites list.
pub const FAVOURITES_KEY: &str = "moviefav-favourites";

/// Result of [`FavouritesStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The movie was appended and persisted.
    Added,
    /// A movie with the same IMDb ID is already present; nothing changed.
    Duplicate,
}

/// In-memory favourites list with write-through persistence.
///
/// No two entries share an `imdb_id`. Insertion order is preserved.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavouritesStore {
    /// Backing database.
    conn: Connection,
    /// Current list, in insertion order.
    items: Vec<MovieSummary>,
}

impl FavouritesStore {
    /// Loads the persisted list from `conn`.
    ///
    /// An absent key yields an empty list. A value that does not parse as a
    /// list of movies is logged and ignored; it stays in storage until the
    /// next mutation overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn hydrate(conn: Connection) -> Result<Self> {
        let raw = get_item(&conn, FAVOURITES_KEY).context("failed to read favourites")?;

        let items = match raw {
            None => Vec::new(),
            Some(json) => match serde_json::from_str::<Option<Vec<MovieSummary>>>(&json) {
                Ok(list) => dedup_by_id(list.unwrap_or_default()),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed persisted favourites");
                    Vec::new()
                }
            },
        };

        tracing::debug!(count = items.len(), "favourites hydrated");
        Ok(Self { conn, items })
    }

    /// Current favourites, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    /// Number of favourites.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no favourites.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if a favourite with `imdb_id` exists.
    #[must_use]
    pub fn contains(&self, imdb_id: &str) -> bool {
        self.items.iter().any(|m| m.imdb_id == imdb_id)
    }

    /// Appends `movie` unless its IMDb ID is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the new list fails. The in-memory list
    /// is left unchanged in that case.
    pub fn add(&mut self, movie: MovieSummary) -> Result<AddOutcome> {
        if self.contains(&movie.imdb_id) {
            tracing::debug!(imdb_id = %movie.imdb_id, "favourite already present");
            return Ok(AddOutcome::Duplicate);
        }

        let mut next = self.items.clone();
        next.push(movie);
        self.commit(next)?;
        Ok(AddOutcome::Added)
    }

    /// Removes every entry whose IMDb ID equals `imdb_id` and persists.
    ///
    /// Returns the number of removed entries (zero or one).
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the new list fails. The in-memory list
    /// is left unchanged in that case.
    pub fn remove(&mut self, imdb_id: &str) -> Result<usize> {
        let next: Vec<MovieSummary> = self
            .items
            .iter()
            .filter(|m| m.imdb_id != imdb_id)
            .cloned()
            .collect();
        let removed = self.items.len().saturating_sub(next.len());
        self.commit(next)?;
        Ok(removed)
    }

    /// Persists `next` as a full overwrite, then adopts it.
    fn commit(&mut self, next: Vec<MovieSummary>) -> Result<()> {
        let json = serde_json::to_string(&next).context("failed to serialize favourites")?;
        set_item(&self.conn, FAVOURITES_KEY, &json).context("failed to persist favourites")?;
        tracing::debug!(count = next.len(), "favourites persisted");
        self.items = next;
        Ok(())
    }

    /// Releases the backing connection.
    #[must_use]
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Drops later entries that repeat an earlier IMDb ID.
fn dedup_by_id(items: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut out: Vec<MovieSummary> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|m| m.imdb_id == item.imdb_id) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::open_in_memory;

    fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            title: String::from(title),
            year: String::from("2000"),
            imdb_id: String::from(id),
            poster_url: String::from("N/A"),
            media_type: Some(String::from("movie")),
        }
    }

    fn empty_store() -> FavouritesStore {
        FavouritesStore::hydrate(open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_hydrate_absent_key_is_empty() {
        // Arrange & Act
        let store = empty_store();

        // Assert
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_appends_and_persists() {
        // Arrange
        let mut store = empty_store();

        // Act
        let outcome = store.add(movie("tt1", "A")).unwrap();

        // Assert
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(store.len(), 1);
        let raw = get_item(&store.conn, FAVOURITES_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""imdbID":"tt1""#));
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        // Arrange
        let mut store = empty_store();
        store.add(movie("tt1", "A")).unwrap();

        // Act
        let outcome = store.add(movie("tt1", "A again")).unwrap();

        // Assert
        assert_eq!(outcome, AddOutcome::Duplicate);
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "A");
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        // Arrange
        let mut store = empty_store();
        store.add(movie("tt1", "A")).unwrap();
        let before = store.items().to_vec();

        // Act
        store.add(movie("tt2", "B")).unwrap();
        let removed = store.remove("tt2").unwrap();

        // Assert
        assert_eq!(removed, 1);
        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        // Arrange
        let mut store = empty_store();
        store.add(movie("tt1", "A")).unwrap();

        // Act
        let removed = store.remove("tt9").unwrap();

        // Assert
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rehydrate_preserves_order() {
        // Arrange
        let mut store = empty_store();
        store.add(movie("tt1", "A")).unwrap();
        store.add(movie("tt2", "B")).unwrap();
        let conn = store.into_connection();

        // Act
        let reloaded = FavouritesStore::hydrate(conn).unwrap();

        // Assert
        let ids: Vec<&str> = reloaded.items().iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt2"]);
    }

    #[test]
    fn test_rehydrate_from_file_database() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();
        let mut store = FavouritesStore::hydrate(crate::open_db(Some(&dir_path)).unwrap()).unwrap();
        store.add(movie("tt1", "A")).unwrap();
        store.add(movie("tt2", "B")).unwrap();
        drop(store);

        // Act
        let reloaded = FavouritesStore::hydrate(crate::open_db(Some(&dir_path)).unwrap()).unwrap();

        // Assert
        assert_eq!(reloaded.items()[0], movie("tt1", "A"));
        assert_eq!(reloaded.items()[1], movie("tt2", "B"));
    }

    #[test]
    fn test_hydrate_malformed_is_empty_and_untouched() {
        // Arrange
        let conn = open_in_memory().unwrap();
        set_item(&conn, FAVOURITES_KEY, "{not json").unwrap();

        // Act
        let store = FavouritesStore::hydrate(conn).unwrap();

        // Assert
        assert!(store.is_empty());
        let raw = get_item(&store.conn, FAVOURITES_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("{not json"));
    }

    #[test]
    fn test_hydrate_null_is_empty() {
        // Arrange
        let conn = open_in_memory().unwrap();
        set_item(&conn, FAVOURITES_KEY, "null").unwrap();

        // Act
        let store = FavouritesStore::hydrate(conn).unwrap();

        // Assert
        assert!(store.is_empty());
    }

    #[test]
    fn test_hydrate_drops_repeated_ids() {
        // Arrange
        let conn = open_in_memory().unwrap();
        let json = serde_json::to_string(&vec![movie("tt1", "A"), movie("tt1", "A2")]).unwrap();
        set_item(&conn, FAVOURITES_KEY, &json).unwrap();

        // Act
        let store = FavouritesStore::hydrate(conn).unwrap();

        // Assert
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "A");
    }
}
