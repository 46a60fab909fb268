//! Typed JSON persistence on top of a [`KeyValueStore`].
//!
//! Both directions fail soft: a write that the store rejects is logged
//! and dropped, and a missing or unparseable value loads as `None`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::kv::KeyValueStore;

/// Key of the dark-mode flag (JSON bool).
pub const THEME_KEY: &str = "darkMode";

/// Key of the favorites list (JSON array of movie summaries).
pub const FAVORITES_KEY: &str = "movieFavorites";

/// Serializing adapter over a raw key-value store.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Serializes `value` as JSON and writes it under `key`.
    ///
    /// Failures are logged at `warn` and otherwise ignored.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value, write dropped");
                return;
            }
        };

        if let Err(e) = self.store.put(key, &json) {
            tracing::warn!(key, error = %e, "Storage write failed, write dropped");
        }
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// Returns `None` if the key is absent, the store cannot be read, or
    /// the stored text is not valid JSON for `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is corrupt, treating as absent");
                None
            }
        }
    }

    /// Consumes the adapter and returns the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::Deserialize;

    use super::*;
    use crate::kv::MemoryStore;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Entry {
        id: String,
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        // Arrange
        let mut persistence = Persistence::new(MemoryStore::new());
        let entries = vec![
            Entry {
                id: String::from("b"),
            },
            Entry {
                id: String::from("a"),
            },
        ];

        // Act
        persistence.save(FAVORITES_KEY, &entries);
        let loaded: Vec<Entry> = persistence.load(FAVORITES_KEY).unwrap();

        // Assert
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_bool_is_stored_as_json_literal() {
        // Arrange
        let mut persistence = Persistence::new(MemoryStore::new());

        // Act
        persistence.save(THEME_KEY, &true);

        // Assert
        assert_eq!(
            persistence.store.get(THEME_KEY).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(persistence.load::<bool>(THEME_KEY), Some(true));
    }

    #[test]
    fn test_load_missing_key_is_none() {
        // Arrange
        let persistence = Persistence::new(MemoryStore::new());

        // Act
        let value: Option<bool> = persistence.load(THEME_KEY);

        // Assert
        assert_eq!(value, None);
    }

    #[test]
    fn test_load_corrupt_value_is_none() {
        // Arrange
        let store = MemoryStore::new().with_value(FAVORITES_KEY, "[{not json");
        let persistence = Persistence::new(store);

        // Act
        let value: Option<Vec<Entry>> = persistence.load(FAVORITES_KEY);

        // Assert
        assert_eq!(value, None);
    }

    #[test]
    fn test_load_wrong_shape_is_none() {
        // Arrange
        let store = MemoryStore::new().with_value(THEME_KEY, r#""yes""#);
        let persistence = Persistence::new(store);

        // Act
        let value: Option<bool> = persistence.load(THEME_KEY);

        // Assert
        assert_eq!(value, None);
    }

    #[test]
    fn test_save_to_unavailable_store_is_silent() {
        // Arrange
        let mut persistence = Persistence::new(MemoryStore::unavailable());

        // Act
        persistence.save(THEME_KEY, &true);

        // Assert
        assert_eq!(persistence.load::<bool>(THEME_KEY), None);
    }
}
