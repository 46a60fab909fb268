//! Ordered, id-unique favorites collection.

use moviefav_api::omdb::{MediaType, MovieSummary};

/// Outcome of a [`FavoritesSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    /// The movie was appended.
    Added,
    /// The movie was removed.
    Removed,
}

/// The user's favorites, unique by `imdb_id`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    entries: Vec<MovieSummary>,
}

impl FavoritesSet {
    /// Builds a set from persisted records, keeping the first occurrence of
    /// each id.
    #[must_use]
    pub fn from_records(records: Vec<MovieSummary>) -> Self {
        let mut set = Self::default();
        for record in records {
            if set.contains(&record.imdb_id) {
                tracing::debug!(imdb_id = %record.imdb_id, "Dropping duplicate favorite");
                continue;
            }
            set.entries.push(record);
        }
        set
    }

    /// Whether a movie with this id is saved.
    #[must_use]
    pub fn contains(&self, imdb_id: &str) -> bool {
        self.entries.iter().any(|m| m.imdb_id == imdb_id)
    }

    /// Removes the movie if present, otherwise appends it.
    pub(super) fn toggle(&mut self, movie: &MovieSummary) -> FavoriteChange {
        if let Some(pos) = self.entries.iter().position(|m| m.imdb_id == movie.imdb_id) {
            self.entries.remove(pos);
            FavoriteChange::Removed
        } else {
            self.entries.push(movie.clone());
            FavoriteChange::Added
        }
    }

    /// Number of saved movies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, MovieSummary> {
        self.entries.iter()
    }

    /// Saved movies as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[MovieSummary] {
        &self.entries
    }

    /// Number of saved entries of the given kind.
    #[must_use]
    pub fn count_of(&self, media_type: &MediaType) -> usize {
        self.entries
            .iter()
            .filter(|m| &m.media_type == media_type)
            .count()
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a MovieSummary;
    type IntoIter = std::slice::Iter<'a, MovieSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashSet;

    use super::*;

    fn movie(id: &str, media_type: MediaType) -> MovieSummary {
        MovieSummary {
            title: format!("Title {id}"),
            year: String::from("2010"),
            imdb_id: String::from(id),
            media_type,
            poster: None,
        }
    }

    fn ids(set: &FavoritesSet) -> Vec<&str> {
        set.iter().map(|m| m.imdb_id.as_str()).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        // Arrange
        let mut set = FavoritesSet::default();
        let inception = movie("tt1375666", MediaType::Movie);

        // Act & Assert
        assert_eq!(set.toggle(&inception), FavoriteChange::Added);
        assert_eq!(set.len(), 1);
        assert!(set.contains("tt1375666"));

        assert_eq!(set.toggle(&inception), FavoriteChange::Removed);
        assert!(set.is_empty());
        assert!(!set.contains("tt1375666"));
    }

    #[test]
    fn test_toggle_pair_restores_membership() {
        // Arrange
        let mut set = FavoritesSet::from_records(vec![
            movie("tt1", MediaType::Movie),
            movie("tt2", MediaType::Series),
            movie("tt3", MediaType::Movie),
        ]);
        let before: HashSet<String> = set.iter().map(|m| m.imdb_id.clone()).collect();

        // Act
        let second = set.as_slice()[1].clone();
        set.toggle(&second);
        set.toggle(&second);

        // Assert
        let after: HashSet<String> = set.iter().map(|m| m.imdb_id.clone()).collect();
        assert_eq!(after, before);
        assert_eq!(ids(&set), vec!["tt1", "tt3", "tt2"]);
    }

    #[test]
    fn test_no_duplicates_after_toggle_sequence() {
        // Arrange
        let mut set = FavoritesSet::default();
        let sequence = ["a", "b", "a", "c", "a", "b", "b", "c", "d", "a"];

        // Act
        for id in sequence {
            set.toggle(&movie(id, MediaType::Movie));
        }

        // Assert
        let unique: HashSet<&str> = ids(&set).into_iter().collect();
        assert_eq!(unique.len(), set.len());
        assert_eq!(ids(&set), vec!["b", "d"]);
    }

    #[test]
    fn test_from_records_drops_duplicates() {
        // Arrange
        let mut first = movie("tt1", MediaType::Movie);
        first.title = String::from("First");
        let mut dup = movie("tt1", MediaType::Movie);
        dup.title = String::from("Duplicate");

        // Act
        let set = FavoritesSet::from_records(vec![first, movie("tt2", MediaType::Movie), dup]);

        // Assert
        assert_eq!(ids(&set), vec!["tt1", "tt2"]);
        assert_eq!(set.as_slice()[0].title, "First");
    }

    #[test]
    fn test_count_of() {
        // Arrange
        let set = FavoritesSet::from_records(vec![
            movie("tt1", MediaType::Movie),
            movie("tt2", MediaType::Series),
            movie("tt3", MediaType::Movie),
            movie("tt4", MediaType::Episode),
        ]);

        // Act & Assert
        assert_eq!(set.count_of(&MediaType::Movie), 2);
        assert_eq!(set.count_of(&MediaType::Series), 1);
        assert_eq!(set.count_of(&MediaType::Other(String::from("game"))), 0);
    }
}
