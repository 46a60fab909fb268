//! Persistence module for user preferences.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a small key-value store holding
//! the theme preference and the favorites list.

mod connection;
/// Key-value store trait and its implementations.
pub mod kv;
mod migrations;
/// Typed, fail-soft persistence adapter.
pub mod persistence;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_store;
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use persistence::{FAVORITES_KEY, Persistence, THEME_KEY};
