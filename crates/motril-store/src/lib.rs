//! SQLite-backed collaborators for the Motril pipeline.
//!
//! One database file holds the daily price history, the aggregated
//! monthly candles, the scored ratio rows for both benchmark roles, and
//! the index catalog. [`SqliteStore`] implements all four collaborator
//! traits from `motril-traits`, so a single handle can be wired into the
//! pipeline as source, sinks, and catalog at once.
//!
//! The store receives its database path at construction time; nothing in
//! this crate reads ambient configuration.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod schema;
mod store;

pub use store::SqliteStore;
