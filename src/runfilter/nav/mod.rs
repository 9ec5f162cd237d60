//! # Navigation Layer
//!
//! The active filter set mirrors itself into the page URL after every change.
//! How the URL is actually committed depends on the host: a browser pushes a
//! history entry, the CLI just remembers the last query. The [`Navigator`]
//! trait is that seam.
//!
//! ## Implementations
//!
//! - [`memory::MemoryNavigator`]: keeps the whole history in memory. Used by
//!   the CLI and by tests that check back/forward behaviour.
//!
//! Queries are passed without the leading `?`.

pub mod memory;

/// Commits query strings to the host's location.
pub trait Navigator {
    /// The query string the view is currently showing.
    fn current_query(&self) -> &str;

    /// Make `query` the current query, as a new history entry.
    fn push_query(&mut self, query: String);
}
