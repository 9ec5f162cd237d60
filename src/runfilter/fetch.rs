//! Debounced, generation-checked fetching.
//!
//! Filter changes arrive in bursts (typing in a typeahead, clicking several
//! chips), and responses may come back out of order. The [`FetchGate`] makes
//! two guarantees:
//!
//! - a fetch is only issued once no change has happened for the debounce
//!   window, so the last change in a burst wins;
//! - every change bumps a generation counter, and a response is only applied
//!   if it was requested for the current generation.
//!
//! Time is passed in by the caller. The gate never sleeps or spawns.

use std::time::{Duration, Instant};

/// Monotonic counter identifying one filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct FetchGate {
    debounce: Duration,
    generation: Generation,
    dirty_since: Option<Instant>,
}

impl FetchGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            generation: Generation::default(),
            dirty_since: None,
        }
    }

    /// Record a state change at `now`. Restarts the debounce window.
    pub fn mark_dirty(&mut self, now: Instant) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.dirty_since = Some(now);
        self.generation
    }

    /// The generation to fetch, once the debounce window has passed.
    ///
    /// Fires at most once per burst of changes.
    pub fn poll(&mut self, now: Instant) -> Option<Generation> {
        let since = self.dirty_since?;
        if now.saturating_duration_since(since) < self.debounce {
            return None;
        }
        self.dirty_since = None;
        Some(self.generation)
    }

    /// The generation to fetch right now, ignoring the debounce window.
    ///
    /// Clears any pending window, so `poll` will not fire for it again.
    pub fn take(&mut self) -> Generation {
        self.dirty_since = None;
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }
}

/// What the result list should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading(Generation),
    Loaded(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

/// Whether a completed fetch was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The filters changed after the request went out.
    Stale,
}
