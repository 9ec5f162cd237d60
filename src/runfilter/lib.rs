//! # Runfilter Architecture
//!
//! Runfilter is the **filter model behind a test-results dashboard**: the part that
//! turns "show me failed runs of component ui, page 2" into a shareable URL and into
//! the parameters the backend understands. It draws nothing and sends nothing; a UI
//! (or the bundled CLI) drives it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  View Layer (api.rs)                                        │
//! │  - FilterView: one filtered list, end to end                │
//! │  - Debounced, generation-checked fetching (fetch.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filter Layer (active.rs, query.rs)                         │
//! │  - One filter per field, pinned and protected fields        │
//! │  - URL sync and page reset, backend request params          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Vocabulary (operators.rs, fields.rs, model.rs, codec.rs)   │
//! │  - Operator registry and wire encodings                     │
//! │  - Field families, values, URL and API string forms         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two string forms
//!
//! Every filter has a URL form, where the operator travels by name, and an API form,
//! where it travels as a single wire character:
//!
//! ```text
//! URL:  result=[in]failed;error      API:  result*failed;error
//! URL:  duration=[gte]10             API:  duration)10
//! ```
//!
//! The URL form is what users share and bookmark, so reading it is lenient: anything
//! that cannot be understood is logged and dropped, never surfaced as an error.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Everything outside `cli/`:
//! - Takes the current time as an argument instead of reading a clock
//! - Reaches the URL through a [`nav::Navigator`] and the backend through a
//!   [`query::HttpClient`]
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//!
//! ## Module Overview
//!
//! - **`operators`**: The nine comparison operators, their names, wire characters
//!   and value modes.
//! - **`fields`**: Which operators make sense for which field.
//! - **`model`**: `Filter` and `FilterValue`.
//! - **`codec`**: URL and API string forms.
//! - **`active`**: The active filter set, its draft inputs and URL sync.
//! - **`query`**: Request parameters for the backend.
//! - **`fetch`**: Debounce and stale-response protection.
//! - **`api`**: The `FilterView` facade.
//! - **`context`**, **`config`**: Per-view policy and its on-disk source.
//! - **`nav`**: The URL seam and an in-memory implementation.
//! - **`error`**: `FilterError` and `Result`.

pub mod active;
pub mod api;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod model;
pub mod nav;
pub mod operators;
pub mod query;
