//! # Mapcfg Architecture
//!
//! Mapcfg is a **UI-agnostic placement engine** for map-viewer configuration:
//! which layers sit where in the layer menu, which tools occupy which slots,
//! and which access groups may see them. It is a library that happens to have
//! a CLI client; a drag-and-drop admin UI would drive the same API.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (mapcfg-cli crate)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads a session, dispatches, saves when changed          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Operates on an EditorSession, returns CmdResult          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (session, zones, placement, tree, reconcile, ...)   │
//! │  - Pure data structures and algorithms                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait                                      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Engine Modules
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`model`] | Items, groups, ids, overrides, candidates |
//! | [`tree`] | One ordered tree: find, insert, remove, materialize |
//! | [`index`] | Flattening and id → name lookup across candidate buckets |
//! | [`zones`] | Named drop targets and their exclusivity |
//! | [`placement`] | Atomic moves within and across zones |
//! | [`reconcile`] | Sparse picker overrides that survive filtering |
//! | [`listing`] | Filtered, sorted picker rows |
//! | [`access`] | Access-group scope parsing and normalization |
//! | [`tools`] | Known tool kinds and the unknown fallback |
//! | [`session`] | Load/save between the document and the zones |
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never installs a log subscriber. Diagnostics go through
//! `tracing`; user-facing outcomes travel as [`commands::CmdMessage`]s.

pub mod access;
pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod init;
pub mod listing;
pub mod model;
pub mod placement;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod tools;
pub mod tree;
pub mod zones;

#[cfg(test)]
pub mod test_utils;
