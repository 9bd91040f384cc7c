//! # Storage Layer
//!
//! This module defines the storage abstraction for mapcfg. The [`DocumentStore`]
//! trait lets the API work against a JSON file on disk or an in-memory fixture.
//!
//! ## What Is Stored
//!
//! - **The document**: one JSON [`Document`] holding the layer menu, tool
//!   placements and picker overrides.
//! - **Candidate buckets** (read-only): layer records keyed by source, used to
//!   offer picker rows and to resolve display names. See [`crate::index`].
//!
//! ## Revisions
//!
//! Every saved document carries a `revision`. A save is accepted only when the
//! document's revision equals the stored one; the stored copy then gets
//! `revision + 1` and a fresh `updatedAt`. A mismatch means another session
//! saved in between and fails with [`MapcfgError::RevisionConflict`] unless the
//! caller forces the write (last write wins).
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production store. Writes go to a temp file that is
//!   renamed over the document.
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.

use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;

use crate::document::Document;
use crate::error::{MapcfgError, Result};
use crate::index::Buckets;

pub mod fs;
pub mod memory;

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// Loads the stored document. Nothing stored yet yields [`Document::default`].
    fn load(&self) -> Result<Document>;

    /// The stored JSON exactly as written, before any normalization.
    fn load_raw(&self) -> Result<Option<Value>>;

    /// Persists `doc`, returning the stored copy with its new revision.
    fn save(&mut self, doc: &Document, force: bool) -> Result<Document>;

    /// Candidate buckets. Empty when none are configured.
    fn load_buckets(&self) -> Result<Buckets>;

    /// Where the document lives, for stores that have a location.
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

/// Revision check shared by every store.
///
/// `stored` is the revision currently persisted (0 when nothing is).
pub(crate) fn next_revision(doc: &Document, stored: u64, force: bool) -> Result<Document> {
    if doc.revision != stored {
        if !force {
            tracing::warn!(
                expected = doc.revision,
                found = stored,
                "revision conflict, refusing to save"
            );
            return Err(MapcfgError::RevisionConflict {
                expected: doc.revision,
                found: stored,
            });
        }
        tracing::warn!(
            expected = doc.revision,
            found = stored,
            "revision conflict, overwriting"
        );
    }
    let mut next = doc.clone();
    next.revision = stored.max(doc.revision) + 1;
    next.updated_at = Some(Utc::now());
    Ok(next)
}
