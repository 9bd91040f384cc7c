//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all mapcfg operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Loads** an [`EditorSession`] from the store for every call
//! - **Normalizes inputs** (plain strings into [`NodeId`]s)
//! - **Dispatches** to the appropriate command function
//! - **Saves** the session back when the command reports a change
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Save Cycle
//!
//! ```text
//! store.load() ─▶ EditorSession ─▶ command ─▶ CmdResult { changed }
//!                                                   │
//!                     store.save(doc, force) ◀──────┘ (only when changed)
//! ```
//!
//! Saves are revision checked: if another session saved since the load, the
//! save fails with [`crate::error::MapcfgError::RevisionConflict`] unless the
//! API was built [`MapcfgApi::with_force`].
//!
//! ## Generic Over DocumentStore
//!
//! `MapcfgApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `MapcfgApi<FileStore>`
//! - Testing: `MapcfgApi<InMemoryStore>`

use crate::commands::{self, CmdResult};
use crate::commands::doctor::DoctorReport;
use crate::commands::select::ScopeTarget;
use crate::config::MapcfgConfig;
use crate::document::Document;
use crate::error::Result;
use crate::index::{self, NameTable};
use crate::model::{ItemKind, NodeId};
use crate::session::EditorSession;
use crate::store::DocumentStore;

/// The main API facade for mapcfg operations.
///
/// All UI clients (CLI, web, etc.) should interact through this API.
pub struct MapcfgApi<S: DocumentStore> {
    store: S,
    config: MapcfgConfig,
    force: bool,
}

fn ids<I: AsRef<str>>(raw: &[I]) -> Vec<NodeId> {
    raw.iter().map(|id| NodeId::from(id.as_ref().trim())).collect()
}

impl<S: DocumentStore> MapcfgApi<S> {
    pub fn new(store: S, config: MapcfgConfig) -> Self {
        Self {
            store,
            config,
            force: false,
        }
    }

    /// Skip the revision check on save (last write wins).
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MapcfgConfig {
        &self.config
    }

    /// The stored document as-is.
    pub fn document(&self) -> Result<Document> {
        self.store.load()
    }

    /// Fresh session from the stored document, with candidates and display names applied.
    pub fn session(&self) -> Result<EditorSession> {
        let doc = self.store.load()?;
        let mut session = EditorSession::from_document(&doc, &self.config)?;
        let buckets = self.store.load_buckets()?;
        if !buckets.is_empty() {
            session.apply_names(&NameTable::from_buckets(&buckets));
            session.set_candidates(index::candidates(&buckets));
        }
        Ok(session)
    }

    fn read<F>(&self, command: F) -> Result<CmdResult>
    where
        F: FnOnce(&EditorSession) -> Result<CmdResult>,
    {
        let session = self.session()?;
        Ok(command(&session)?.with_load_warnings(&session))
    }

    fn mutate<F>(&mut self, command: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut EditorSession) -> Result<CmdResult>,
    {
        let mut session = self.session()?;
        let result = command(&mut session)?;
        if result.changed {
            self.store.save(&session.to_document(), self.force)?;
        }
        Ok(result.with_load_warnings(&session))
    }

    pub fn flatten(
        &self,
        zone: Option<&str>,
        group: Option<&str>,
        query: Option<&str>,
    ) -> Result<CmdResult> {
        let group = group.map(NodeId::from);
        self.read(|session| commands::flatten::run(session, zone, group.as_ref(), query))
    }

    pub fn insert_layer(
        &mut self,
        id: &str,
        parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<CmdResult> {
        let id = NodeId::from(id.trim());
        let parent = parent.map(NodeId::from);
        self.mutate(|session| commands::insert::layer(session, &id, parent.as_ref(), index))
    }

    pub fn insert_tool(
        &mut self,
        tool_type: &str,
        target: Option<&str>,
        index: Option<usize>,
    ) -> Result<CmdResult> {
        self.mutate(|session| commands::insert::tool(session, tool_type, target, index))
    }

    pub fn insert_group(
        &mut self,
        id: Option<&str>,
        caption: Option<&str>,
        parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<CmdResult> {
        let id = id.map(NodeId::from);
        let parent = parent.map(NodeId::from);
        self.mutate(|session| {
            commands::insert::group(session, id.as_ref(), caption, parent.as_ref(), index)
        })
    }

    pub fn remove<I: AsRef<str>>(&mut self, zone: Option<&str>, targets: &[I]) -> Result<CmdResult> {
        let targets = ids(targets);
        self.mutate(|session| commands::remove::run(session, zone, &targets))
    }

    pub fn move_node(
        &mut self,
        id: &str,
        source: Option<&str>,
        dest: Option<&str>,
        dest_group: Option<&str>,
        index: Option<usize>,
    ) -> Result<CmdResult> {
        let id = NodeId::from(id.trim());
        let dest_group = dest_group.map(NodeId::from);
        self.mutate(|session| {
            commands::move_node::run(session, &id, source, dest, dest_group.as_ref(), index)
        })
    }

    pub fn toggle<I: AsRef<str>>(&mut self, picker: &str, targets: &[I]) -> Result<CmdResult> {
        let targets = ids(targets);
        self.mutate(|session| commands::select::toggle(session, picker, &targets))
    }

    pub fn scope_picker(&mut self, picker: &str, id: &str, groups_csv: &str) -> Result<CmdResult> {
        let id = NodeId::from(id.trim());
        self.mutate(|session| {
            commands::select::scope(session, ScopeTarget::Picker(picker), &id, groups_csv)
        })
    }

    pub fn scope_item(
        &mut self,
        zone: Option<&str>,
        id: &str,
        groups_csv: &str,
    ) -> Result<CmdResult> {
        let id = NodeId::from(id.trim());
        self.mutate(|session| {
            commands::select::scope(session, ScopeTarget::Placed(zone), &id, groups_csv)
        })
    }

    pub fn list(&self, picker: &str, query: &str) -> Result<CmdResult> {
        self.read(|session| commands::list::run(session, picker, query))
    }

    pub fn resolve<I: AsRef<str>>(&self, targets: &[I]) -> Result<CmdResult> {
        let buckets = self.store.load_buckets()?;
        let targets: Vec<String> = targets.iter().map(|t| t.as_ref().trim().to_string()).collect();
        Ok(commands::lookup::run(&buckets, &targets))
    }

    pub fn zones(&self, kind: Option<ItemKind>) -> Result<CmdResult> {
        self.read(|session| Ok(commands::zones::run(session, kind)))
    }

    /// Checks the stored document; with `fix`, writes back the normalized form.
    pub fn doctor(&mut self, fix: bool) -> Result<(CmdResult, DoctorReport)> {
        let raw = self.store.load_raw()?;
        let report = raw
            .as_ref()
            .map(|raw| commands::doctor::inspect(raw, &self.config))
            .unwrap_or_default();

        let fixed = fix && report.duplicate_ids.is_empty() && report.is_fixable();
        if fixed {
            let session = self.session()?;
            self.store.save(&session.to_document(), self.force)?;
        }
        Ok(commands::doctor::run(raw.as_ref(), &self.config, fixed))
    }
}
