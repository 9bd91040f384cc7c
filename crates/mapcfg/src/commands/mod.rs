//! # Command Layer
//!
//! This module contains the **core business logic** of mapcfg. Each command lives in its
//! own submodule and implements pure Rust functions over an [`EditorSession`].
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate and perform placements, removals and picker edits
//! - Return structured [`CmdResult`] values with items, rows and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Any I/O**: No stdout, stderr, file reads or writes
//! - **Saving**: The API decides whether to persist, based on [`CmdResult::changed`]
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries:
//! - `items`: Items to display (flatten output, freshly inserted items)
//! - `rows`: Picker checklist rows
//! - `names`: Resolved display names
//! - `zones`: Zone summaries
//! - `placements`: Where moved or inserted nodes landed
//! - `messages`: Structured messages with levels (info, success, warning, error)
//!
//! ## Testing Strategy
//!
//! Command tests build sessions from small inline documents and check the
//! resulting `CmdResult` and session state, including error conditions.
//!
//! ## Command Modules
//!
//! - [`flatten`]: Materialized item list of a zone or group
//! - [`insert`]: Add layers, tools and groups
//! - [`remove`]: Detach items and groups
//! - [`move_node`]: Drag-style moves within and across zones
//! - [`select`]: Picker toggles and access scopes
//! - [`list`]: Filtered picker checklist
//! - [`lookup`]: Display name resolution
//! - [`zones`]: Zone overview
//! - [`doctor`]: Validate and normalize a stored document
//! - [`helpers`]: Shared utilities

use serde::Serialize;

use crate::model::Item;
use crate::placement::Placement;
use crate::reconcile::ChecklistRow;
use crate::session::EditorSession;
use crate::zones::{ZoneLayout, ZoneSpec};

pub mod doctor;
pub mod flatten;
pub mod helpers;
pub mod insert;
pub mod list;
pub mod lookup;
pub mod move_node;
pub mod remove;
pub mod select;
pub mod zones;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A resolved (or unresolved) display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub id: String,
    pub name: Option<String>,
}

/// One zone as shown by `mapcfg zones`.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneSummary {
    pub id: String,
    pub layout: ZoneLayout,
    pub accepts: String,
    pub exclusive_set: Option<String>,
    pub items: usize,
}

impl ZoneSummary {
    pub fn new(spec: &ZoneSpec, items: usize) -> Self {
        Self {
            id: spec.id.clone(),
            layout: spec.layout,
            accepts: spec.accepts.to_string(),
            exclusive_set: spec.exclusive_set.clone(),
            items,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub items: Vec<Item>,
    pub rows: Vec<ChecklistRow>,
    pub names: Vec<ResolvedName>,
    pub zones: Vec<ZoneSummary>,
    pub placements: Vec<Placement>,
    pub messages: Vec<CmdMessage>,
    /// Whether the session was modified and needs saving.
    #[serde(skip)]
    pub changed: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn with_rows(mut self, rows: Vec<ChecklistRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_placements(mut self, placements: Vec<Placement>) -> Self {
        self.placements = placements;
        self
    }

    pub fn changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Prepends the repairs made while loading the session.
    pub fn with_load_warnings(mut self, session: &EditorSession) -> Self {
        let mut messages: Vec<CmdMessage> = session
            .load_warnings()
            .iter()
            .map(|w| CmdMessage::warning(w.clone()))
            .collect();
        messages.append(&mut self.messages);
        self.messages = messages;
        self
    }
}
