//! # Project Discovery
//!
//! A mapcfg project is a directory holding a `.mapcfg/` folder (for
//! `mapcfg.toml`). Paths in the configuration (`document`, `candidates`) are
//! resolved against that directory.
//!
//! ## Root Detection
//!
//! [`find_project_root`] walks up from the working directory:
//!
//! 1. Start at `CWD`.
//! 2. Check: does this directory have a `.mapcfg` folder?
//! 3. **Match**: it is the project root.
//! 4. **No Match**: move to the parent directory.
//! 5. **Stop**: at `HOME` or the filesystem root, return `None`.
//!
//! Without a project root the working directory is used, so a bare
//! `mapcfg.json` next to the user just works.
//!
//! ## Overrides
//!
//! Explicit `--document` / `--candidates` paths (from the CLI) win over the
//! configuration and are used as given.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::api::MapcfgApi;
use crate::config::{load_config, MapcfgConfig, CONFIG_DIR};
use crate::error::Result;
use crate::store::fs::FileStore;

pub struct MapcfgContext {
    pub api: MapcfgApi<FileStore>,
    pub config: MapcfgConfig,
    pub root: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub document: Option<PathBuf>,
    pub candidates: Option<PathBuf>,
    /// Save without the revision check.
    pub force: bool,
}

pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Loads configuration and builds a file-backed API for the project around `cwd`.
pub fn initialize(cwd: &Path, options: InitOptions) -> Result<MapcfgContext> {
    let root = find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
    let config = load_config(&root)?;

    let document = options
        .document
        .unwrap_or_else(|| config.document_path(&root));
    let candidates = options
        .candidates
        .or_else(|| config.candidates_path(&root));

    tracing::debug!(
        root = %root.display(),
        document = %document.display(),
        candidates = ?candidates,
        "initialized"
    );

    let store = FileStore::new(document).with_candidates(candidates);
    let api = MapcfgApi::new(store, config.clone()).with_force(options.force);
    Ok(MapcfgContext { api, config, root })
}
