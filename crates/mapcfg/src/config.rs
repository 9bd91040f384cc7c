//! # Configuration
//!
//! Mapcfg configuration is managed by [`confique`], which handles layered loading
//! from environment variables and TOML files.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `MAPCFG_DOCUMENT`, `MAPCFG_TOOL_TARGETS`, etc.
//! 2. **Project Config**: `.mapcfg/mapcfg.toml` in the project root.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `document` | `mapcfg.json` | Map configuration document, relative to the project root |
//! | `candidates` | unset | Candidate buckets file (layer records keyed by source) |
//! | `layer_menu_zone` | `layermenu` | Zone id of the layer menu |
//! | `layer_menu_root` | `root` | Id of the layer menu's root group |
//! | `tool_targets` | `["toolbar", "left", "right", "control"]` | Tool slot zones, in order |
//! | `default_tool_target` | `toolbar` | Slot for tools with a missing or unknown target |
//! | `exclusive_tool_targets` | `true` | A tool occupies at most one slot |
//! | `pickers` | `["search"]` | Named pickers persisted under `pickers.<name>` |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MapcfgError, Result};

pub const CONFIG_DIR: &str = ".mapcfg";
pub const CONFIG_FILE: &str = "mapcfg.toml";

/// Configuration for mapcfg, stored in `mapcfg.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MapcfgConfig {
    /// Path of the map configuration document.
    #[config(default = "mapcfg.json", env = "MAPCFG_DOCUMENT")]
    pub document: String,

    /// Path of the candidate buckets file.
    #[config(env = "MAPCFG_CANDIDATES")]
    pub candidates: Option<String>,

    #[config(default = "layermenu", env = "MAPCFG_LAYER_MENU_ZONE")]
    pub layer_menu_zone: String,

    #[config(default = "root", env = "MAPCFG_LAYER_MENU_ROOT")]
    pub layer_menu_root: String,

    /// Tool slot zones in display order.
    #[config(
        default = ["toolbar", "left", "right", "control"],
        env = "MAPCFG_TOOL_TARGETS",
        parse_env = confique::env::parse::list_by_comma
    )]
    pub tool_targets: Vec<String>,

    #[config(default = "toolbar", env = "MAPCFG_DEFAULT_TOOL_TARGET")]
    pub default_tool_target: String,

    #[config(default = true, env = "MAPCFG_EXCLUSIVE_TOOL_TARGETS")]
    pub exclusive_tool_targets: bool,

    #[config(
        default = ["search"],
        env = "MAPCFG_PICKERS",
        parse_env = confique::env::parse::list_by_comma
    )]
    pub pickers: Vec<String>,
}

impl Default for MapcfgConfig {
    fn default() -> Self {
        Self {
            document: "mapcfg.json".to_string(),
            candidates: None,
            layer_menu_zone: "layermenu".to_string(),
            layer_menu_root: "root".to_string(),
            tool_targets: ["toolbar", "left", "right", "control"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            default_tool_target: "toolbar".to_string(),
            exclusive_tool_targets: true,
            pickers: vec!["search".to_string()],
        }
    }
}

impl MapcfgConfig {
    /// Checks cross-field constraints confique cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.tool_targets.is_empty() {
            return Err(MapcfgError::Config(
                "tool_targets must name at least one slot".to_string(),
            ));
        }
        if !self.tool_targets.contains(&self.default_tool_target) {
            return Err(MapcfgError::Config(format!(
                "default_tool_target '{}' is not one of tool_targets [{}]",
                self.default_tool_target,
                self.tool_targets.join(", ")
            )));
        }
        if self.tool_targets.contains(&self.layer_menu_zone) {
            return Err(MapcfgError::Config(format!(
                "layer_menu_zone '{}' clashes with a tool target",
                self.layer_menu_zone
            )));
        }
        Ok(())
    }

    /// Document path, resolved against `root` when relative.
    pub fn document_path(&self, root: &Path) -> PathBuf {
        root.join(&self.document)
    }

    pub fn candidates_path(&self, root: &Path) -> Option<PathBuf> {
        self.candidates.as_ref().map(|c| root.join(c))
    }

    pub fn is_tool_target(&self, zone: &str) -> bool {
        self.tool_targets.iter().any(|t| t == zone)
    }
}

/// Global config file location, if the platform has one.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "mapcfg", "mapcfg").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Loads configuration for a project rooted at `project_root`.
///
/// Missing files are skipped; a file that exists but does not parse is an error.
pub fn load_config(project_root: &Path) -> Result<MapcfgConfig> {
    let mut builder = MapcfgConfig::builder()
        .env()
        .file(project_root.join(CONFIG_DIR).join(CONFIG_FILE));
    if let Some(global) = global_config_path() {
        builder = builder.file(global);
    }
    let config = builder
        .load()
        .map_err(|e| MapcfgError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
