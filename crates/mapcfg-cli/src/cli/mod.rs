//! # CLI Layer
//!
//! This module is **one possible UI client** for mapcfg; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the `tracing` subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Every subcommand maps onto one `MapcfgApi` call. The API returns a
//! `CmdResult`; [`render`] turns it into text or JSON.
//!
//! ## Modules
//!
//! - `commands`: Logging setup, context setup and dispatch
//! - `render`: Output formatting (item lists, checklists, messages)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
