//! Styles for the mapcfg CLI.
//!
//! Output code refers to styles by meaning (`muted`, `selected`, ...), never
//! by color. All styles are built once through `once_cell::sync::Lazy`;
//! `console` drops the escape codes when stdout is not a terminal.

use console::Style;
use once_cell::sync::Lazy;

pub static REGULAR: Lazy<Style> = Lazy::new(Style::new);
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(240));
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());

pub static GROUP: Lazy<Style> = Lazy::new(|| Style::new().color256(178).bold());
pub static SELECTED: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static SCOPE: Lazy<Style> = Lazy::new(|| Style::new().cyan());

pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static INFO: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
