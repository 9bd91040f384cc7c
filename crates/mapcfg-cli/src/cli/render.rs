//! # Rendering Module
//!
//! Turns a [`CmdResult`] into terminal text or JSON.
//!
//! ## Layout
//!
//! Item lists and checklists share one row layout:
//! - `marker` (4 chars): list position or checkbox
//! - `name` (fill): display name, truncated to fit
//! - `scope` (right): access groups, or nothing when visible to everyone
//!
//! Widths are measured with `unicode-width` so captions with wide glyphs
//! still line up. Messages come last, one per line, styled by level.
//!
//! JSON output is the `CmdResult` itself, so scripts see the same
//! structure the API returns.

use chrono::{DateTime, Utc};
use mapcfg::commands::doctor::DoctorReport;
use mapcfg::commands::{CmdMessage, CmdResult, MessageLevel};
use mapcfg::document::Document;
use mapcfg::model::Item;
use mapcfg::reconcile::ChecklistRow;
use mapcfg::zones::ZoneLayout;
use serde_json::json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::setup::OutputFormat;
use super::styles;

pub const LINE_WIDTH: usize = 80;
pub const COL_MARKER: usize = 4;
pub const ELLIPSIS: &str = "…";

pub fn render_result(result: &CmdResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&json!(result)),
        OutputFormat::Text => render_text(result),
    }
}

pub fn render_doctor(result: &CmdResult, report: &DoctorReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&json!({
            "report": report,
            "messages": result.messages,
        })),
        OutputFormat::Text => render_text(result),
    }
}

/// One line describing the stored document, shown above the zone overview.
pub fn render_document_header(doc: &Document) -> String {
    let updated = match doc.updated_at {
        Some(at) => styles::TIME.apply_to(format_time_ago(at)).to_string(),
        None => styles::MUTED.apply_to("never saved").to_string(),
    };
    format!(
        "{} {}  {}\n",
        styles::TITLE.apply_to("revision"),
        doc.revision,
        updated
    )
}

fn to_json(value: &serde_json::Value) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

fn render_text(result: &CmdResult) -> String {
    let mut out = String::new();

    for (idx, item) in result.items.iter().enumerate() {
        out.push_str(&item_line(idx, item));
    }

    for row in &result.rows {
        out.push_str(&row_line(row));
    }

    for name in &result.names {
        let shown = match &name.name {
            Some(name) => styles::REGULAR.apply_to(name.clone()),
            None => styles::FAINT.apply_to("(unknown)".to_string()),
        };
        out.push_str(&format!("{:>8}  {}\n", name.id, shown));
    }

    for zone in &result.zones {
        let exclusive = zone
            .exclusive_set
            .as_ref()
            .map(|set| format!(" exclusive:{}", set))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<12} {:<12} {:<6} {:>3} items{}\n",
            styles::TITLE.apply_to(&zone.id),
            layout_name(zone.layout),
            zone.accepts,
            zone.items,
            styles::MUTED.apply_to(exclusive)
        ));
    }

    for message in &result.messages {
        out.push_str(&message_line(message));
    }
    out
}

fn item_line(idx: usize, item: &Item) -> String {
    let marker = format!("{}.", idx + 1);
    let scope = scope_text(&item.visible_for_groups);
    let name_width = LINE_WIDTH.saturating_sub(COL_MARKER + scope.width());
    format!(
        "{:>width$} {}{}\n",
        styles::MUTED.apply_to(marker),
        fit(&item.display_name, name_width),
        styles::SCOPE.apply_to(scope),
        width = COL_MARKER - 1
    )
}

fn row_line(row: &ChecklistRow) -> String {
    let marker = if row.checked { "[x]" } else { "[ ]" };
    let label = format!("{} ({})", row.candidate.label, row.candidate.id);
    let name_width = LINE_WIDTH.saturating_sub(COL_MARKER + row.scope_text.width());
    let label = fit(&label, name_width);
    let label = if row.checked {
        styles::SELECTED.apply_to(label)
    } else if row.matched {
        styles::REGULAR.apply_to(label)
    } else {
        styles::MUTED.apply_to(label)
    };
    format!(
        "{} {}{}\n",
        marker,
        label,
        styles::SCOPE.apply_to(&row.scope_text)
    )
}

fn message_line(message: &CmdMessage) -> String {
    let style = match message.level {
        MessageLevel::Info => &*styles::INFO,
        MessageLevel::Success => &*styles::SUCCESS,
        MessageLevel::Warning => &*styles::WARNING,
        MessageLevel::Error => &*styles::ERROR,
    };
    format!("{}\n", style.apply_to(&message.content))
}

fn scope_text(groups: &[String]) -> String {
    if groups.is_empty() {
        String::new()
    } else {
        groups.join(",")
    }
}

/// Truncates and pads to exactly `width` columns, keeping one column free before the scope.
fn fit(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width.saturating_sub(1));
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

fn layout_name(layout: ZoneLayout) -> &'static str {
    match layout {
        ZoneLayout::Nested => "nested",
        ZoneLayout::SingleLevel => "single-level",
    }
}

/// Cuts `text` to at most `width` columns, ending in an ellipsis when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if width > 0 {
        out.push_str(ELLIPSIS);
    }
    out
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let elapsed = Utc::now()
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}
