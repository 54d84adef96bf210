use ratatui::{layout::Constraint, layout::Rect, Frame};

use assetdeck_core::models::{AuditLogEntry, Severity};
use assetdeck_core::utils::parse_instant;

use super::{render_list, Columns, RowSpec};
use crate::app::App;
use crate::ui::styles::Tone;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.audit_logs.as_ref() else {
        return;
    };
    let columns = Columns {
        header: &["Time", "User", "Action", "Resource", "Severity"],
        widths: &[
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(24),
            Constraint::Fill(1),
            Constraint::Length(10),
        ],
    };
    render_list(frame, app, area, view, columns, severity_tone, |entry: &AuditLogEntry| {
        let mut details = vec![entry.details.clone()];
        details.extend(entry.metadata_lines());
        RowSpec {
            cells: vec![
                format_timestamp(&entry.timestamp),
                entry.user.clone(),
                entry.action.clone(),
                entry.resource.clone(),
                entry.severity.to_string(),
            ],
            tone: Some((4, severity_tone(entry.severity))),
            details,
        }
    });
}

fn severity_tone(severity: Severity) -> Tone {
    match severity {
        Severity::Info => Tone::Neutral,
        Severity::Warning => Tone::Warn,
        Severity::Critical => Tone::Bad,
    }
}

/// "Oct 16 05:22" in UTC, or the raw value if it does not parse.
fn format_timestamp(ts: &str) -> String {
    parse_instant(ts)
        .map(|dt| dt.format("%b %d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
