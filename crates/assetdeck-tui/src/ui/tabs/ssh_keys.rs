use ratatui::{layout::Constraint, layout::Rect, Frame};

use assetdeck_core::models::{SshKey, SshKeyStatus};
use assetdeck_core::utils::{format_date, truncate};

use super::{render_list, Columns, RowSpec};
use crate::app::App;
use crate::ui::styles::Tone;

/// Fingerprints are long; the list shows a prefix and the expanded row the rest.
const FINGERPRINT_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.ssh_keys.as_ref() else {
        return;
    };
    let columns = Columns {
        header: &["Name", "Owner", "Type", "Fingerprint", "Last Used", "Status"],
        widths: &[
            Constraint::Percentage(25),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(FINGERPRINT_WIDTH as u16 + 2),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    };
    render_list(frame, app, area, view, columns, status_tone, |key: &SshKey| RowSpec {
        cells: vec![
            key.name.clone(),
            key.owner.clone(),
            key.key_type.to_string(),
            truncate(&key.fingerprint, FINGERPRINT_WIDTH),
            format_date(&key.last_used),
            key.status.to_string(),
        ],
        tone: Some((5, status_tone(key.status))),
        details: details(key),
    });
}

fn status_tone(status: SshKeyStatus) -> Tone {
    match status {
        SshKeyStatus::Active => Tone::Good,
        SshKeyStatus::Inactive => Tone::Neutral,
        SshKeyStatus::Revoked => Tone::Bad,
    }
}

fn details(key: &SshKey) -> Vec<String> {
    let servers = if key.servers.is_empty() {
        "-".to_string()
    } else {
        key.servers.join(", ")
    };
    vec![
        format!("Fingerprint: {}", key.fingerprint),
        format!("Created:     {}", format_date(&key.created_date)),
        format!("Servers:     {}", servers),
    ]
}
