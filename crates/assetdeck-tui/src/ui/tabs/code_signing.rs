use ratatui::{layout::Constraint, layout::Rect, Frame};

use assetdeck_core::models::{CodeSigningKey, CodeSigningStatus, TrustLevel};
use assetdeck_core::utils::format_date;

use super::{render_list, Columns, RowSpec};
use crate::app::App;
use crate::ui::styles::Tone;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.code_signing.as_ref() else {
        return;
    };
    let columns = Columns {
        header: &["Name", "Owner", "Algorithm", "Trust", "Expires", "Status"],
        widths: &[
            Constraint::Percentage(28),
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    };
    render_list(frame, app, area, view, columns, status_tone, |key: &CodeSigningKey| RowSpec {
        cells: vec![
            key.name.clone(),
            key.owner.clone(),
            key.algorithm.clone(),
            key.trust_level.to_string(),
            format_date(&key.expiry_date),
            key.status.to_string(),
        ],
        tone: Some((5, status_tone(key.status))),
        details: vec![
            format!("Protection: {}", key.protection),
            format!("Trust:      {}", trust_description(key.trust_level)),
            format!("Created:    {}", format_date(&key.created_date)),
            format!("Signatures: {}", key.signature_count),
        ],
    });
}

fn status_tone(status: CodeSigningStatus) -> Tone {
    match status {
        CodeSigningStatus::Active => Tone::Good,
        CodeSigningStatus::Expired => Tone::Warn,
        CodeSigningStatus::Revoked => Tone::Bad,
    }
}

fn trust_description(level: TrustLevel) -> &'static str {
    match level {
        TrustLevel::High => "high (production releases)",
        TrustLevel::Medium => "medium (internal builds)",
        TrustLevel::Low => "low (test signing only)",
    }
}
