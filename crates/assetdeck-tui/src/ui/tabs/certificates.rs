use chrono::Utc;
use ratatui::{layout::Constraint, layout::Rect, Frame};

use assetdeck_core::models::{Certificate, CertificateStatus};
use assetdeck_core::utils::format_date;

use super::{render_list, Columns, RowSpec};
use crate::app::App;
use crate::ui::styles::Tone;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.certificates.as_ref() else {
        return;
    };
    let columns = Columns {
        header: &["Name", "Domain", "Issuer", "Expires", "Status"],
        widths: &[
            Constraint::Percentage(30),
            Constraint::Fill(1),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    };
    let now = Utc::now();
    render_list(frame, app, area, view, columns, status_tone, |cert: &Certificate| RowSpec {
        cells: vec![
            cert.name.clone(),
            cert.domain.clone(),
            cert.issuer.clone(),
            cert.expiry_display(now),
            cert.status.to_string(),
        ],
        tone: Some((4, status_tone(cert.status))),
        details: details(cert),
    });
}

fn status_tone(status: CertificateStatus) -> Tone {
    match status {
        CertificateStatus::Active => Tone::Good,
        CertificateStatus::Expiring => Tone::Warn,
        CertificateStatus::Expired | CertificateStatus::Revoked => Tone::Bad,
    }
}

fn details(cert: &Certificate) -> Vec<String> {
    let servers = if cert.servers.is_empty() {
        "-".to_string()
    } else {
        cert.servers.join(", ")
    };
    vec![
        format!("Serial:    {}", cert.serial_number),
        format!("Algorithm: {}", cert.key_algorithm),
        format!(
            "Valid:     {} to {}",
            format_date(&cert.issued_date),
            format_date(&cert.expiry_date)
        ),
        format!("Servers:   {}", servers),
    ]
}
