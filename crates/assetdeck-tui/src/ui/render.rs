use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use assetdeck_core::cache::store::{age_display, is_stale};

use crate::app::{App, AppState, Tab};

use super::styles::{self, Palette};
use super::tabs::{audit_logs, certificates, code_signing, ssh_keys};

pub fn render(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.dark_mode());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Length(1), // Search line
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, palette, chunks[0]);
    render_tabs(frame, app, palette, chunks[1]);
    render_search(frame, app, palette, chunks[2]);
    render_main_content(frame, app, chunks[3]);
    render_status_bar(frame, app, palette, chunks[4]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, palette),
        AppState::ConfirmingQuit => render_quit_overlay(frame, palette),
        AppState::Renaming => render_rename_overlay(frame, app, palette),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, palette: &Palette, area: Rect) {
    let title = "  assetdeck";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, palette.title()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 2)
                as usize,
        )),
        Span::styled(help_hint, palette.muted()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.muted());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", palette.muted()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        spans.push(Span::styled(label, palette.tab(*tab == app.current_tab)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.muted());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_search(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let searching = app.state == AppState::Searching;
    let text = app.search_text();
    if text.is_empty() && !searching {
        frame.render_widget(
            Paragraph::new(Span::styled(" [/] search  [f]ilter  [s]ort", palette.muted())),
            area,
        );
        return;
    }

    let pending = app.active_view().map(|v| v.search_pending()).unwrap_or(false);
    let cursor = if searching { "▌" } else { "" };
    let mut spans = vec![
        Span::styled(" Search: ", palette.muted()),
        Span::styled(format!("{}{}", text, cursor), palette.accent()),
    ];
    if pending {
        spans.push(Span::styled("  ...", palette.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Certificates => certificates::render(frame, app, area),
        Tab::SshKeys => ssh_keys::render(frame, app, area),
        Tab::CodeSigning => code_signing::render(frame, app, area),
        Tab::AuditLogs => audit_logs::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let shortcuts = "[r]eload | [d]ark mode | [q]uit";

    let (left_text, left_style) = match (&app.status_message, app.active_view()) {
        (Some(msg), _) => (format!(" {} ", msg), palette.muted()),
        (None, Some(view)) if view.has_failed() => (
            format!(" {} failed to load - showing last known data ", app.current_tab.title()),
            palette.error(),
        ),
        (None, Some(view)) if view.is_loading() => (" Loading... ".to_string(), palette.muted()),
        (None, Some(view)) => match view.captured_at() {
            Some(at) if is_stale(at) => (format!(" Updated {} ", age_display(at)), palette.accent()),
            Some(at) => (format!(" Updated {} ", age_display(at)), palette.muted()),
            None => (String::new(), palette.muted()),
        },
        (None, None) => (String::new(), palette.muted()),
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, palette.muted()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(palette.status_bar()), area);
}

fn help_line<'a>(palette: &Palette, key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), palette.help_key()),
        Span::styled(desc, palette.list_item()),
    ])
}

fn render_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let help_text = vec![
        Line::from(Span::styled("  assetdeck", palette.title())),
        Line::from(Span::styled(format!("  version {}", version), palette.muted())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", palette.accent())),
        help_line(palette, "1-4", "Switch tabs"),
        help_line(palette, "←/→", "Prev/next tab"),
        help_line(palette, "↑/↓ j/k", "Move selection (end loads more)"),
        help_line(palette, "n/p", "Next/prev page"),
        help_line(palette, "Enter", "Expand/collapse row"),
        Line::from(""),
        Line::from(Span::styled(" Actions", palette.accent())),
        help_line(palette, "/", "Search"),
        help_line(palette, "f", "Cycle status filter"),
        help_line(palette, "s", "Cycle sort"),
        help_line(palette, "e", "Rename certificate (local)"),
        help_line(palette, "r", "Reload"),
        help_line(palette, "d", "Toggle dark mode"),
        help_line(palette, "q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", palette.muted()),
            Span::styled("?", palette.help_key()),
            Span::styled(" or ", palette.muted()),
            Span::styled("Esc", palette.help_key()),
            Span::styled(" to close", palette.muted()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .style(palette.base());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_rename_overlay(frame: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect_fixed(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(" Rename certificate", palette.title())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Name: ", palette.muted()),
            Span::styled(format!("{}▌", app.rename_input), palette.selected()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " [Enter] save for this session  [Esc] cancel",
            palette.muted(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .style(palette.base());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Are you sure you want to quit?", palette.accent())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", palette.muted()),
            Span::styled("[Y]", palette.help_key()),
            Span::styled(" to quit, ", palette.muted()),
            Span::styled("[N]", palette.help_key()),
            Span::styled(" to cancel", palette.muted()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .style(palette.base());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
