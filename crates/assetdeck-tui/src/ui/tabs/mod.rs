//! Per-dataset list rendering.
//!
//! Every tab renders the same frame: a tally line over the whole dataset and
//! a table of the windowed rows. Tabs only decide columns, cell text and the
//! extra lines an expanded row shows.

pub mod audit_logs;
pub mod certificates;
pub mod code_signing;
pub mod ssh_keys;

use std::collections::BTreeMap;
use std::fmt::Display;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use assetdeck_core::pipeline::WindowPosition;
use assetdeck_core::{AssetRecord, DatasetView, ViewControls};

use crate::app::App;
use crate::ui::styles::{self, Palette, Tone};

/// Cell text for one displayed row.
pub(crate) struct RowSpec {
    pub cells: Vec<String>,
    /// Column whose text is colored, and how
    pub tone: Option<(usize, Tone)>,
    /// Extra lines shown under the row when expanded
    pub details: Vec<String>,
}

/// Column layout for one tab.
pub(crate) struct Columns<'a> {
    pub header: &'a [&'a str],
    pub widths: &'a [Constraint],
}

pub(crate) fn render_list<T: AssetRecord>(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    view: &DatasetView<T>,
    columns: Columns<'_>,
    tone_of: fn(T::Category) -> Tone,
    row_spec: impl Fn(&T) -> RowSpec,
) {
    let palette = styles::palette(app.dark_mode());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let summary = view.summary();
    render_tallies(frame, palette, chunks[0], summary.total, summary.filtered, &summary.tallies, tone_of);

    let title = format!(
        " {} ({}/{}) - filter: {} - sort: {} ",
        T::KIND.title(),
        summary.filtered,
        summary.total,
        view.filter_label(),
        view.sort_label(),
    );
    let block = Block::default()
        .title(title)
        .title_style(palette.muted())
        .title_bottom(Line::from(position_label(summary.position)).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(palette.border(true));

    if let Some(message) = placeholder(view, summary.filtered) {
        let style = if view.has_failed() { palette.error() } else { palette.muted() };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, style))).block(block);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let header = Row::new(columns.header.iter().map(|h| Cell::from(*h)))
        .style(palette.title())
        .height(1);

    let rows: Vec<Row> = view
        .rows()
        .into_iter()
        .map(|record| {
            let spec = row_spec(record);
            let expanded = view.pipeline().is_expanded(record.id());
            build_row(spec, expanded, palette)
        })
        .collect();

    let table = Table::new(rows, columns.widths.to_vec())
        .header(header)
        .block(block)
        .row_highlight_style(palette.selected());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn build_row(spec: RowSpec, expanded: bool, palette: &Palette) -> Row<'static> {
    let detail_lines = if expanded { spec.details.len() } else { 0 };
    let cells: Vec<Cell> = spec
        .cells
        .into_iter()
        .enumerate()
        .map(|(col, text)| {
            let style = match spec.tone {
                Some((tone_col, tone)) if tone_col == col => palette.tone(tone),
                _ => palette.list_item(),
            };
            if col == 0 && expanded {
                let mut lines = vec![Line::from(Span::styled(text, style))];
                lines.extend(
                    spec.details
                        .iter()
                        .map(|d| Line::from(Span::styled(format!("  {}", d), palette.muted()))),
                );
                Cell::from(Text::from(lines))
            } else {
                Cell::from(Span::styled(text, style))
            }
        })
        .collect();

    Row::new(cells).height(1 + detail_lines as u16)
}

fn render_tallies<C: Copy + Ord + Display>(
    frame: &mut Frame,
    palette: &Palette,
    area: Rect,
    total: usize,
    filtered: usize,
    tallies: &BTreeMap<C, usize>,
    tone_of: fn(C) -> Tone,
) {
    let mut spans = vec![
        Span::styled(format!(" Total {} ", total), palette.title()),
        Span::styled(format!("Showing {} ", filtered), palette.muted()),
        Span::styled("| ", palette.muted()),
    ];
    for (category, count) in tallies {
        spans.push(Span::styled(
            format!("{} {}  ", category, count),
            palette.tone(tone_of(*category)),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.muted());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Message shown instead of the table, if any.
fn placeholder<T: AssetRecord>(view: &DatasetView<T>, filtered: usize) -> Option<String> {
    if !view.records().is_empty() {
        return (filtered == 0).then(|| "No matching records".to_string());
    }
    if view.has_failed() {
        Some(format!("Failed to load {}. Press [r] to retry.", T::KIND.title()))
    } else if view.is_loading() {
        Some(format!("Loading {}...", T::KIND.title()))
    } else {
        Some("No records".to_string())
    }
}

pub(crate) fn position_label(position: WindowPosition) -> String {
    match position {
        WindowPosition::All => String::new(),
        WindowPosition::Page { page, total_pages } => {
            format!(" Page {}/{}  [n]ext [p]rev ", page, total_pages)
        }
        WindowPosition::Revealed { revealed, loading: true, .. } => {
            format!(" Showing {} - loading more... ", revealed)
        }
        WindowPosition::Revealed { revealed, has_more: true, .. } => {
            format!(" Showing {} - scroll for more ", revealed)
        }
        WindowPosition::Revealed { revealed, .. } => format!(" Showing all {} ", revealed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_label() {
        assert_eq!(position_label(WindowPosition::All), "");
        assert!(position_label(WindowPosition::Page { page: 2, total_pages: 3 }).contains("Page 2/3"));
        assert!(position_label(WindowPosition::Revealed {
            revealed: 20,
            has_more: true,
            loading: true
        })
        .contains("loading more"));
        assert!(position_label(WindowPosition::Revealed {
            revealed: 37,
            has_more: false,
            loading: false
        })
        .contains("all 37"));
    }
}
