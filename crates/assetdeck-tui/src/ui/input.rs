//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent, now: Instant) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => handle_quit_confirmation(app, key),
        AppState::Searching => {
            handle_search_input(app, key, now);
            false
        }
        AppState::Renaming => {
            handle_rename_input(app, key);
            false
        }
        AppState::Normal => {
            handle_normal_input(app, key, now);
            false
        }
        AppState::Quitting => true,
    }
}

fn handle_quit_confirmation(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent, now: Instant) {
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('1') => app.switch_tab(Tab::Certificates),
        KeyCode::Char('2') => app.switch_tab(Tab::SshKeys),
        KeyCode::Char('3') => app.switch_tab(Tab::CodeSigning),
        KeyCode::Char('4') => app.switch_tab(Tab::AuditLogs),
        KeyCode::Left => app.switch_tab(app.current_tab.prev()),
        KeyCode::Right => app.switch_tab(app.current_tab.next()),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(now),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(now),
        KeyCode::PageDown => {
            for _ in 0..PAGE_SCROLL_SIZE {
                app.select_next(now);
            }
        }
        KeyCode::PageUp => {
            for _ in 0..PAGE_SCROLL_SIZE {
                app.select_prev();
            }
        }
        KeyCode::Char('n') | KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('p') | KeyCode::Char('[') => app.prev_page(),
        KeyCode::Enter => app.toggle_expanded(),
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('e') => app.start_rename(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Esc => {
            if !app.search_text().is_empty() {
                app.set_search("", now);
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => {
            app.set_search("", now);
            app.state = AppState::Normal;
        }
        KeyCode::Enter | KeyCode::Down => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(now),
        KeyCode::Char(c) => app.push_search_char(c, now),
        _ => {}
    }
}

fn handle_rename_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_rename(),
        KeyCode::Enter => app.commit_rename(),
        KeyCode::Backspace => {
            app.rename_input.pop();
        }
        KeyCode::Char(c) => app.push_rename_char(c),
        _ => {}
    }
}
