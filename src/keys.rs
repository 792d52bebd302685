use crate::app::{App, MenuItem, Side};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    if key_event.kind == KeyEventKind::Release {
        return;
    }
    let mut guard = app.lock().await;

    // The editor swallows everything but Ctrl chords while typing.
    if guard.state.active_tab == MenuItem::Entries && guard.state.entry.composing {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => quit(),
            (Char('s'), KeyModifiers::CONTROL) => guard.submit_entries(),
            (KeyCode::Esc, _) => guard.stop_composing(),
            (KeyCode::Enter, _) => guard.state.entry.newline(),
            (KeyCode::Backspace, _) => guard.state.entry.backspace(),
            (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => guard.state.entry.insert_char(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Duels; digits pick here instead of switching tabs
        (MenuItem::Duel, Char('1' | 'h') | KeyCode::Left, _) => guard.duel_pick(Side::Left),
        (MenuItem::Duel, Char('2' | 'l') | KeyCode::Right, _) => guard.duel_pick(Side::Right),
        (MenuItem::Duel, KeyCode::Enter, _) => guard.duel_advance_bye(),
        (MenuItem::Duel, Char('u') | KeyCode::Backspace, _) => guard.duel_undo(),

        // Tab switching
        (_, KeyCode::Tab, _) => guard.next_tab(),
        (_, KeyCode::BackTab, _) => guard.previous_tab(),
        (_, Char('1'), _) => guard.update_tab(MenuItem::Entries),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Duel),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Results),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Entry editor
        (MenuItem::Entries, KeyCode::Enter | Char('i'), _) => guard.start_composing(),
        (MenuItem::Entries, Char('s'), _) | (MenuItem::Entries, KeyCode::F(5), _) => {
            guard.submit_entries()
        }
        (MenuItem::Entries, Char('x'), _) => guard.state.entry.clear(),
        (MenuItem::Entries, Char('j') | KeyCode::Down, _) => guard.state.entry.scroll_down(),
        (MenuItem::Entries, Char('k') | KeyCode::Up, _) => guard.state.entry.scroll_up(),

        // Results
        (MenuItem::Results, Char('j') | KeyCode::Down, _) => guard.results_scroll_down(),
        (MenuItem::Results, Char('k') | KeyCode::Up, _) => guard.results_scroll_up(),
        (MenuItem::Results, Char('e'), _) => {
            // Failures land in `last_error` for the status line.
            let _ = guard.export_shortlist();
        }
        (MenuItem::Results | MenuItem::Duel, Char('r'), _) => guard.restart(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

/// Bracketed paste goes to the entry editor, and only there.
pub async fn handle_paste(text: String, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    if guard.state.active_tab == MenuItem::Entries {
        guard.state.entry.composing = true;
        guard.state.entry.insert_str(&text);
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
