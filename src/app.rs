use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::Local;
use log::{info, warn};
use shortlist_engine::export::{format_shortlist, shortlist_json};
use shortlist_engine::ingest::load_entries;
use shortlist_engine::{ItemId, JudgeOutcome, Tournament};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Entries,
    Duel,
    Results,
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let mut app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        if let Some(path) = app.settings.entries_path.clone() {
            match load_entries(&path) {
                Ok(entries) => {
                    info!("loaded {} entries from {}", entries.len(), path.display());
                    app.state.entry.load(&entries, path.display().to_string());
                }
                Err(e) => {
                    warn!("{e}");
                    app.state.entry.error = Some(e.to_string());
                }
            }
        }

        app
    }

    /// Entries handed over on the command line go straight into round 1.
    pub fn on_app_started(&mut self) {
        if self.state.entry.source.is_some() && self.state.entry.error.is_none() {
            self.submit_entries();
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next != MenuItem::Entries {
            self.state.entry.composing = false;
        }
    }

    pub fn next_tab(&mut self) {
        let next = match self.state.active_tab {
            MenuItem::Entries => MenuItem::Duel,
            MenuItem::Duel => MenuItem::Results,
            MenuItem::Results | MenuItem::Help => MenuItem::Entries,
        };
        self.update_tab(next);
    }

    pub fn previous_tab(&mut self) {
        let previous = match self.state.active_tab {
            MenuItem::Entries | MenuItem::Help => MenuItem::Results,
            MenuItem::Duel => MenuItem::Entries,
            MenuItem::Results => MenuItem::Duel,
        };
        self.update_tab(previous);
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Entry editor
    // -----------------------------------------------------------------------

    pub fn start_composing(&mut self) {
        self.state.entry.composing = true;
    }

    pub fn stop_composing(&mut self) {
        self.state.entry.composing = false;
    }

    /// Parse the editor and open a fresh tournament over it.
    pub fn submit_entries(&mut self) {
        let entries = self.state.entry.entries();
        let count = entries.len();
        match Tournament::start(entries, self.settings.target_size, self.settings.bye_policy) {
            Ok(tournament) => {
                info!(
                    "round 1: {count} entries, {} duels, top {}",
                    tournament.total_pairs(),
                    tournament.target()
                );
                self.state.last_error = None;
                self.state.entry.error = None;
                self.state.entry.composing = false;
                self.state.duel.tournament = Some(tournament);
                self.state.duel.status = None;
                self.state.results = Default::default();
                self.update_tab(MenuItem::Duel);
            }
            Err(e) => {
                warn!("could not start with {count} entries: {e}");
                self.state.entry.error = Some(e.to_string());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Dueling
    // -----------------------------------------------------------------------

    pub fn duel_pick(&mut self, side: Side) {
        let Some(pair) = self.state.duel.tournament.as_ref().and_then(|t| t.current_pair()) else {
            return;
        };
        let pick = match (side, &pair.right) {
            (Side::Left, _) => pair.left.id,
            (Side::Right, Some(right)) => right.id,
            (Side::Right, None) => {
                self.state.duel.status = Some("This one is a bye: press Enter to advance it.".into());
                return;
            }
        };
        self.apply_judgment(pick);
    }

    pub fn duel_advance_bye(&mut self) {
        let Some(pair) = self.state.duel.tournament.as_ref().and_then(|t| t.current_pair()) else {
            return;
        };
        if !pair.is_bye() {
            self.state.duel.status = Some("Pick a side with 1/← or 2/→.".into());
            return;
        }
        let pick = pair.left.id;
        self.apply_judgment(pick);
    }

    fn apply_judgment(&mut self, pick: ItemId) {
        let Some(tournament) = self.state.duel.tournament.as_mut() else {
            return;
        };
        self.state.last_error = None;
        match tournament.judge(pick) {
            Ok(JudgeOutcome::Advanced) => {
                self.state.duel.status = None;
            }
            Ok(JudgeOutcome::RoundComplete { round, advancing }) => {
                info!("round {round} finished, {advancing} advance");
                self.state.duel.status = Some(format!(
                    "Round {round} done: {advancing} advance to round {}.",
                    round + 1
                ));
            }
            Ok(JudgeOutcome::Finished) => {
                self.state.duel.status = None;
                self.state.results = Default::default();
                self.update_tab(MenuItem::Results);
            }
            Err(e) => {
                warn!("judgment rejected: {e}");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    pub fn duel_undo(&mut self) {
        let Some(tournament) = self.state.duel.tournament.as_mut() else {
            return;
        };
        self.state.duel.status = match tournament.undo() {
            Ok(()) => Some("Took back the last pick.".into()),
            Err(e) => Some(format!("Can't undo: {e}.")),
        };
    }

    /// Drop the tournament and return to the editor, keeping the list.
    pub fn restart(&mut self) {
        self.state.duel = Default::default();
        self.state.results = Default::default();
        self.state.last_error = None;
        self.update_tab(MenuItem::Entries);
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    pub fn results_scroll_down(&mut self) {
        let max = self
            .state
            .duel
            .tournament
            .as_ref()
            .and_then(|t| t.shortlist())
            .map_or(0, |s| s.len().saturating_sub(1)) as u16;
        self.state.results.scroll_offset = (self.state.results.scroll_offset + 1).min(max);
    }

    pub fn results_scroll_up(&mut self) {
        self.state.results.scroll_offset = self.state.results.scroll_offset.saturating_sub(1);
    }

    pub fn export_shortlist(&mut self) -> Result<PathBuf, String> {
        let dir = export_dir();
        let result = self.export_shortlist_to(&dir);
        match &result {
            Ok(path) => {
                info!("shortlist exported to {}", path.display());
                self.state.results.last_export = Some(path.display().to_string());
            }
            Err(e) => {
                warn!("{e}");
                self.state.last_error = Some(e.clone());
            }
        }
        result
    }

    /// Write `shortlist_<stamp>.txt` and `.json` into `dir`, returning the
    /// text file's path.
    fn export_shortlist_to(&self, dir: &Path) -> Result<PathBuf, String> {
        let shortlist = self
            .state
            .duel
            .tournament
            .as_ref()
            .ok_or_else(|| "nothing to export yet".to_string())?
            .finish()
            .map_err(|e| e.to_string())?;

        std::fs::create_dir_all(dir).map_err(|e| format!("create dir failed: {e}"))?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S");

        let text_path = dir.join(format!("shortlist_{stamp}.txt"));
        let mut text = format_shortlist(shortlist);
        text.push('\n');
        std::fs::write(&text_path, text).map_err(|e| format!("write shortlist failed: {e}"))?;

        let json = shortlist_json(shortlist).map_err(|e| e.to_string())?;
        std::fs::write(dir.join(format!("shortlist_{stamp}.json")), json)
            .map_err(|e| format!("write shortlist json failed: {e}"))?;

        Ok(text_path)
    }
}

fn export_dir() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("shortlist");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("shortlist");
    }
    PathBuf::from(".")
}
