use crate::app::MenuItem;
use shortlist_engine::Entry;
use shortlist_engine::Tournament;
use shortlist_engine::ingest::parse_entries;

/// Pre-filled editor content so the tool can be tried without typing a list.
pub const SAMPLE_ENTRIES: &str = "\
Blue - Joni Mitchell
Kid A - Radiohead
Homogenic - Björk
Loveless - My Bloody Valentine
The Blueprint - Jay-Z
Remain in Light - Talking Heads
Blonde - Frank Ocean
Illmatic - Nas
Hounds of Love - Kate Bush
Purple Rain - Prince
Spiderland - Slint
Vespertine - Björk
To Pimp a Butterfly - Kendrick Lamar";

// ---------------------------------------------------------------------------
// Entry editor state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct EntryState {
    pub text: String,
    pub composing: bool,
    pub error: Option<String>,
    /// Where the text came from, when it was loaded from a file.
    pub source: Option<String>,
    /// Entries exactly as loaded; dropped on the first edit, after which the
    /// text is parsed instead.
    loaded: Option<Vec<Entry>>,
    pub scroll_offset: u16,
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            text: SAMPLE_ENTRIES.to_string(),
            composing: false,
            error: None,
            source: None,
            loaded: None,
            scroll_offset: 0,
        }
    }
}

impl EntryState {
    pub fn load(&mut self, entries: &[Entry], source: String) {
        self.text = entries
            .iter()
            .map(|e| format!("{} - {}", e.title, e.artist))
            .collect::<Vec<_>>()
            .join("\n");
        self.loaded = Some(entries.to_vec());
        self.source = Some(source);
        self.error = None;
        self.scroll_offset = 0;
    }

    pub fn entries(&self) -> Vec<Entry> {
        match &self.loaded {
            Some(entries) => entries.clone(),
            None => parse_entries(&self.text),
        }
    }

    /// Last line the editor can scroll to.
    pub fn max_scroll(&self) -> u16 {
        self.text.lines().count().saturating_sub(1) as u16
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.push(c);
        self.loaded = None;
        self.error = None;
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.push_str(&s.replace("\r\n", "\n").replace('\r', "\n"));
        self.loaded = None;
        self.error = None;
    }

    pub fn newline(&mut self) {
        self.text.push('\n');
        self.loaded = None;
    }

    pub fn backspace(&mut self) {
        self.text.pop();
        self.loaded = None;
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.loaded = None;
        self.source = None;
        self.error = None;
        self.scroll_offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Duel state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DuelState {
    pub tournament: Option<Tournament>,
    /// One-line notice about the last action (round finished, bye hint, ...).
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Results state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultsState {
    pub scroll_offset: u16,
    pub last_export: Option<String>,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub entry: EntryState,
    pub duel: DuelState,
    pub results: ResultsState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_list_is_large_enough_for_the_default_target() {
        let entries = EntryState::default().entries();
        assert_eq!(entries.len(), 13);
        assert!(entries.len() > crate::state::app_settings::DEFAULT_TARGET_SIZE);
        assert!(entries.contains(&Entry::new("The Blueprint", "Jay-Z")));
    }

    #[test]
    fn editing_appends_and_removes_characters() {
        let mut entry = EntryState::default();
        entry.clear();
        for c in "Blue - Joni".chars() {
            entry.insert_char(c);
        }
        entry.newline();
        entry.insert_str("Kid A - Radiohead\r\n");
        entry.backspace();
        assert_eq!(entry.text, "Blue - Joni\nKid A - Radiohead");
        assert_eq!(entry.entries().len(), 2);
    }

    #[test]
    fn loading_replaces_text_and_records_source() {
        let mut entry = EntryState::default();
        entry.error = Some("stale".into());
        entry.load(&[Entry::new("Blue", "Joni Mitchell")], "albums.txt".into());
        assert_eq!(entry.text, "Blue - Joni Mitchell");
        assert_eq!(entry.source.as_deref(), Some("albums.txt"));
        assert!(entry.error.is_none());
    }

    #[test]
    fn loaded_entries_survive_until_edited() {
        let mut entry = EntryState::default();
        let live = Entry::new("Live - 1975", "Bob Marley");
        entry.load(&[live.clone()], "albums.json".into());
        assert_eq!(entry.entries(), vec![live]);

        // Once edited, the text is the source of truth again.
        entry.newline();
        entry.insert_str("Blue - Joni Mitchell");
        assert_eq!(
            entry.entries(),
            vec![Entry::new("Live", "1975 - Bob Marley"), Entry::new("Blue", "Joni Mitchell")]
        );
    }

    #[test]
    fn scrolling_stops_at_the_last_line() {
        let mut entry = EntryState::default();
        let last = entry.max_scroll();
        assert_eq!(last, 12);
        for _ in 0..40 {
            entry.scroll_down();
        }
        assert_eq!(entry.scroll_offset, last);
        entry.scroll_up();
        assert_eq!(entry.scroll_offset, last - 1);

        entry.clear();
        entry.scroll_down();
        assert_eq!(entry.scroll_offset, 0);
    }
}
