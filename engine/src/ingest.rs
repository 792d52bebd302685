use crate::{EngineResult, Entry, TournamentError};
use std::path::Path;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Parse free text with one `title - artist` entry per line.
///
/// Blank lines are skipped. The line is split at the first `" - "`, or at the
/// first bare `-` when there is no spaced separator, so hyphenated names like
/// `Jay-Z` survive in the common spaced form.
pub fn parse_entries(text: &str) -> Vec<Entry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Entry {
    let (title, artist) = line
        .split_once(" - ")
        .or_else(|| line.split_once('-'))
        .unwrap_or((line, ""));
    Entry {
        title: non_empty_or(title, UNKNOWN_TITLE),
        artist: non_empty_or(artist, UNKNOWN_ARTIST),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() { fallback.to_string() } else { value.to_string() }
}

/// Parse a JSON array of `{ "title": ..., "artist": ... }` objects.
pub fn parse_json_entries(text: &str) -> EngineResult<Vec<Entry>> {
    serde_json::from_str(text).map_err(|e| TournamentError::Ingest(format!("invalid entries json: {e}")))
}

/// Load entries from disk. `.json` files are parsed as JSON, anything else as
/// `title - artist` lines.
pub fn load_entries(path: &Path) -> EngineResult<Vec<Entry>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TournamentError::Ingest(format!("could not read {}: {e}", path.display())))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json_entries(&content)
    } else {
        Ok(parse_entries(&content))
    }
}
