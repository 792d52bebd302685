use crate::{EngineResult, Item, TournamentError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    title: &'a str,
    artist: &'a str,
}

/// Numbered plain-text list, one `"{rank}. {title} - {artist}"` per line.
pub fn format_shortlist(items: &[Item]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {} - {}", i + 1, item.title, item.artist))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON array of `{ rank, title, artist }`.
pub fn shortlist_json(items: &[Item]) -> EngineResult<String> {
    let ranked: Vec<RankedEntry> = items
        .iter()
        .enumerate()
        .map(|(i, item)| RankedEntry { rank: i + 1, title: &item.title, artist: &item.artist })
        .collect();
    serde_json::to_string_pretty(&ranked)
        .map_err(|e| TournamentError::Export(format!("serialize shortlist failed: {e}")))
}
